//! Thread-size bucket table.
//!
//! The table defines a discrete probability distribution over conversation
//! lengths, heavily skewed toward short threads: roughly two thirds of the
//! weight sits on one-to-three-message exchanges, with a long thin tail out
//! to the absolute cap of fifty messages.

use serde::{Deserialize, Serialize};

/// Absolute cap on messages per thread.
pub const MAX_THREAD_MESSAGES: u64 = 50;

/// One entry in the thread-size distribution.
///
/// `min..=max` is the size span the bucket covers; `weight` is its share of
/// the draw relative to the other eligible buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreadSizeBucket {
    /// Smallest thread size this bucket can produce.
    pub min: u32,
    /// Largest thread size this bucket can produce.
    pub max: u32,
    /// Relative selection weight.
    pub weight: f64,
}

impl ThreadSizeBucket {
    /// Create a new bucket.
    pub const fn new(min: u32, max: u32, weight: f64) -> Self {
        Self { min, max, weight }
    }
}

/// Default thread-size distribution.
///
/// Weights sum to 100; the span 1..=50 is covered without gaps.
pub const DEFAULT_THREAD_SIZE_BUCKETS: [ThreadSizeBucket; 11] = [
    ThreadSizeBucket::new(1, 1, 46.0),
    ThreadSizeBucket::new(2, 2, 20.0),
    ThreadSizeBucket::new(3, 3, 12.0),
    ThreadSizeBucket::new(4, 4, 7.0),
    ThreadSizeBucket::new(5, 6, 5.0),
    ThreadSizeBucket::new(7, 8, 3.5),
    ThreadSizeBucket::new(9, 10, 2.5),
    ThreadSizeBucket::new(11, 14, 1.8),
    ThreadSizeBucket::new(15, 20, 1.2),
    ThreadSizeBucket::new(21, 30, 0.7),
    ThreadSizeBucket::new(31, 50, 0.3),
];
