//! Thread-size planning.
//!
//! Partitions a target message count into an ordered list of thread sizes via
//! weighted stochastic sampling over the static bucket table.
//!
//! ## Algorithm
//!
//! 1. While messages remain, keep the buckets whose `min` still fits
//! 2. No eligible bucket: emit a single-message thread (degenerate tail)
//! 3. Otherwise roll in `[0, total_weight)` and walk the cumulative weights;
//!    the first bucket whose cumulative weight is `>= roll` wins (a roll
//!    exactly on a boundary lands in the lower bucket)
//! 4. Within the bucket, draw two independent sizes and keep the minimum,
//!    biasing threads toward the low end of the bucket
//! 5. Append, subtract, repeat
//!
//! Every emitted size fits the remaining budget, so the plan always sums
//! exactly to the requested total.

use rand::Rng;
use tracing::debug;

use crate::types::{ThreadSizeBucket, DEFAULT_THREAD_SIZE_BUCKETS, MAX_THREAD_MESSAGES};

/// Pick a bucket by cumulative weight.
///
/// The boundary is inclusive: `roll <= cumulative` selects the bucket, so a
/// roll landing exactly on a boundary goes to the lower bucket. Changing this
/// rule silently would alter output distributions, so it is pinned by tests.
fn select_bucket<'a>(roll: f64, eligible: &[&'a ThreadSizeBucket]) -> &'a ThreadSizeBucket {
    let mut cumulative = 0.0;
    for bucket in eligible {
        cumulative += bucket.weight;
        if roll <= cumulative {
            return bucket;
        }
    }
    // Float summation slack on the final boundary; the walk is exhaustive.
    eligible[eligible.len() - 1]
}

/// Draw one thread size from a bucket, capped by the remaining budget.
fn draw_size(bucket: &ThreadSizeBucket, remaining: u64, rng: &mut impl Rng) -> u64 {
    let lo = u64::from(bucket.min);
    let hi = u64::from(bucket.max).min(remaining).min(MAX_THREAD_MESSAGES);
    if hi < lo {
        1
    } else if hi == lo {
        hi
    } else {
        // Min of two draws: an order-statistic sample skewing sizes low,
        // since most real conversations run shorter than a bucket's ceiling.
        let first = rng.random_range(lo..=hi);
        let second = rng.random_range(lo..=hi);
        first.min(second)
    }
}

/// Partition `total` messages into thread sizes.
///
/// The result sums exactly to `total`; every element is in `1..=50`.
/// `total == 0` yields an empty plan.
pub fn build_plan(total: u64, rng: &mut impl Rng) -> Vec<u64> {
    let mut plan = Vec::new();
    let mut remaining = total;

    while remaining > 0 {
        let eligible: Vec<&ThreadSizeBucket> = DEFAULT_THREAD_SIZE_BUCKETS
            .iter()
            .filter(|bucket| u64::from(bucket.min) <= remaining)
            .collect();

        if eligible.is_empty() {
            debug!(remaining, "no eligible bucket, emitting degenerate tail");
            plan.push(1);
            remaining -= 1;
            continue;
        }

        let total_weight: f64 = eligible.iter().map(|bucket| bucket.weight).sum();
        let roll = rng.random_range(0.0..total_weight);
        let bucket = select_bucket(roll, &eligible);
        let size = draw_size(bucket, remaining, rng);

        plan.push(size);
        remaining -= size;
    }

    plan
}
