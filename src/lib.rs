//! # corpus-kernel
//!
//! Deterministic statistical scaffolding for reproducible synthetic email
//! corpora.
//!
//! The corpus kernel answers the numeric and structural questions behind a
//! generated mailbox:
//!
//! > How many messages on this day? How long is each thread? Which ids and
//! > headers make the threads reproducible? Which topics may this role touch?
//!
//! ## Core Contract
//!
//! 1. Volume and thread-shape models produce statistically plausible counts
//!    with variance-aware bounds
//! 2. Every identifier, token, and seed derives from a hash of its inputs,
//!    so regeneration reproduces a corpus byte-for-byte
//! 3. Topic routing answers come from an immutable catalog with O(1)
//!    binary-indexed text retrieval
//!
//! ## Architecture
//!
//! ```text
//! Case Parameters → VolumeEstimator ─┐
//!          │              │          ├→ ThreadSizePlanner → ThreadingProtocol
//!          └→ BusinessCalendar ──────┘            │
//!                                     DeterministicIdentity
//!
//!            TopicRoutingCatalog (independent: role/department → topics)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same `(scope, parts)` → identical identifier/token/seed, on any machine
//! - Same storyline text and dates → identical normalized range
//! - Same seed data → identical threading headers
//! - Callers inject randomness everywhere else; a seeded generator makes any
//!   pipeline stage reproducible

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calendar;
pub mod catalog;
pub mod identity;
pub mod planner;
pub mod threading;
pub mod types;
pub mod volume;

// Re-exports
pub use types::{
    AudienceTopics, DayType, DayTypeCounts, DepartmentEntry, RoleMapEntry, ShiftDirection,
    ThreadMessage, ThreadSizeBucket, TopicIndexEntry, TopicRoutingTier, VolumeRange,
    DEFAULT_THREAD_SIZE_BUCKETS, MAX_THREAD_MESSAGES, TOPIC_INDEX_RECORD_LEN,
};

pub use calendar::{
    adjust_to_business_hours, classify_day, count_day_types_inclusive, normalize_storyline_range,
    shift_by_business_days, CalendarError, NormalizedRange, WORKDAY_END_HOUR, WORKDAY_START_HOUR,
};
pub use catalog::{
    CacheStats, CatalogError, DirResources, InMemoryResources, ResourceProvider,
    TopicRoutingCatalog,
};
pub use identity::{hex_token, identifier, seed, IdentityError, IDENTITY_VERSION};
pub use planner::build_plan;
pub use threading::{assemble, PLACEHOLDER_DOMAIN};
pub use volume::{
    business_day_range, day_range, estimate_total_for_range, weekend_range, VolumeError,
};

/// Schema version for all corpus kernel types.
/// Increment on breaking changes to any schema type.
pub const CORPUS_KERNEL_SCHEMA_VERSION: &str = "1.0.0";
