//! Core types for the corpus kernel.

pub mod bucket;
pub mod day;
pub mod message;
pub mod routing;
pub mod volume;

pub use bucket::{ThreadSizeBucket, DEFAULT_THREAD_SIZE_BUCKETS, MAX_THREAD_MESSAGES};
pub use day::{DayType, DayTypeCounts, ShiftDirection};
pub use message::ThreadMessage;
pub use routing::{
    AudienceTopics, DepartmentEntry, RoleMapEntry, TopicIndexEntry, TopicRoutingTier,
    TOPIC_INDEX_RECORD_LEN,
};
pub use volume::VolumeRange;
