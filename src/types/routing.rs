//! Topic routing document and index types.
//!
//! ## Wire Layouts
//!
//! The structured documents are JSON; the topic index is a sequence of fixed
//! 12-byte records, `[offset: u64 little-endian][length: u32 little-endian]`,
//! one record per topic id (id = record index), pointing into a raw UTF-8
//! blob. Other implementations must match these layouts byte-for-byte to
//! interoperate with existing artifact bundles.

use serde::{Deserialize, Serialize};

/// Byte length of one topic index record.
pub const TOPIC_INDEX_RECORD_LEN: usize = 12;

/// Topic-id lists per audience type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceTopics {
    /// Topics for internal-only audiences.
    #[serde(default)]
    pub internal: Vec<u32>,
    /// Topics for external-only audiences.
    #[serde(default)]
    pub external: Vec<u32>,
    /// Topics valid for either audience.
    #[serde(default)]
    pub both: Vec<u32>,
}

impl AudienceTopics {
    /// Whether no topics are listed for any audience.
    pub fn is_empty(&self) -> bool {
        self.internal.is_empty() && self.external.is_empty() && self.both.is_empty()
    }
}

/// Send/receive topic eligibility for one routing scope.
///
/// Loaded from resource documents; immutable after load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRoutingTier {
    /// Topics the scope may send.
    #[serde(default)]
    pub send: AudienceTopics,
    /// Topics the scope may receive.
    #[serde(default)]
    pub receive: AudienceTopics,
}

/// One row of the role map document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMapEntry {
    /// Department the role belongs to.
    pub department: String,
    /// Role title.
    pub role: String,
    /// Identifier of the role's companion routing document.
    pub file_id: String,
}

/// One row of the department list document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentEntry {
    /// Department name.
    pub department: String,
    /// Slug naming the department's companion routing document.
    pub slug: String,
}

/// One fixed-width record of the binary topic index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicIndexEntry {
    /// Byte offset of the topic text within the blob.
    pub offset: u64,
    /// Byte length of the topic text.
    pub length: u32,
}

impl TopicIndexEntry {
    /// Decode a record from its 12-byte wire form.
    pub fn decode(record: &[u8; TOPIC_INDEX_RECORD_LEN]) -> Self {
        let mut offset = [0u8; 8];
        offset.copy_from_slice(&record[..8]);
        let mut length = [0u8; 4];
        length.copy_from_slice(&record[8..]);
        Self {
            offset: u64::from_le_bytes(offset),
            length: u32::from_le_bytes(length),
        }
    }

    /// Encode a record to its 12-byte wire form.
    pub fn encode(&self) -> [u8; TOPIC_INDEX_RECORD_LEN] {
        let mut record = [0u8; TOPIC_INDEX_RECORD_LEN];
        record[..8].copy_from_slice(&self.offset.to_le_bytes());
        record[8..].copy_from_slice(&self.length.to_le_bytes());
        record
    }

    /// Whether the record points inside a blob of `blob_len` bytes.
    ///
    /// A violating record is a lookup failure, never a crash.
    pub fn fits_within(&self, blob_len: usize) -> bool {
        match self.offset.checked_add(self.length as u64) {
            Some(end) => end <= blob_len as u64,
            None => false,
        }
    }
}
