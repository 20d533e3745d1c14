//! Message types for thread-chain assembly.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One message in a conversation thread.
///
/// Seed fields (`id`, `sent_at`, `seq_in_thread`, `parent_id`, `subject`,
/// `from_email`) are supplied by the caller; the header fields (`message_id`,
/// `in_reply_to`, `references`) are assigned exactly once by
/// [`crate::threading::assemble`] and must not be mutated afterward.
///
/// ## Invariant
///
/// After assembly, `references` of a message is exactly the `references` of
/// its causal parent plus the parent's `message_id`; a root message carries
/// no `in_reply_to` and an empty `references` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// Stable message identifier.
    pub id: Uuid,
    /// When the message was sent.
    pub sent_at: NaiveDateTime,
    /// Position hint within the thread; tiebreaker after `sent_at`.
    pub seq_in_thread: u32,
    /// Declared causal parent, if any.
    pub parent_id: Option<Uuid>,
    /// Subject line.
    pub subject: String,
    /// Sender address; its domain feeds the message-id.
    pub from_email: String,
    /// RFC 5322 style message-id, assigned by assembly.
    pub message_id: Option<String>,
    /// Message-id of the causal parent, assigned by assembly.
    pub in_reply_to: Option<String>,
    /// Full back-reference chain, assigned by assembly.
    pub references: Vec<String>,
}

impl ThreadMessage {
    /// Create a message with unassigned headers.
    pub fn new(
        id: Uuid,
        sent_at: NaiveDateTime,
        seq_in_thread: u32,
        parent_id: Option<Uuid>,
        subject: String,
        from_email: String,
    ) -> Self {
        Self {
            id,
            sent_at,
            seq_in_thread,
            parent_id,
            subject,
            from_email,
            message_id: None,
            in_reply_to: None,
            references: Vec::new(),
        }
    }

    /// Causal ordering key: `(sent_at, seq_in_thread, id)` ascending.
    pub fn ordering_key(&self) -> (NaiveDateTime, u32, Uuid) {
        (self.sent_at, self.seq_in_thread, self.id)
    }

    /// Domain of the sender address, if the address has one.
    pub fn sender_domain(&self) -> Option<&str> {
        let (_, domain) = self.from_email.split_once('@')?;
        let domain = domain.trim();
        if domain.is_empty() {
            None
        } else {
            Some(domain)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make(from: &str) -> ThreadMessage {
        ThreadMessage::new(
            Uuid::from_u128(1),
            NaiveDate::from_ymd_opt(2024, 5, 6)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            0,
            None,
            "subject".to_string(),
            from.to_string(),
        )
    }

    #[test]
    fn test_sender_domain() {
        assert_eq!(make("ana@acme.example").sender_domain(), Some("acme.example"));
        assert_eq!(make("no-at-sign").sender_domain(), None);
        assert_eq!(make("trailing@").sender_domain(), None);
    }
}
