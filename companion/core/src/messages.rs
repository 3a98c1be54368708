//! Companion Messages
//!
//! Messages sent from the engine to UI surfaces. These represent all the ways
//! the interaction core can communicate with any connected UI (web widget,
//! TUI, test harness, etc.).
//!
//! # Design Philosophy
//!
//! The engine is the "brain" that owns the conversation log, the typing
//! indicator, and the companion's escalation phase. UI surfaces are pure
//! renderers that display what the engine tells them to. Surfaces never
//! mutate engine state directly; they send [`crate::events::SurfaceEvent`]s
//! and render the messages that come back.

use serde::{Deserialize, Serialize};

use crate::escalation::EscalationPhase;

/// Messages from the engine to a UI surface
///
/// These messages tell the UI what to display. The UI should not have any
/// conversation logic - just render what it's told.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CompanionMessage {
    /// A message was appended to the conversation log
    Message {
        /// Unique, ascending message ID
        id: MessageId,
        /// Who sent this message
        role: MessageRole,
        /// The message text
        text: String,
    },

    /// The typing indicator changed visibility
    TypingIndicator {
        /// Whether the indicator should be shown
        visible: bool,
    },

    /// The companion moved to a new escalation phase
    ///
    /// Surfaces use this to play the warning shake, the exit animation
    /// (`Leaving`), and to remove the character for good (`Left`).
    PhaseChanged {
        /// The phase just entered
        phase: EscalationPhase,
    },
}

/// Message identifier
///
/// Derived from the epoch-millisecond clock and bumped past the previously
/// issued value when the clock has not advanced, so ids are strictly
/// increasing even for appends within the same millisecond. The conversation
/// log is ordered by ascending id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Generate the next message ID
    #[must_use]
    pub fn next() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        static LAST: AtomicU64 = AtomicU64::new(0);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let prev = LAST
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_default();
        Self(now.max(prev + 1))
    }
}

/// Who sent a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// User input
    User,
    /// The companion (Rusty)
    Assistant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_unique() {
        let id1 = MessageId::next();
        let id2 = MessageId::next();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_message_ids_strictly_increase() {
        let mut last = MessageId::next();
        for _ in 0..1000 {
            let next = MessageId::next();
            assert!(next > last, "{next:?} should be greater than {last:?}");
            last = next;
        }
    }

    #[test]
    fn test_message_id_roundtrips_through_json() {
        let id = MessageId::next();
        let json = serde_json::to_string(&id).unwrap();
        let back: MessageId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
