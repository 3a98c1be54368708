//! Conversation Log
//!
//! The append-only message log for the single conversation thread. Messages
//! are never edited or removed during a session; the log only grows, and it
//! grows in ascending [`MessageId`] order.

use serde::{Deserialize, Serialize};

use crate::messages::{MessageId, MessageRole};

/// A message in the conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique, ascending message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: MessageRole,
    /// Message text
    pub text: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::next(),
            role: MessageRole::User,
            text: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::next(),
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }
}

/// The append-only conversation log
///
/// There is deliberately no operation to edit or delete a message. User
/// appends reject blank input; assistant appends are total (the engine only
/// produces non-empty assistant texts: bank entries, fixed texts, and
/// fallbacks).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message
    ///
    /// Returns `None` without touching the log when the text is blank or
    /// whitespace-only.
    pub fn append_user(&mut self, text: impl Into<String>) -> Option<MessageId> {
        let text = text.into();
        if text.trim().is_empty() {
            tracing::debug!("rejecting blank submission");
            return None;
        }
        let msg = ChatMessage::user(text);
        let id = msg.id;
        self.messages.push(msg);
        Some(id)
    }

    /// Append an assistant message
    pub fn append_assistant(&mut self, text: impl Into<String>) -> MessageId {
        let msg = ChatMessage::assistant(text);
        let id = msg.id;
        self.messages.push(msg);
        id
    }

    /// All messages, in append (= ascending id) order
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The most recently appended message
    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages in the log
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// The conversation-facing state owned by the controller
///
/// Kept as one explicit, serializable struct so a surface (or a test) can
/// snapshot it wholesale. The typing indicator is deliberately a single flag
/// shared by all in-flight response cycles, not one per cycle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationState {
    /// The append-only log
    pub log: ConversationLog,
    /// Whether the typing indicator is currently shown
    pub typing_indicator_visible: bool,
}

impl ConversationState {
    /// Fresh state for a new session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
