//! Chat transcript rules.
//!
//! The transcript is append-only within a session and cleared on reset.
//! Blank user input never makes it in.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// System message appended when a chat-variant submission succeeds.
pub const SUBMITTED_MESSAGE: &str = "Video submitted successfully!";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub origin: Origin,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    fn new(text: String, origin: Origin) -> Self {
        Self {
            text,
            origin,
            sent_at: Utc::now(),
        }
    }
}

/// Ordered, append-only list of chat messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message. Returns `false` (and appends nothing) when the
    /// text is empty after trimming.
    pub fn push_user(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.messages
            .push(ChatMessage::new(text.to_string(), Origin::User));
        true
    }

    pub fn push_system(&mut self, text: impl Into<String>) {
        self.messages
            .push(ChatMessage::new(text.into(), Origin::System));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_user_input_is_ignored() {
        let mut transcript = ChatTranscript::new();
        assert!(!transcript.push_user(""));
        assert!(!transcript.push_user("   "));
        assert!(!transcript.push_user("\n\t "));
        assert!(transcript.is_empty());
    }

    #[test]
    fn user_text_is_kept_as_typed() {
        let mut transcript = ChatTranscript::new();
        assert!(transcript.push_user("  hello there "));
        let last = transcript.last().unwrap();
        assert_eq!(last.text, "  hello there ");
        assert_eq!(last.origin, Origin::User);
    }

    #[test]
    fn messages_keep_append_order() {
        let mut transcript = ChatTranscript::new();
        transcript.push_system(SUBMITTED_MESSAGE);
        transcript.push_user("first");
        transcript.push_user("second");

        let texts: Vec<_> = transcript.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, [SUBMITTED_MESSAGE, "first", "second"]);
        assert_eq!(transcript.messages()[0].origin, Origin::System);
        assert!(transcript.messages()[0].sent_at <= transcript.messages()[2].sent_at);
    }

    #[test]
    fn clear_empties_the_transcript() {
        let mut transcript = ChatTranscript::new();
        transcript.push_user("a");
        transcript.push_system("b");
        transcript.clear();
        assert_eq!(transcript.len(), 0);
        assert!(transcript.last().is_none());
    }

    #[test]
    fn origin_serializes_snake_case() {
        assert_eq!(serde_json::to_value(Origin::System).unwrap(), "system");
        assert_eq!(serde_json::to_value(Origin::User).unwrap(), "user");
    }
}
