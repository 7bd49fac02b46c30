//! Per-session conversation transcript

use serde::{Deserialize, Serialize};

use crate::domain::llm::Message;

pub const NO_HISTORY_MESSAGE: &str = "No conversation history available.";

/// Ordered user/assistant exchanges of one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed exchange
    pub fn record_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(Message::user(user));
        self.messages.push(Message::assistant(assistant));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn turn_count(&self) -> usize {
        self.messages.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// One `Role: content` line per message
    pub fn render(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.display_label(), m.content()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Answer to a single chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    /// True when the answer came from the query cache
    pub cached: bool,
}

impl ChatReply {
    pub fn cached(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            cached: true,
        }
    }

    pub fn generated(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            cached: false,
        }
    }

    pub fn source_label(&self) -> &'static str {
        if self.cached { "cache" } else { "generated" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MessageRole;

    #[test]
    fn test_record_and_render() {
        let mut transcript = Transcript::new();
        transcript.record_turn("What is Rust?", "A systems language.");
        transcript.record_turn("Is it fast?", "Yes.");

        assert_eq!(transcript.turn_count(), 2);
        assert_eq!(transcript.messages()[0].role, MessageRole::User);
        assert_eq!(
            transcript.render(),
            "User: What is Rust?\nAssistant: A systems language.\nUser: Is it fast?\nAssistant: Yes."
        );
    }

    #[test]
    fn test_clear() {
        let mut transcript = Transcript::new();
        transcript.record_turn("hi", "hello");
        transcript.clear();

        assert!(transcript.is_empty());
        assert_eq!(transcript.render(), "");
    }

    #[test]
    fn test_reply_labels() {
        assert_eq!(ChatReply::cached("x").source_label(), "cache");
        assert_eq!(ChatReply::generated("x").source_label(), "generated");
    }
}
