use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Normal,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub origin: MessageOrigin,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageOrigin::User, text, MessageStatus::Normal)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageOrigin::Assistant, text, MessageStatus::Normal)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageOrigin::Assistant, text, MessageStatus::Warning)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageOrigin::Assistant, text, MessageStatus::Error)
    }

    fn new(origin: MessageOrigin, text: impl Into<String>, status: MessageStatus) -> Self {
        Self {
            origin,
            text: text.into(),
            timestamp: Utc::now(),
            status,
        }
    }
}

/// Append-only, ordered message history of one chat session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
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

    /// Only used when a session restarts.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_preserves_order() {
        let mut transcript = ChatTranscript::new();
        transcript.push(ChatMessage::assistant("welcome"));
        transcript.push(ChatMessage::user("question"));
        transcript.push(ChatMessage::error("failure"));

        let origins: Vec<MessageOrigin> =
            transcript.messages().iter().map(|m| m.origin).collect();
        assert_eq!(
            origins,
            vec![
                MessageOrigin::Assistant,
                MessageOrigin::User,
                MessageOrigin::Assistant
            ]
        );
        assert_eq!(transcript.last().map(|m| m.status), Some(MessageStatus::Error));

        transcript.clear();
        assert!(transcript.is_empty());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(ChatMessage::warning("note")).unwrap();
        assert_eq!(json["status"], "warning");
        assert_eq!(json["origin"], "assistant");
    }
}
