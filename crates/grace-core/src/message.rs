use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::action::ControlAction;
use crate::context::ContextEntry;

/// Who wrote a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Role name used in provider history.
    pub fn role(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in the conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Set on fixed crisis-resource replies.
    #[serde(default)]
    pub is_safety_resource: bool,
}

impl ChatTurn {
    /// A turn typed by the user.
    pub fn user(text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            text: text.to_string(),
            timestamp: Utc::now(),
            is_safety_resource: false,
        }
    }

    /// A turn produced from a gateway reply.
    pub fn assistant(reply: &Reply) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Assistant,
            text: reply.text.clone(),
            timestamp: Utc::now(),
            is_safety_resource: reply.is_safety_resource,
        }
    }
}

/// Ordered conversation turns, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Provider history for every turn so far.
    pub fn to_history(&self) -> Vec<ContextEntry> {
        self.turns
            .iter()
            .map(|t| ContextEntry {
                role: t.sender.role().to_string(),
                content: t.text.clone(),
            })
            .collect()
    }
}

/// Raw provider output plus how it was produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    pub metadata: CompletionMetadata,
}

/// Metadata about how a completion was generated.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompletionMetadata {
    /// Which provider produced this response.
    pub provider_used: String,
    /// Token count (if available from the provider).
    pub tokens_used: Option<u64>,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: u64,
    /// Model identifier (if applicable).
    pub model: Option<String>,
}

/// What the gateway hands back for one user message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub text: String,
    pub is_safety_resource: bool,
    pub action: Option<ControlAction>,
    pub insight: Option<Value>,
}

impl Reply {
    /// A fixed, pre-written reply with no control payload.
    pub fn fixed(text: &str, is_safety_resource: bool) -> Self {
        Self {
            text: text.to_string(),
            is_safety_resource,
            action: None,
            insight: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_history_roles() {
        let mut t = Transcript::new();
        t.push(ChatTurn::user("hey"));
        t.push(ChatTurn::assistant(&Reply::fixed("hi!", false)));
        let history = t.to_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].role, "assistant");
        assert_eq!(history[1].content, "hi!");
    }

    #[test]
    fn test_assistant_turn_carries_safety_flag() {
        let turn = ChatTurn::assistant(&Reply::fixed("call 988", true));
        assert_eq!(turn.sender, Sender::Assistant);
        assert!(turn.is_safety_resource);
    }

    #[test]
    fn test_chat_turn_serde_default_flag() {
        let json = format!(
            r#"{{"id":"{}","sender":"user","text":"yo","timestamp":"2026-03-01T12:00:00Z"}}"#,
            Uuid::new_v4()
        );
        let turn: ChatTurn = serde_json::from_str(&json).unwrap();
        assert!(!turn.is_safety_resource);
        assert_eq!(turn.sender, Sender::User);
    }
}
