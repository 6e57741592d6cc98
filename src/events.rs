use serde::{Deserialize, Serialize};

/// Role of a single turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation, in the shape the completion service expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-conversation state persisted by the state store.
///
/// Always fully populated: a store hands out `ConversationState::default()`
/// for conversations it has never seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    /// Number of exchanges processed. Write-only bookkeeping.
    #[serde(default)]
    pub message_count: u64,

    /// Stored user/assistant turns, oldest first.
    #[serde(default)]
    pub history: Vec<Turn>,
}

impl ConversationState {
    /// Maximum number of turns kept in `history`
    pub const HISTORY_LIMIT: usize = 20;

    /// Append a turn, dropping the oldest entries once the limit is exceeded
    pub fn push_turn(&mut self, turn: Turn) {
        self.history.push(turn);
        self.enforce_history_limit();
    }

    pub fn enforce_history_limit(&mut self) {
        if self.history.len() > Self::HISTORY_LIMIT {
            let excess = self.history.len() - Self::HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }
}

/// Kind of event delivered by the messaging host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventKind {
    /// A chat message. The text may be absent (attachments, typing events).
    Message { text: Option<String> },
    /// Someone was added to the conversation
    MemberAdded,
}

/// Inbound event as delivered by the messaging host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub id: String,
    pub conversation_id: String,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn message(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            kind: EventKind::Message {
                text: Some(text.into()),
            },
        }
    }

    pub fn member_added(conversation_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            kind: EventKind::MemberAdded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_limit_drops_oldest_first() {
        let mut state = ConversationState::default();
        for i in 0..25 {
            state.push_turn(Turn::user(format!("m{i}")));
        }

        assert_eq!(state.history.len(), ConversationState::HISTORY_LIMIT);
        assert_eq!(state.history.first().unwrap().content, "m5");
        assert_eq!(state.history.last().unwrap().content, "m24");
    }

    #[test]
    fn state_serializes_with_camel_case_fields() {
        let mut state = ConversationState::default();
        state.message_count = 3;
        state.history.push(Turn::assistant("hi"));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["messageCount"], 3);
        assert_eq!(json["history"][0]["role"], "assistant");
    }

    #[test]
    fn partial_state_deserializes_with_defaults() {
        let state: ConversationState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, ConversationState::default());
    }
}
