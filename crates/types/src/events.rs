use serde::{Deserialize, Serialize};

/// One line of a chat's push stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    MessageInserted { chat_id: String, message_id: String },
    /// The subscriber fell behind and missed events; refetch everything.
    Resync { chat_id: String },
}

impl ChatEvent {
    pub fn chat_id(&self) -> &str {
        match self {
            ChatEvent::MessageInserted { chat_id, .. } | ChatEvent::Resync { chat_id } => chat_id,
        }
    }
}
