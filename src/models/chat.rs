use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The originator of a chat message
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatSender {
    /// Messages generated by the server, e.g. on join and leave
    System,
    /// A message written by a participant
    #[serde(rename_all = "camelCase")]
    Account {
        /// Uuid of the sender
        uuid: Uuid,
        /// Nickname at the time of sending
        nickname: String,
    },
}

/// A message of an event chat
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// The primary key of a message
    pub uuid: Uuid,
    /// The event this message belongs to
    pub event: Uuid,
    /// Who sent the message
    pub sender: ChatSender,
    /// The content of the message
    #[schema(example = "Hello there!")]
    pub text: String,
    /// The timestamp when the message was received
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub(crate) fn system(event: Uuid, text: String) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            event,
            sender: ChatSender::System,
            text,
            created_at: Utc::now(),
        }
    }
}
