use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::PlayerId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: String,
    pub from: PlayerId,
    pub name: String,
    pub msg: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(from: PlayerId, name: String, msg: String) -> Self {
        ChatMessage {
            message_id: uuid::Uuid::new_v4().to_string(),
            from,
            name,
            msg,
            timestamp: Utc::now(),
        }
    }
}
