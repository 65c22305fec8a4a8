// dtos/messagedtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::messagemodel::Message;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SendMessageDto {
    pub recipient_id: Uuid,

    #[validate(length(min = 1, max = 5000, message = "Message text is required"))]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterMessageDto {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl FilterMessageDto {
    pub fn filter_message(message: &Message) -> Self {
        FilterMessageDto {
            id: message.id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            text: message.text.to_owned(),
            created_at: message.created_at,
        }
    }

    pub fn filter_messages(messages: &[Message]) -> Vec<Self> {
        messages.iter().map(Self::filter_message).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponseDto {
    pub status: String,
    pub message: FilterMessageDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationResponseDto {
    pub status: String,
    pub messages: Vec<FilterMessageDto>,
    pub results: i64,
}
