//! Message entity <-> model mapper

use rooms_core::entities::{Message, MessageContent};
use rooms_core::value_objects::Snowflake;
use sqlx::types::Json;

use crate::models::MessageModel;

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            group_id: Snowflake::new(model.group_id),
            sender_id: model.sender_id.map(Snowflake::new),
            content: model.content.0,
            created_at: model.created_at,
        }
    }
}

/// Convert Message entity reference to values for database insertion
pub struct MessageInsert<'a> {
    pub id: i64,
    pub group_id: i64,
    pub sender_id: Option<i64>,
    pub content: Json<&'a MessageContent>,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            id: message.id.into_inner(),
            group_id: message.group_id.into_inner(),
            sender_id: message.sender_id.map(Snowflake::into_inner),
            content: Json(&message.content),
        }
    }
}
