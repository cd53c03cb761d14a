//! Message database model

use chrono::{DateTime, Utc};
use rooms_core::entities::MessageContent;
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for messages table
///
/// Content parts are stored as a single JSONB column; the shape is owned by
/// the domain entity so the database never needs schema changes when a new
/// part kind is added.
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub group_id: i64,
    pub sender_id: Option<i64>,
    pub content: Json<MessageContent>,
    pub created_at: DateTime<Utc>,
}

impl MessageModel {
    /// Check if message is a system message
    #[inline]
    pub fn is_system(&self) -> bool {
        self.sender_id.is_none()
    }
}
