//! User entity

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User entity
///
/// `is_owner` is the system-wide operator flag; owners pass every membership
/// check without appearing in any member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            is_owner: false,
            created_at: Utc::now(),
        }
    }
}
