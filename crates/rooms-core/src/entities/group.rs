//! Group entity - a chat room with an owner, an admin, and a member set

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Group entity
///
/// The member set itself lives in the membership store; the entity carries the
/// roles that are authorized implicitly regardless of that set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    /// Immutable after creation
    pub owner_id: Snowflake,
    /// May be transferred by the current admin
    pub admin_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a new Group; the creator becomes owner and admin
    pub fn new(id: Snowflake, name: String, owner_id: Snowflake) -> Self {
        Self {
            id,
            name,
            description: None,
            owner_id,
            admin_id: Some(owner_id),
            created_at: Utc::now(),
        }
    }

    /// Check if a user is this group's admin
    #[inline]
    pub fn is_admin(&self, user_id: Snowflake) -> bool {
        self.admin_id == Some(user_id)
    }

    /// Owner and admin are authorized as members even when absent from the
    /// member set.
    #[inline]
    pub fn is_privileged(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id || self.is_admin(user_id)
    }

    /// Update the description (admin-only at the service layer)
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Hand the admin role to another user
    pub fn transfer_admin(&mut self, new_admin_id: Snowflake) {
        self.admin_id = Some(new_admin_id);
    }
}
