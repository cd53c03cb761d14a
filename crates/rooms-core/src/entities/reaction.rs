//! Reaction entity - one user's reaction of one kind on one message

use chrono::{DateTime, Utc};

use crate::value_objects::{ReactionKind, Snowflake};

/// Reaction entity
///
/// At most one row exists per (message, user, kind); a second toggle of the
/// same kind removes this row instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(message_id: Snowflake, user_id: Snowflake, kind: ReactionKind) -> Self {
        Self {
            message_id,
            user_id,
            kind,
            created_at: Utc::now(),
        }
    }
}
