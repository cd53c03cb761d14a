//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Group, Message, Reaction, User};
use crate::error::DomainError;
use crate::value_objects::{ReactionKind, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Check the system-wide operator flag
    async fn is_owner(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Group Repository
// ============================================================================

#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Find group by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Group>>;

    /// List all groups, newest first
    async fn find_all(&self) -> RepoResult<Vec<Group>>;

    /// Create a new group
    async fn create(&self, group: &Group) -> RepoResult<()>;

    /// Update an existing group
    async fn update(&self, group: &Group) -> RepoResult<()>;

    /// Delete a group and cascade its history
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Add user to the member list
    async fn add_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Remove user from the member list
    async fn remove_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Check membership, counting the group owner and admin as members even
    /// when they never appear in the member list
    async fn is_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Get member count for a group
    async fn member_count(&self, group_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// List group history in `(created_at, id)` order, optionally only
    /// messages created at or after `since`
    async fn find_by_group(
        &self,
        group_id: Snowflake,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<Vec<Message>>;

    /// Persist a new message; fails with `GroupNotFound` if the group was
    /// deleted concurrently
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Delete a message and its reactions
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Delete all messages in a group
    async fn delete_by_group(&self, group_id: Snowflake) -> RepoResult<u64>;

    /// Atomically flip one user's reaction of one kind, returning whether the
    /// reaction is active afterwards
    async fn toggle_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<bool>;

    /// Get all reactions for a set of messages
    async fn reactions_for(&self, message_ids: &[Snowflake]) -> RepoResult<Vec<Reaction>>;
}
