//! Domain error taxonomy shared by repositories and services

use thiserror::Error;

/// Errors produced by domain operations
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("group not found")]
    GroupNotFound,

    #[error("message not found")]
    MessageNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("user is not a member of this group")]
    NotGroupMember,

    #[error("user is not an admin of this group")]
    NotGroupAdmin,

    #[error("operation requires owner privileges")]
    NotOwner,

    #[error("message must contain at least one content part")]
    InvalidContent,

    #[error("database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Stable machine-readable code carried in error payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::GroupNotFound => "GROUP_NOT_FOUND",
            Self::MessageNotFound => "MESSAGE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotGroupMember => "NOT_GROUP_MEMBER",
            Self::NotGroupAdmin => "NOT_GROUP_ADMIN",
            Self::NotOwner => "NOT_OWNER",
            Self::InvalidContent => "INVALID_CONTENT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Check if this error maps to a 404
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GroupNotFound | Self::MessageNotFound | Self::UserNotFound
        )
    }

    /// Check if this error maps to a 403
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotGroupMember | Self::NotGroupAdmin | Self::NotOwner
        )
    }

    /// Check if this error maps to a 400
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidContent)
    }
}
