//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use rooms_core::entities::{Group, Message, Reaction, User};

use super::responses::{GroupResponse, MessageResponse, ReactionResponse, UserResponse};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Group Mappers
// ============================================================================

/// Helper struct pairing a group with its member count
pub struct GroupWithCount {
    pub group: Group,
    pub member_count: i64,
}

impl From<GroupWithCount> for GroupResponse {
    fn from(with_count: GroupWithCount) -> Self {
        let group = with_count.group;
        Self {
            id: group.id.to_string(),
            name: group.name,
            description: group.description,
            owner_id: group.owner_id.to_string(),
            admin_id: group.admin_id.map(|id| id.to_string()),
            member_count: with_count.member_count,
            created_at: group.created_at,
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

/// Helper struct pairing a message with its resolved sender and reactions
pub struct MessageWithSender {
    pub message: Message,
    pub sender: Option<User>,
    pub reactions: Vec<Reaction>,
}

impl From<MessageWithSender> for MessageResponse {
    fn from(details: MessageWithSender) -> Self {
        let message = details.message;
        Self {
            id: message.id.to_string(),
            group_id: message.group_id.to_string(),
            sender: details.sender.as_ref().map(UserResponse::from),
            content: message.content,
            reactions: details.reactions.iter().map(ReactionResponse::from).collect(),
            created_at: message.created_at,
        }
    }
}

impl From<&Reaction> for ReactionResponse {
    fn from(reaction: &Reaction) -> Self {
        Self {
            user_id: reaction.user_id.to_string(),
            kind: reaction.kind,
        }
    }
}
