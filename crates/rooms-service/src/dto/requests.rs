//! Request DTOs for API endpoints
//!
//! Wire field names are camelCase to match the client. All request DTOs
//! implement `Deserialize`, and `Validate` where input constraints apply.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use rooms_core::entities::{AudioRef, MediaRef, MessageContent, YoutubeRef};
use rooms_core::ReactionKind;

// ============================================================================
// Group Requests
// ============================================================================

/// Create group request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Update group request (admin-only fields)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// Transfer the admin role to this user
    pub admin_id: Option<String>,
}

/// Kick member request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KickMemberRequest {
    pub user_id: String,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Create message request
///
/// At least one content part must be present; emptiness is checked against
/// the assembled [`MessageContent`], not here, so that a blank `text` field
/// does not count as content.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(max = 4000, message = "Message text must be at most 4000 characters"))]
    pub text: Option<String>,

    pub media: Option<MediaRef>,

    pub youtube: Option<YoutubeRef>,

    pub audio: Option<AudioRef>,
}

impl CreateMessageRequest {
    /// Assemble the domain content from the request parts
    pub fn into_content(self) -> MessageContent {
        MessageContent {
            text: self.text,
            media: self.media,
            youtube: self.youtube,
            audio: self.audio,
        }
    }
}

/// Toggle reaction request
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleReactionRequest {
    pub kind: ReactionKind,
}

/// Query parameters for listing group messages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMessagesQuery {
    /// Only return messages created at or after this instant
    pub since: Option<DateTime<Utc>>,
}
