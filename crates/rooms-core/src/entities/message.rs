//! Message entity - a chat message and its content parts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Opaque media descriptor returned by the upload collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub mimetype: String,
    /// True when the URL points outside our blob storage (e.g. a GIF service)
    #[serde(default)]
    pub external: bool,
}

/// Opaque YouTube descriptor returned by the search collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeRef {
    pub video_id: String,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
}

/// Opaque audio descriptor (voice clips)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRef {
    pub url: String,
    pub mimetype: String,
    pub duration_secs: Option<i32>,
}

/// Message body: any combination of parts, at least one present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<YoutubeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioRef>,
}

impl MessageContent {
    /// Text-only content
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Check that at least one part is present (blank text does not count)
    pub fn is_empty(&self) -> bool {
        let has_text = self
            .text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        !has_text && self.media.is_none() && self.youtube.is_none() && self.audio.is_none()
    }

    /// Validate content shape, rejecting empty bodies
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::InvalidContent);
        }
        Ok(())
    }
}

/// Message entity
///
/// Immutable after creation except for its reaction list, which lives in the
/// reaction store and is resolved on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub group_id: Snowflake,
    /// `None` for system messages
    pub sender_id: Option<Snowflake>,
    pub content: MessageContent,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new user-authored Message
    pub fn new(
        id: Snowflake,
        group_id: Snowflake,
        sender_id: Snowflake,
        content: MessageContent,
    ) -> Self {
        Self {
            id,
            group_id,
            sender_id: Some(sender_id),
            content,
            created_at: Utc::now(),
        }
    }

    /// Check if this is a system message (no sender)
    #[inline]
    pub fn is_system(&self) -> bool {
        self.sender_id.is_none()
    }

    /// Sort key realizing the total order of a group history
    #[inline]
    pub fn order_key(&self) -> (DateTime<Utc>, Snowflake) {
        (self.created_at, self.id)
    }
}
