//! Events fanned out to room subscribers after state changes persist

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Gateway event, serialized as `{"event": "...", "data": {...}}`
///
/// Every event carries the group it concerns so the broadcaster can route it
/// without inspecting the payload further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
#[serde(rename_all_fields = "camelCase")]
pub enum GatewayEvent {
    /// A message was persisted to the group history
    MessageReceived {
        group_id: Snowflake,
        message: serde_json::Value,
    },
    /// A reaction was toggled; carries the message with its refreshed
    /// reaction list so clients can replace it wholesale
    ReactionUpdated {
        group_id: Snowflake,
        message: serde_json::Value,
    },
    /// A message was removed from the group history
    MessageDeleted {
        group_id: Snowflake,
        message_id: Snowflake,
    },
    /// The group and its history were removed
    GroupDeleted { group_id: Snowflake },
    /// A user joined the group
    MemberJoined { group_id: Snowflake, user_id: Snowflake },
    /// A user was removed from the group by an admin
    MemberKicked { group_id: Snowflake, user_id: Snowflake },
    /// Sent directly to the removed user, not broadcast to the room
    Kicked { group_id: Snowflake },
}

impl GatewayEvent {
    /// Group this event routes to
    pub fn group_id(&self) -> Snowflake {
        match self {
            Self::MessageReceived { group_id, .. }
            | Self::ReactionUpdated { group_id, .. }
            | Self::MessageDeleted { group_id, .. }
            | Self::GroupDeleted { group_id }
            | Self::MemberJoined { group_id, .. }
            | Self::MemberKicked { group_id, .. }
            | Self::Kicked { group_id } => *group_id,
        }
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::MessageReceived { .. } => "messageReceived",
            Self::ReactionUpdated { .. } => "reactionUpdated",
            Self::MessageDeleted { .. } => "messageDeleted",
            Self::GroupDeleted { .. } => "groupDeleted",
            Self::MemberJoined { .. } => "memberJoined",
            Self::MemberKicked { .. } => "memberKicked",
            Self::Kicked { .. } => "kicked",
        }
    }
}
