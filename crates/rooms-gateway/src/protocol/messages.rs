//! Client message format

use rooms_core::Snowflake;
use serde::{Deserialize, Serialize};

/// Frames a client may send over the socket
///
/// Joining subscribes the connection to a room's events; the server verifies
/// group membership before honoring it. Anything else on the wire is a
/// protocol error and closes the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "camelCase")]
#[serde(rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Subscribe this connection to a group's events
    Join { group_id: Snowflake },
    /// Unsubscribe this connection from a group's events
    Leave { group_id: Snowflake },
}

impl ClientMessage {
    /// Deserialize from a text frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to a text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
