//! Individual WebSocket connection
//!
//! A connection is authenticated before it is registered, so the user is
//! known for its whole lifetime. One user may hold several connections.

use rooms_core::{GatewayEvent, Snowflake};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};

/// A single WebSocket connection
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Authenticated user
    user_id: Snowflake,

    /// Channel to send events to the socket writer task
    sender: mpsc::Sender<GatewayEvent>,

    /// Rooms this connection has joined
    rooms: RwLock<HashSet<Snowflake>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(
        session_id: String,
        user_id: Snowflake,
        sender: mpsc::Sender<GatewayEvent>,
    ) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            user_id,
            sender,
            rooms: RwLock::new(HashSet::new()),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the authenticated user
    pub fn user_id(&self) -> Snowflake {
        self.user_id
    }

    /// Add a room subscription
    pub async fn join_room(&self, group_id: Snowflake) {
        self.rooms.write().await.insert(group_id);
    }

    /// Remove a room subscription
    pub async fn leave_room(&self, group_id: Snowflake) {
        self.rooms.write().await.remove(&group_id);
    }

    /// Get all joined rooms
    pub async fn rooms(&self) -> Vec<Snowflake> {
        self.rooms.read().await.iter().copied().collect()
    }

    /// Check if joined to a room
    pub async fn is_in_room(&self, group_id: Snowflake) -> bool {
        self.rooms.read().await.contains(&group_id)
    }

    /// Get connection age
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Send an event to this connection
    pub async fn send(
        &self,
        event: GatewayEvent,
    ) -> Result<(), mpsc::error::SendError<GatewayEvent>> {
        self.sender.send(event).await
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}
