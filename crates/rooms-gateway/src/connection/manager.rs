//! Connection manager
//!
//! Manages all active WebSocket connections using DashMap for thread-safe access.

use super::Connection;
use dashmap::DashMap;
use rooms_core::{GatewayEvent, Snowflake};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Manages all active WebSocket connections
///
/// Uses `DashMap` for concurrent access to connection state. The room index
/// is what the broadcaster routes on; the user index serves targeted sends
/// (a kicked user gets told directly, not through the room).
pub struct ConnectionManager {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// User ID to session IDs mapping
    user_connections: DashMap<Snowflake, HashSet<String>>,

    /// Room (group) ID to session IDs mapping
    room_connections: DashMap<Snowflake, HashSet<String>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
            room_connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new authenticated connection
    pub fn add_connection(
        &self,
        session_id: String,
        user_id: Snowflake,
        sender: mpsc::Sender<GatewayEvent>,
    ) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), user_id, sender);
        self.connections
            .insert(session_id.clone(), connection.clone());

        self.user_connections
            .entry(user_id)
            .or_default()
            .insert(session_id.clone());

        tracing::debug!(session_id = %session_id, user_id = %user_id, "Connection added");

        connection
    }

    /// Remove a connection and every index entry pointing at it
    ///
    /// Uses `alter` for atomic modify-and-cleanup operations to avoid TOCTOU race conditions.
    pub async fn remove_connection(&self, session_id: &str) {
        if let Some((_, connection)) = self.connections.remove(session_id) {
            // Drop the session from its user entry
            self.user_connections
                .alter(&connection.user_id(), |_, mut sessions| {
                    sessions.remove(session_id);
                    sessions
                });
            self.user_connections
                .retain(|_, sessions| !sessions.is_empty());

            // Remove from room mappings
            for room_id in connection.rooms().await {
                self.room_connections.alter(&room_id, |_, mut sessions| {
                    sessions.remove(session_id);
                    sessions
                });
            }
            self.room_connections
                .retain(|_, sessions| !sessions.is_empty());

            tracing::debug!(session_id = %session_id, "Session detached");
        }
    }

    /// Get a connection by session ID
    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Subscribe a connection to a room
    pub async fn join_room(&self, session_id: &str, group_id: Snowflake) -> bool {
        if let Some(connection) = self.connections.get(session_id) {
            connection.join_room(group_id).await;

            self.room_connections
                .entry(group_id)
                .or_default()
                .insert(session_id.to_string());

            tracing::trace!(
                session_id = %session_id,
                group_id = %group_id,
                "Connection joined room"
            );

            true
        } else {
            false
        }
    }

    /// Unsubscribe a connection from a room
    pub async fn leave_room(&self, session_id: &str, group_id: Snowflake) -> bool {
        if let Some(connection) = self.connections.get(session_id) {
            connection.leave_room(group_id).await;

            self.room_connections.alter(&group_id, |_, mut sessions| {
                sessions.remove(session_id);
                sessions
            });
            self.room_connections
                .retain(|_, sessions| !sessions.is_empty());

            tracing::trace!(
                session_id = %session_id,
                group_id = %group_id,
                "Connection left room"
            );

            true
        } else {
            false
        }
    }

    /// Detach every connection from a room (the room no longer exists)
    pub async fn drop_room(&self, group_id: Snowflake) {
        if let Some((_, sessions)) = self.room_connections.remove(&group_id) {
            for session_id in sessions {
                if let Some(connection) = self.connections.get(&session_id) {
                    connection.leave_room(group_id).await;
                }
            }

            tracing::debug!(group_id = %group_id, "Room dropped");
        }
    }

    /// Get all connections joined to a room
    pub fn get_room_connections(&self, group_id: Snowflake) -> Vec<Arc<Connection>> {
        self.room_connections
            .get(&group_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get all connections for a user
    pub fn get_user_connections(&self, user_id: Snowflake) -> Vec<Arc<Connection>> {
        self.user_connections
            .get(&user_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Send an event to every connection in a room, best-effort
    pub async fn send_to_room(&self, group_id: Snowflake, event: GatewayEvent) -> usize {
        let connections = self.get_room_connections(group_id);
        let mut sent = 0;

        for conn in connections {
            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            group_id = %group_id,
            sent = sent,
            "Event sent to room connections"
        );

        sent
    }

    /// Send an event to every connection of a user, best-effort
    pub async fn send_to_user(&self, user_id: Snowflake, event: GatewayEvent) -> usize {
        let connections = self.get_user_connections(user_id);
        let mut sent = 0;

        for conn in connections {
            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            user_id = %user_id,
            sent = sent,
            "Event sent to user connections"
        );

        sent
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of unique connected users
    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }

    /// Get the number of rooms with active connections
    pub fn room_count(&self) -> usize {
        self.room_connections.len()
    }

    /// Check if a session exists
    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }

    /// Clean up connections whose socket writer has gone away
    pub async fn cleanup_closed_connections(&self) -> usize {
        let closed: Vec<String> = self
            .connections
            .iter()
            .filter(|r| r.is_closed())
            .map(|r| r.key().clone())
            .collect();

        let count = closed.len();

        for session_id in closed {
            self.remove_connection(&session_id).await;
        }

        if count > 0 {
            tracing::info!(count = count, "Reaped closed sessions");
        }

        count
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("users", &self.user_connections.len())
            .field("rooms", &self.room_connections.len())
            .finish()
    }
}
