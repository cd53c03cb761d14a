//! Connection management
//!
//! Tracks live WebSocket connections and which rooms each one has joined.

mod connection;
mod manager;

pub use connection::Connection;
pub use manager::ConnectionManager;
