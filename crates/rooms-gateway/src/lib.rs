//! # rooms-gateway
//!
//! Real-time fan-out: WebSocket connection tracking, room membership of live
//! connections, and the client wire protocol. The HTTP layer owns the socket
//! upgrade; this crate owns everything after it.

pub mod broadcast;
pub mod connection;
pub mod protocol;

pub use connection::{Connection, ConnectionManager};
pub use protocol::ClientMessage;
