//! Route handlers
//!
//! All HTTP and WebSocket request handlers organized by domain.

pub mod groups;
pub mod health;
pub mod messages;
pub mod ws;
