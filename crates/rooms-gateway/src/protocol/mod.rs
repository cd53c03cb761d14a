//! Gateway wire protocol
//!
//! Clients send room control frames; the server sends `GatewayEvent` frames
//! (serialized by rooms-core). There is no client-to-client relay: messages
//! enter through the REST API and come back out here after they persist.

mod messages;

pub use messages::ClientMessage;
