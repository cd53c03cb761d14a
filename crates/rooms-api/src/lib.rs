//! # rooms-api
//!
//! HTTP and WebSocket server built with Axum. Hosts the REST surface and the
//! `/ws` gateway endpoint in a single process.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::run;
