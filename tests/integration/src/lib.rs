//! Integration test support library
//!
//! Shared fakes, fixtures, and server helpers used by the test binaries
//! under `tests/`.

pub mod fakes;
pub mod fixtures;
pub mod helpers;

pub use fakes::InMemoryStore;
pub use helpers::TestServer;
