//! Entity to model mappers
//!
//! This module provides conversions between domain entities (rooms-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database operations

mod group;
mod message;
mod reaction;
mod user;

pub use group::GroupInsert;
pub use message::MessageInsert;
