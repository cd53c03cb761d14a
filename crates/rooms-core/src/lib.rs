//! # rooms-core
//!
//! Domain layer containing entities, value objects, repository traits, and gateway events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AudioRef, Group, MediaRef, Message, MessageContent, Reaction, User, YoutubeRef,
};
pub use error::DomainError;
pub use events::GatewayEvent;
pub use traits::{
    GroupRepository, MessageRepository, RepoResult, RoomBroadcaster, UserRepository,
};
pub use value_objects::{ReactionKind, Snowflake, SnowflakeGenerator, SnowflakeParseError};
