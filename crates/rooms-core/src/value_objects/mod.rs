//! Value objects - immutable domain primitives

mod reaction_kind;
mod snowflake;

pub use reaction_kind::{ReactionKind, ReactionKindParseError};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
