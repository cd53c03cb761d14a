//! Reaction kind - the closed set of reactions a message supports

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of reaction a user can attach to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Heart,
}

impl ReactionKind {
    /// Database/wire representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Heart => "heart",
        }
    }

    /// All supported kinds
    pub const ALL: [Self; 2] = [Self::Like, Self::Heart];
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReactionKind {
    type Err = ReactionKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "heart" => Ok(Self::Heart),
            other => Err(ReactionKindParseError::Unknown(other.to_string())),
        }
    }
}

/// Error when parsing a reaction kind from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReactionKindParseError {
    #[error("unknown reaction kind: {0}")]
    Unknown(String),
}
