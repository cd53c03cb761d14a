//! Database models - SQLx-compatible structs for PostgreSQL tables

mod group;
mod message;
mod reaction;
mod user;

pub use group::GroupModel;
pub use message::MessageModel;
pub use reaction::ReactionModel;
pub use user::UserModel;
