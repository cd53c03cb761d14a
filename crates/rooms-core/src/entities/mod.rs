//! Domain entities - core business objects

mod group;
mod message;
mod reaction;
mod user;

pub use group::Group;
pub use message::{AudioRef, MediaRef, Message, MessageContent, YoutubeRef};
pub use reaction::Reaction;
pub use user::User;
