mod broadcaster;
mod repositories;

pub use broadcaster::RoomBroadcaster;
pub use repositories::{GroupRepository, MessageRepository, RepoResult, UserRepository};
