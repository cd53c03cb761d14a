//! User entity <-> model mapper

use rooms_core::entities::User;
use rooms_core::value_objects::Snowflake;

use crate::models::UserModel;

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            is_owner: model.is_owner,
            created_at: model.created_at,
        }
    }
}
