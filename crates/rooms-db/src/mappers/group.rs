//! Group entity <-> model mapper

use rooms_core::entities::Group;
use rooms_core::value_objects::Snowflake;

use crate::models::GroupModel;

/// Convert GroupModel to Group entity
impl From<GroupModel> for Group {
    fn from(model: GroupModel) -> Self {
        Group {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            owner_id: Snowflake::new(model.owner_id),
            admin_id: model.admin_id.map(Snowflake::new),
            created_at: model.created_at,
        }
    }
}

/// Convert Group entity reference to values for database insertion
pub struct GroupInsert<'a> {
    pub id: i64,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub owner_id: i64,
    pub admin_id: Option<i64>,
}

impl<'a> GroupInsert<'a> {
    pub fn new(group: &'a Group) -> Self {
        Self {
            id: group.id.into_inner(),
            name: &group.name,
            description: group.description.as_deref(),
            owner_id: group.owner_id.into_inner(),
            admin_id: group.admin_id.map(Snowflake::into_inner),
        }
    }
}
