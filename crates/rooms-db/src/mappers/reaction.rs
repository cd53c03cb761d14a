//! Reaction entity <-> model mapper

use rooms_core::entities::Reaction;
use rooms_core::error::DomainError;
use rooms_core::value_objects::{ReactionKind, Snowflake};

use crate::models::ReactionModel;

/// Convert ReactionModel to Reaction entity
///
/// Fallible because the kind column is text; a CHECK constraint keeps it in
/// range, so a parse failure means the row predates a schema change.
impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let kind: ReactionKind = model
            .kind
            .parse()
            .map_err(|_| DomainError::DatabaseError(format!("unknown reaction kind: {}", model.kind)))?;

        Ok(Reaction {
            message_id: Snowflake::new(model.message_id),
            user_id: Snowflake::new(model.user_id),
            kind,
            created_at: model.created_at,
        })
    }
}
