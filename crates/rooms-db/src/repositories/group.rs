//! PostgreSQL implementation of GroupRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use rooms_core::entities::Group;
use rooms_core::error::DomainError;
use rooms_core::traits::{GroupRepository, RepoResult};
use rooms_core::value_objects::Snowflake;

use crate::mappers::GroupInsert;
use crate::models::GroupModel;

use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of GroupRepository
#[derive(Clone)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    /// Create a new PgGroupRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Group>> {
        let result = sqlx::query_as::<_, GroupModel>(
            r"
            SELECT id, name, description, owner_id, admin_id, created_at
            FROM groups
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Group::from))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Group>> {
        let results = sqlx::query_as::<_, GroupModel>(
            r"
            SELECT id, name, description, owner_id, admin_id, created_at
            FROM groups
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Group::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, group: &Group) -> RepoResult<()> {
        let insert = GroupInsert::new(group);

        sqlx::query(
            r"
            INSERT INTO groups (id, name, description, owner_id, admin_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(insert.id)
        .bind(insert.name)
        .bind(insert.description)
        .bind(insert.owner_id)
        .bind(insert.admin_id)
        .bind(group.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, group: &Group) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE groups
            SET name = $2, description = $3, admin_id = $4
            WHERE id = $1
            ",
        )
        .bind(group.id.into_inner())
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.admin_id.map(Snowflake::into_inner))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GroupNotFound);
        }

        Ok(())
    }

    /// Hard delete; messages, reactions, and the member list go with the
    /// group in one statement via ON DELETE CASCADE.
    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM groups WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GroupNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO group_members (group_id, user_id, joined_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (group_id, user_id) DO NOTHING
            ",
        )
        .bind(group_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::GroupNotFound))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            DELETE FROM group_members WHERE group_id = $1 AND user_id = $2
            ",
        )
        .bind(group_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn is_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        // The owner and admin count as members without a member-list row.
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM groups
                WHERE id = $1 AND (owner_id = $2 OR admin_id = $2)
            ) OR EXISTS (
                SELECT 1 FROM group_members
                WHERE group_id = $1 AND user_id = $2
            )
            ",
        )
        .bind(group_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn member_count(&self, group_id: Snowflake) -> RepoResult<i64> {
        let result = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM group_members WHERE group_id = $1
            ",
        )
        .bind(group_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}
