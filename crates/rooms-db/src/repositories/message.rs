//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use rooms_core::entities::{Message, Reaction};
use rooms_core::error::DomainError;
use rooms_core::traits::{MessageRepository, RepoResult};
use rooms_core::value_objects::{ReactionKind, Snowflake};

use crate::mappers::MessageInsert;
use crate::models::{MessageModel, ReactionModel};

use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, group_id, sender_id, content, created_at
            FROM messages
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_by_group(
        &self,
        group_id: Snowflake,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<Vec<Message>> {
        // (created_at, id) is the total order of a group history; equal
        // timestamps tie-break on id so replays are deterministic.
        let results = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, group_id, sender_id, content, created_at
            FROM messages
            WHERE group_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(group_id.into_inner())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        let insert = MessageInsert::new(message);

        sqlx::query(
            r"
            INSERT INTO messages (id, group_id, sender_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(insert.id)
        .bind(insert.group_id)
        .bind(insert.sender_id)
        .bind(insert.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::GroupNotFound))?;

        Ok(())
    }

    /// Hard delete; reactions cascade with the row.
    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM messages WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MessageNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_group(&self, group_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM messages WHERE group_id = $1
            ",
        )
        .bind(group_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    /// Flip the reaction in one statement so concurrent toggles serialize
    /// inside Postgres instead of racing between a delete and an insert.
    ///
    /// The degenerate case (no row deleted, insert lost the unique conflict)
    /// means an identical toggle committed concurrently and owns the row, so
    /// the reaction is active.
    #[instrument(skip(self))]
    async fn toggle_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<bool> {
        let (removed, _added) = sqlx::query_as::<_, (i64, i64)>(
            r"
            WITH removed AS (
                DELETE FROM reactions
                WHERE message_id = $1 AND user_id = $2 AND kind = $3
                RETURNING 1
            ),
            added AS (
                INSERT INTO reactions (message_id, user_id, kind, created_at)
                SELECT $1, $2, $3, NOW()
                WHERE NOT EXISTS (SELECT 1 FROM removed)
                ON CONFLICT (message_id, user_id, kind) DO NOTHING
                RETURNING 1
            )
            SELECT
                (SELECT COUNT(*) FROM removed),
                (SELECT COUNT(*) FROM added)
            ",
        )
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::MessageNotFound))?;

        // removed > 0: toggled off. Otherwise the row exists, whether our
        // insert won or a concurrent identical toggle beat it to the key.
        Ok(removed == 0)
    }

    #[instrument(skip(self))]
    async fn reactions_for(&self, message_ids: &[Snowflake]) -> RepoResult<Vec<Reaction>> {
        if message_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = message_ids.iter().map(|s| s.into_inner()).collect();

        let results = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT message_id, user_id, kind, created_at
            FROM reactions
            WHERE message_id = ANY($1)
            ORDER BY created_at
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Reaction::try_from).collect()
    }
}
