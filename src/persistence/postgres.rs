//! PostgreSQL implementation of [`MatchStore`].
//!
//! Schema lives in `migrations/`. Poll counters rely on the
//! `(event_id, option_name)` primary key: seeding is `ON CONFLICT DO
//! NOTHING` and voting is a single upsert, so concurrent first readers or
//! voters never duplicate rows or lose increments.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{
    ChatMessageRow, EventRow, PollOptionRow, chat_message_from_row, event_from_row,
    poll_option_from_row, sql_limit,
};
use super::{MatchStore, StoreResult};
use crate::domain::{ChatMessage, Event, EventId, EventStatus, NewChatMessage, PollOption};
use crate::error::MatchdayError;

const EVENT_COLUMNS: &str =
    "id, team_a, team_b, league, start_time, stream_url, status, created_at, updated_at";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchdayError::PersistenceError`] if the database cannot
    /// be reached within `acquire_timeout`.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, MatchdayError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchdayError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), MatchdayError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

impl MatchStore for PostgresStore {
    fn get_event(&self, id: EventId) -> BoxFuture<'_, StoreResult<Option<Event>>> {
        Box::pin(async move {
            let row = sqlx::query_as::<_, EventRow>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
            ))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

            row.map(event_from_row).transpose()
        })
    }

    fn list_events(&self, status: Option<EventStatus>) -> BoxFuture<'_, StoreResult<Vec<Event>>> {
        Box::pin(async move {
            let rows = sqlx::query_as::<_, EventRow>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events \
                 WHERE ($1::text IS NULL OR status = $1) \
                 ORDER BY start_time ASC, created_at ASC"
            ))
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;

            rows.into_iter().map(event_from_row).collect()
        })
    }

    fn insert_event<'a>(&'a self, event: &'a Event) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            sqlx::query(
                "INSERT INTO events \
                 (id, team_a, team_b, league, start_time, stream_url, status, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(*event.id.as_uuid())
            .bind(&event.team_a)
            .bind(&event.team_b)
            .bind(&event.league)
            .bind(event.start_time)
            .bind(&event.stream_url)
            .bind(event.status.as_str())
            .bind(event.created_at)
            .bind(event.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }

    fn update_event<'a>(&'a self, event: &'a Event) -> BoxFuture<'a, StoreResult<bool>> {
        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE events SET team_a = $2, team_b = $3, league = $4, start_time = $5, \
                 stream_url = $6, status = $7, updated_at = $8 WHERE id = $1",
            )
            .bind(*event.id.as_uuid())
            .bind(&event.team_a)
            .bind(&event.team_b)
            .bind(&event.league)
            .bind(event.start_time)
            .bind(&event.stream_url)
            .bind(event.status.as_str())
            .bind(event.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn delete_event(&self, id: EventId) -> BoxFuture<'_, StoreResult<bool>> {
        Box::pin(async move {
            // poll_options and chat_messages go with it via ON DELETE CASCADE
            let result = sqlx::query("DELETE FROM events WHERE id = $1")
                .bind(*id.as_uuid())
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn poll_options(&self, event_id: EventId) -> BoxFuture<'_, StoreResult<Vec<PollOption>>> {
        Box::pin(async move {
            let rows = sqlx::query_as::<_, PollOptionRow>(
                "SELECT event_id, option_name, votes, updated_at FROM poll_options \
                 WHERE event_id = $1 ORDER BY option_name ASC",
            )
            .bind(*event_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.into_iter().map(poll_option_from_row).collect())
        })
    }

    fn seed_poll_options<'a>(
        &'a self,
        event_id: EventId,
        names: &'a [String],
    ) -> BoxFuture<'a, StoreResult<u64>> {
        Box::pin(async move {
            let result = sqlx::query(
                "INSERT INTO poll_options (event_id, option_name, votes, updated_at) \
                 SELECT $1, name, 0, now() FROM UNNEST($2::text[]) AS name \
                 ON CONFLICT (event_id, option_name) DO NOTHING",
            )
            .bind(*event_id.as_uuid())
            .bind(names)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected())
        })
    }

    fn increment_vote<'a>(
        &'a self,
        event_id: EventId,
        option_name: &'a str,
    ) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            sqlx::query(
                "INSERT INTO poll_options (event_id, option_name, votes, updated_at) \
                 VALUES ($1, $2, 1, now()) \
                 ON CONFLICT (event_id, option_name) \
                 DO UPDATE SET votes = poll_options.votes + 1, updated_at = now()",
            )
            .bind(*event_id.as_uuid())
            .bind(option_name)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }

    fn insert_chat_message(
        &self,
        message: NewChatMessage,
    ) -> BoxFuture<'_, StoreResult<ChatMessage>> {
        Box::pin(async move {
            let id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO chat_messages (event_id, username, message, created_at) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(*message.event_id.as_uuid())
            .bind(&message.username)
            .bind(&message.message)
            .bind(message.created_at)
            .fetch_one(&self.pool)
            .await?;

            Ok(ChatMessage {
                id,
                event_id: message.event_id,
                username: message.username,
                message: message.message,
                created_at: message.created_at,
            })
        })
    }

    fn recent_chat_messages(
        &self,
        event_id: EventId,
        limit: usize,
    ) -> BoxFuture<'_, StoreResult<Vec<ChatMessage>>> {
        Box::pin(async move {
            let rows = sqlx::query_as::<_, ChatMessageRow>(
                "SELECT id, event_id, username, message, created_at FROM ( \
                     SELECT id, event_id, username, message, created_at FROM chat_messages \
                     WHERE event_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2 \
                 ) AS recent ORDER BY created_at ASC, id ASC",
            )
            .bind(*event_id.as_uuid())
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.into_iter().map(chat_message_from_row).collect())
        })
    }

    fn prune_chat_before(&self, cutoff: DateTime<Utc>) -> BoxFuture<'_, StoreResult<u64>> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM chat_messages WHERE created_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        })
    }

    fn prune_chat_keep_latest(
        &self,
        event_id: EventId,
        keep: usize,
    ) -> BoxFuture<'_, StoreResult<u64>> {
        Box::pin(async move {
            let result = sqlx::query(
                "DELETE FROM chat_messages WHERE event_id = $1 AND id NOT IN ( \
                     SELECT id FROM chat_messages WHERE event_id = $1 \
                     ORDER BY created_at DESC, id DESC LIMIT $2 \
                 )",
            )
            .bind(*event_id.as_uuid())
            .bind(sql_limit(keep))
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected())
        })
    }

    fn health_check(&self) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(&self.pool)
                .await?;
            Ok(())
        })
    }
}
