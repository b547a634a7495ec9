//! Event repository implementation.
//!
//! Likes live in the `event_likes` join table and are folded back into
//! `Event::likes` with `ARRAY_AGG` so every read returns a complete event.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;
use eventhub_entity::event::{CreateEvent, Event, UpdateEvent};

use crate::stores::EventStore;

const SELECT_EVENTS: &str = r#"
    SELECT e.id, e.name, e.description, e.image_url, e.date, e.location, e.admin_id, e.created_at,
           COALESCE(
               ARRAY_AGG(l.user_id ORDER BY l.liked_at) FILTER (WHERE l.user_id IS NOT NULL),
               '{}'
           ) AS likes
    FROM events e
    LEFT JOIN event_likes l ON l.event_id = e.id
"#;

/// PostgreSQL-backed [`EventStore`].
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |e| AppError::with_source(ErrorKind::Database, message, e)
    }
}

#[async_trait]
impl EventStore for EventRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        let sql = format!("{SELECT_EVENTS} WHERE e.id = $1 GROUP BY e.id");
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_err("Failed to find event"))
    }

    async fn find_all(&self, limit: Option<u32>) -> AppResult<Vec<Event>> {
        match limit {
            Some(limit) => {
                let sql = format!("{SELECT_EVENTS} GROUP BY e.id ORDER BY e.name ASC LIMIT $1");
                sqlx::query_as::<_, Event>(&sql)
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("{SELECT_EVENTS} GROUP BY e.id ORDER BY e.created_at ASC");
                sqlx::query_as::<_, Event>(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(Self::db_err("Failed to list events"))
    }

    async fn find_by_admin(&self, admin_id: Uuid) -> AppResult<Vec<Event>> {
        let sql =
            format!("{SELECT_EVENTS} WHERE e.admin_id = $1 GROUP BY e.id ORDER BY e.created_at ASC");
        sqlx::query_as::<_, Event>(&sql)
            .bind(admin_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_err("Failed to list events by admin"))
    }

    async fn find_liked_by(&self, user_id: Uuid) -> AppResult<Vec<Event>> {
        let sql = format!(
            "{SELECT_EVENTS} WHERE e.id IN (SELECT event_id FROM event_likes WHERE user_id = $1) \
             GROUP BY e.id ORDER BY e.created_at ASC"
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_err("Failed to list liked events"))
    }

    async fn create(&self, data: &CreateEvent) -> AppResult<Event> {
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO events (id, name, description, image_url, date, location, admin_id, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id"#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(data.date)
        .bind(&data.location)
        .bind(data.admin_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Self::db_err("Failed to create event"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Created event vanished before it could be read"))
    }

    async fn update(&self, id: Uuid, data: UpdateEvent) -> AppResult<Option<Event>> {
        let updated = sqlx::query(
            r#"UPDATE events SET
                   name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   image_url = COALESCE($4, image_url),
                   date = COALESCE($5, date),
                   location = COALESCE($6, location)
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.image_url)
        .bind(data.date)
        .bind(data.location)
        .execute(&self.pool)
        .await
        .map_err(Self::db_err("Failed to update event"))?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err("Failed to delete event"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Event>> {
        sqlx::query(
            r#"INSERT INTO event_likes (event_id, user_id, liked_at)
               SELECT $1, $2, $3 WHERE EXISTS (SELECT 1 FROM events WHERE id = $1)
               ON CONFLICT (event_id, user_id) DO NOTHING"#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Self::db_err("Failed to like event"))?;

        self.find_by_id(id).await
    }

    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Event>> {
        sqlx::query("DELETE FROM event_likes WHERE event_id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Self::db_err("Failed to unlike event"))?;

        self.find_by_id(id).await
    }
}
