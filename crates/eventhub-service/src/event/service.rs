//! Event CRUD and likes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_database::{EventStore, IdentityStore};
use eventhub_entity::event::{CreateEvent, Event, UpdateEvent};
use eventhub_entity::user::User;

/// Manages events and who likes them.
#[derive(Debug, Clone)]
pub struct EventService {
    /// Event records.
    events: Arc<dyn EventStore>,
    /// User records, for resolving event admins.
    identities: Arc<dyn IdentityStore>,
}

/// Fields for a new event. The creator becomes its admin.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Event name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// URL of the cover image.
    pub image_url: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Where the event takes place.
    pub location: String,
}

/// An event as presented to a particular viewer.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    /// The event itself.
    #[serde(flatten)]
    pub event: Event,
    /// The creating user, when it still exists.
    pub admin: Option<User>,
    /// Number of likes.
    pub like_count: usize,
    /// Whether the viewer likes this event. Always `false` for anonymous viewers.
    pub liked_by_me: bool,
}

impl EventView {
    fn new(event: Event, admin: Option<User>, viewer: Option<Uuid>) -> Self {
        let liked_by_me = viewer.is_some_and(|id| event.is_liked_by(id));
        Self {
            like_count: event.like_count(),
            liked_by_me,
            admin,
            event,
        }
    }
}

impl EventService {
    /// Creates a new event service.
    pub fn new(events: Arc<dyn EventStore>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { events, identities }
    }

    /// List events. A positive `limit` returns that many events ordered by
    /// name; otherwise every event is returned.
    pub async fn list(&self, limit: Option<u32>, viewer: Option<Uuid>) -> AppResult<Vec<EventView>> {
        let limit = limit.filter(|n| *n > 0);
        let events = self.events.find_all(limit).await?;
        self.present(events, viewer).await
    }

    /// A single event.
    pub async fn details(&self, id: Uuid, viewer: Option<Uuid>) -> AppResult<EventView> {
        let event = self.find(id).await?;
        let admin = self.resolve_admin(event.admin_id).await?;
        Ok(EventView::new(event, admin, viewer))
    }

    /// Create an event owned by `admin`.
    pub async fn create(&self, admin: &User, data: NewEvent) -> AppResult<EventView> {
        let event = self
            .events
            .create(&CreateEvent {
                name: data.name,
                description: data.description,
                image_url: data.image_url,
                date: data.date,
                location: data.location,
                admin_id: admin.id,
            })
            .await?;

        info!(event_id = %event.id, admin_id = %admin.id, "Event created");
        Ok(EventView::new(event, Some(admin.clone()), Some(admin.id)))
    }

    /// Apply a partial update.
    pub async fn edit(&self, id: Uuid, actor: Uuid, changes: UpdateEvent) -> AppResult<Event> {
        let event = self
            .events
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(event_id = %id, user_id = %actor, "Event updated");
        Ok(event)
    }

    /// Record that `user_id` likes the event. Liking twice is a no-op.
    pub async fn like(&self, id: Uuid, user_id: Uuid) -> AppResult<Event> {
        let event = self
            .events
            .add_like(id, user_id)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(event_id = %id, user_id = %user_id, likes = event.like_count(), "Event liked");
        Ok(event)
    }

    /// Withdraw a like. Withdrawing a missing like is a no-op.
    pub async fn dislike(&self, id: Uuid, user_id: Uuid) -> AppResult<Event> {
        let event = self
            .events
            .remove_like(id, user_id)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(event_id = %id, user_id = %user_id, likes = event.like_count(), "Event like removed");
        Ok(event)
    }

    /// Delete the event and return it as it was.
    pub async fn delete(&self, id: Uuid, actor: Uuid) -> AppResult<Event> {
        let event = self.find(id).await?;
        if !self.events.delete(id).await? {
            return Err(not_found(id));
        }

        info!(event_id = %id, user_id = %actor, "Event deleted");
        Ok(event)
    }

    async fn find(&self, id: Uuid) -> AppResult<Event> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn resolve_admin(&self, admin_id: Option<Uuid>) -> AppResult<Option<User>> {
        match admin_id {
            Some(id) => self.identities.find_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn present(&self, events: Vec<Event>, viewer: Option<Uuid>) -> AppResult<Vec<EventView>> {
        let mut admin_ids: Vec<Uuid> = events.iter().filter_map(|e| e.admin_id).collect();
        admin_ids.sort_unstable();
        admin_ids.dedup();

        let admins: HashMap<Uuid, User> =
            try_join_all(admin_ids.into_iter().map(|id| self.identities.find_by_id(id)))
                .await?
                .into_iter()
                .flatten()
                .map(|user| (user.id, user))
                .collect();

        Ok(events
            .into_iter()
            .map(|event| {
                let admin = event.admin_id.and_then(|id| admins.get(&id).cloned());
                EventView::new(event, admin, viewer)
            })
            .collect())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Event {id} not found"))
}
