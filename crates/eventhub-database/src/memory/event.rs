//! In-memory event store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use eventhub_core::result::AppResult;
use eventhub_entity::event::{CreateEvent, Event, UpdateEvent};

use crate::stores::EventStore;

/// [`EventStore`] keeping likes inline on each event.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: DashMap<Uuid, Event>,
}

impl MemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_where(&self, keep: impl Fn(&Event) -> bool) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|e| keep(e.value()))
            .map(|e| e.clone())
            .collect();
        events.sort_by_key(|e| e.created_at);
        events
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.events.get(&id).map(|e| e.clone()))
    }

    async fn find_all(&self, limit: Option<u32>) -> AppResult<Vec<Event>> {
        let mut events = self.collect_where(|_| true);
        if let Some(limit) = limit {
            events.sort_by(|a, b| a.name.cmp(&b.name));
            events.truncate(limit as usize);
        }
        Ok(events)
    }

    async fn find_by_admin(&self, admin_id: Uuid) -> AppResult<Vec<Event>> {
        Ok(self.collect_where(|e| e.admin_id == Some(admin_id)))
    }

    async fn find_liked_by(&self, user_id: Uuid) -> AppResult<Vec<Event>> {
        Ok(self.collect_where(|e| e.is_liked_by(user_id)))
    }

    async fn create(&self, data: &CreateEvent) -> AppResult<Event> {
        let event = Event {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            description: data.description.clone(),
            image_url: data.image_url.clone(),
            date: data.date,
            location: data.location.clone(),
            admin_id: Some(data.admin_id),
            likes: Vec::new(),
            created_at: Utc::now(),
        };
        self.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(&self, id: Uuid, data: UpdateEvent) -> AppResult<Option<Event>> {
        Ok(self.events.get_mut(&id).map(|mut event| {
            data.apply(&mut event);
            event.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.events.remove(&id).is_some())
    }

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.events.get_mut(&id).map(|mut event| {
            if !event.is_liked_by(user_id) {
                event.likes.push(user_id);
            }
            event.clone()
        }))
    }

    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.events.get_mut(&id).map(|mut event| {
            event.likes.retain(|liker| *liker != user_id);
            event.clone()
        }))
    }
}
