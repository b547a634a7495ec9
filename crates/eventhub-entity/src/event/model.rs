//! Event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A published event that users can like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,
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
    /// The user who created the event, if still present.
    pub admin_id: Option<Uuid>,
    /// Users who liked the event.
    pub likes: Vec<Uuid>,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether `user_id` has liked this event.
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }

    /// Number of likes.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}

/// Data required to create a new event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEvent {
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
    /// The creating user.
    pub admin_id: Uuid,
}

/// Partial update of an event. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEvent {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New image URL.
    pub image_url: Option<String>,
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New location.
    pub location: Option<String>,
}

impl UpdateEvent {
    /// Apply the present fields to `event`.
    pub fn apply(self, event: &mut Event) {
        if let Some(name) = self.name {
            event.name = name;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(image_url) = self.image_url {
            event.image_url = image_url;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Event {
        Event {
            id: Uuid::new_v4(),
            name: "Rust meetup".into(),
            description: "Talks and pizza".into(),
            image_url: "https://example.com/rust.png".into(),
            date: Utc::now(),
            location: "Berlin".into(),
            admin_id: None,
            likes: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut event = sample();
        UpdateEvent {
            location: Some("Hamburg".into()),
            ..Default::default()
        }
        .apply(&mut event);

        assert_eq!(event.location, "Hamburg");
        assert_eq!(event.name, "Rust meetup");
    }

    #[test]
    fn test_likes() {
        let mut event = sample();
        let user = Uuid::new_v4();
        assert!(!event.is_liked_by(user));
        event.likes.push(user);
        assert!(event.is_liked_by(user));
        assert_eq!(event.like_count(), 1);
    }
}
