//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use eventhub_core::error::AppError;
use eventhub_entity::event::UpdateEvent;
use eventhub_service::{NewEvent, RegisterUser};

/// Run the derived validation rules and turn failures into a 400.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate().map_err(validation_error)?;
    Ok(req)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reason = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{field}: {reason}")
        })
        .collect();
    fields.sort();
    AppError::validation(fields.join("; "))
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Given name.
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    /// Username.
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 6, max = 255, message = "Password must be 6 to 255 characters"))]
    pub password: String,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            username: req.username,
            password: req.password,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Event creation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequest {
    /// Event name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Description.
    #[validate(length(min = 3, message = "Description must be at least 3 characters"))]
    pub description: String,
    /// Cover image URL.
    #[validate(length(min = 1, message = "Image URL is required"))]
    pub image_url: String,
    /// When the event takes place (RFC 3339).
    pub date: DateTime<Utc>,
    /// Location.
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            image_url: req.image_url,
            date: req.date,
            location: req.location,
        }
    }
}

/// Event edit body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateEventRequest {
    /// Event name.
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    /// Description.
    #[validate(length(min = 3, message = "Description must be at least 3 characters"))]
    pub description: Option<String>,
    /// Cover image URL.
    #[validate(length(min = 1, message = "Image URL cannot be empty"))]
    pub image_url: Option<String>,
    /// When the event takes place.
    pub date: Option<DateTime<Utc>>,
    /// Location.
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
}

impl From<UpdateEventRequest> for UpdateEvent {
    fn from(req: UpdateEventRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            image_url: req.image_url,
            date: req.date,
            location: req.location,
        }
    }
}

/// Query string of `GET /events`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEventsQuery {
    /// Maximum number of events, ordered by name.
    pub limit: Option<u32>,
}
