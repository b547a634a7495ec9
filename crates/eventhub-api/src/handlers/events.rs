//! Event handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use eventhub_core::error::AppError;
use eventhub_entity::event::Event;
use eventhub_service::EventView;

use crate::dto::request::{CreateEventRequest, ListEventsQuery, UpdateEventRequest, validated};
use crate::dto::response::ApiResponse;
use crate::extractors::{CurrentSession, MaybeSession, parse_uuid};
use crate::state::AppState;

/// GET /api/events?limit=n
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
    session: MaybeSession,
) -> Result<Json<ApiResponse<Vec<EventView>>>, AppError> {
    let events = state
        .event_service
        .list(query.limit, session.user_id())
        .await?;
    Ok(Json(ApiResponse::ok(events)))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventView>>, AppError> {
    let view = state.event_service.details(parse_uuid(&id)?, None).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventView>>), AppError> {
    let req = validated(req)?;
    let view = state
        .event_service
        .create(session.user()?, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(view))))
}

/// PUT /api/events/{id}
pub async fn edit_event(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let id = parse_uuid(&id)?;
    let req = validated(req)?;
    let user = session.user()?;
    let event = state.event_service.edit(id, user.id, req.into()).await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// PUT /api/events/{id}/like
pub async fn like_event(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let id = parse_uuid(&id)?;
    let event = state.event_service.like(id, session.user()?.id).await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// PUT /api/events/{id}/dislike
pub async fn dislike_event(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let id = parse_uuid(&id)?;
    let event = state.event_service.dislike(id, session.user()?.id).await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let id = parse_uuid(&id)?;
    let event = state.event_service.delete(id, session.user()?.id).await?;
    Ok(Json(ApiResponse::ok(event)))
}
