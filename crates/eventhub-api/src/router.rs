//! Route definitions for the EventHub HTTP API.
//!
//! All routes are mounted under `/api`. Routes that need a caller are
//! grouped behind `require_session`; the event listing sits behind
//! `optional_session` so it can mark the viewer's likes.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware::auth::{optional_session, require_session};
use crate::state::AppState;

/// Build the API router with session middleware applied per route group.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(user_routes(&state))
        .merge(event_routes(&state));

    Router::new().nest("/api", api_routes).with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route("/users/register", post(handlers::users::register))
        .route("/users/login", post(handlers::users::login))
        .route("/users/logout", post(handlers::users::logout))
        .route("/users/{id}", delete(handlers::users::delete_user));

    let protected = Router::new()
        .route("/users/me", get(handlers::users::me))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    public.merge(protected)
}

fn event_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/events/{id}", get(handlers::events::get_event));

    let optional = Router::new()
        .route("/events", get(handlers::events::list_events))
        .route_layer(from_fn_with_state(state.clone(), optional_session));

    let protected = Router::new()
        .route("/events", post(handlers::events::create_event))
        .route(
            "/events/{id}",
            put(handlers::events::edit_event).delete(handlers::events::delete_event),
        )
        .route("/events/{id}/like", put(handlers::events::like_event))
        .route("/events/{id}/dislike", put(handlers::events::dislike_event))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    public.merge(optional).merge(protected)
}
