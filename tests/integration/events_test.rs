//! Integration tests for events and likes.

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::helpers::TestApp;

fn event_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "An evening of talks",
        "image_url": "https://example.com/cover.png",
        "date": "2026-11-20T18:30:00Z",
        "location": "Main hall",
    })
}

async fn create_event(app: &TestApp, token: &str, name: &str) -> String {
    let response = app
        .request("POST", "/api/events", Some(event_body(name)), Some(token))
        .await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "Create failed: {}",
        response.text
    );
    response.body["data"]["id"]
        .as_str()
        .expect("No event id")
        .to_string()
}

#[tokio::test]
async fn test_create_requires_session() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/events", Some(event_body("Meetup")), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text, "UNAUTHORIZED!");
}

#[tokio::test]
async fn test_create_and_get_event() {
    let app = TestApp::new();
    let token = app.register("ada", "engine1").await;
    let id = create_event(&app, &token, "Meetup").await;

    let response = app
        .request("GET", &format!("/api/events/{id}"), None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let event = &response.body["data"];
    assert_eq!(event["name"], "Meetup");
    assert_eq!(event["admin"]["username"], "ada");
    assert_eq!(event["like_count"], 0);
    assert_eq!(event["liked_by_me"], false);
}

#[tokio::test]
async fn test_create_rejects_short_description() {
    let app = TestApp::new();
    let token = app.register("ada", "engine1").await;

    let mut body = event_body("Meetup");
    body["description"] = json!("no");
    let response = app
        .request("POST", "/api/events", Some(body), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_with_limit() {
    let app = TestApp::new();
    let token = app.register("ada", "engine1").await;
    for name in ["Gamma", "Alpha", "Beta"] {
        create_event(&app, &token, name).await;
    }

    let response = app.request("GET", "/api/events?limit=2", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);

    let response = app.request("GET", "/api/events", None, None).await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_like_and_dislike() {
    let app = TestApp::new();
    let token = app.register("ada", "engine1").await;
    let id = create_event(&app, &token, "Meetup").await;
    let like_path = format!("/api/events/{id}/like");

    for _ in 0..2 {
        let response = app.request("PUT", &like_path, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["likes"].as_array().unwrap().len(), 1);
    }

    let listed = app.request("GET", "/api/events", None, Some(&token)).await;
    assert_eq!(listed.body["data"][0]["liked_by_me"], true);
    assert_eq!(listed.body["data"][0]["like_count"], 1);

    let anonymous = app.request("GET", "/api/events", None, None).await;
    assert_eq!(anonymous.body["data"][0]["liked_by_me"], false);

    let me = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(me.body["data"]["liked_events"][0]["id"], id.as_str());
    assert_eq!(me.body["data"]["created_events"][0]["id"], id.as_str());

    let response = app
        .request("PUT", &format!("/api/events/{id}/dislike"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["likes"], json!([]));
}

#[tokio::test]
async fn test_like_requires_session() {
    let app = TestApp::new();
    let token = app.register("ada", "engine1").await;
    let id = create_event(&app, &token, "Meetup").await;

    let response = app
        .request("PUT", &format!("/api/events/{id}/like"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_edit_event() {
    let app = TestApp::new();
    let token = app.register("ada", "engine1").await;
    let id = create_event(&app, &token, "Meetup").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/events/{id}"),
            Some(json!({ "location": "Rooftop" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["location"], "Rooftop");
    assert_eq!(response.body["data"]["name"], "Meetup");
}

#[tokio::test]
async fn test_delete_event() {
    let app = TestApp::new();
    let token = app.register("ada", "engine1").await;
    let id = create_event(&app, &token, "Meetup").await;
    let path = format!("/api/events/{id}");

    let response = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], id.as_str());

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_event() {
    let app = TestApp::new();
    let token = app.register("ada", "engine1").await;
    let path = format!("/api/events/{}", Uuid::new_v4());

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("PUT", &format!("{path}/like"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
