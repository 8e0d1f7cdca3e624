#![allow(clippy::unwrap_used, clippy::expect_used)]

//! HTTP-level tests for the jokes router, driven through `oneshot`
//! against an in-memory store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use axum_jokes_service::{
    domain::IdGenerator, memory::InMemoryJokeStore, models::Joke, routes::create_router,
    service::JokeService, AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot
use uuid::Uuid;

fn app() -> Router {
    let store = Arc::new(InMemoryJokeStore::new());
    create_router(Arc::new(AppState {
        jokes: JokeService::with_seed(store, 99),
    }))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("Failed to parse JSON body")
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/jokes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create(app: &Router, text: &str, author: &str) -> Joke {
    let (status, body) = send(app, post_json(json!({ "text": text, "author": author }))).await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn create_returns_201_and_location() {
    let app = app();
    let response = app
        .clone()
        .oneshot(post_json(json!({ "text": "Joke 1", "author": "Author 1" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let joke: Joke = serde_json::from_slice(&body).unwrap();
    assert_eq!(location, format!("/jokes/{}", joke.id));

    let (status, fetched) = send(&app, get(&location)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_value::<Joke>(fetched).unwrap(), joke);
}

#[tokio::test]
async fn create_ignores_client_id() {
    let app = app();
    let client_id = "9811b9e7-1eb8-4174-a43b-13f5ee8364fd";
    let (status, body) = send(
        &app,
        post_json(json!({ "id": client_id, "text": "t", "author": "a" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["id"], client_id);
}

#[tokio::test]
async fn create_with_invalid_payload_is_400() {
    let app = app();
    for payload in [
        json!({ "text": null, "author": "X" }),
        json!({ "text": "", "author": "X" }),
        json!({ "text": "t" }),
        Value::Null,
    ] {
        let (status, body) = send(&app, post_json(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    let malformed = Request::builder()
        .method("POST")
        .uri("/jokes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send(&app, get("/jokes")).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn get_unknown_is_404_and_malformed_id_is_400() {
    let app = app();
    let (status, _) = send(&app, get("/jokes/8b56932f-0b35-49b3-a558-9844f7d3b4c8")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/jokes/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_is_200_then_404() {
    let app = app();
    let joke = create(&app, "Joke 1", "Author 1").await;
    let uri = format!("/jokes/{}", joke.id);

    let (status, body) = send(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], joke.id.to_string());

    let (status, _) = send(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_and_author_lookup() {
    let app = app();
    create(&app, "one", "Alice").await;
    create(&app, "two", "Bob").await;
    create(&app, "three", "alice").await;

    let (status, all) = send(&app, get("/jokes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, lower) = send(&app, get("/jokes/author/Alice")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, upper) = send(&app, get("/jokes/author/ALICE")).await;
    assert_eq!(lower, upper);
    assert_eq!(lower.as_array().unwrap().len(), 2);

    let (status, none) = send(&app, get("/jokes/author/Nobody")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn random_is_404_when_empty_and_200_otherwise() {
    let app = app();
    let (status, body) = send(&app, get("/jokes/random")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("no jokes available"));

    let joke = create(&app, "only", "Solo").await;
    for _ in 0..2 {
        let (status, body) = send(&app, get("/jokes/random")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_value::<Joke>(body).unwrap(), joke);
    }
}

struct FixedId(Uuid);

impl IdGenerator for FixedId {
    fn next_id(&self) -> Uuid {
        self.0
    }
}

#[tokio::test]
async fn create_reusing_a_live_id_is_409() {
    let id = Uuid::parse_str("40328c24-5577-4475-8257-6203f2aa0187").unwrap();
    let app = create_router(Arc::new(AppState {
        jokes: JokeService::with_seed(Arc::new(InMemoryJokeStore::new()), 99)
            .with_id_generator(Arc::new(FixedId(id))),
    }));

    let first = create(&app, "Joke 1", "Author 1").await;
    assert_eq!(first.id, id);

    let (status, body) = send(&app, post_json(json!({ "text": "Joke 2", "author": "Author 2" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains(&id.to_string()));

    let (_, all) = send(&app, get("/jokes")).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["text"], "Joke 1");
}
