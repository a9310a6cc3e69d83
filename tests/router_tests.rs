//! HTTP surface tests driven through the router with `tower::oneshot`.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use slotgrid::db::{FullRepository, LocalRepository};
use slotgrid::http::{create_router, AppState};
use slotgrid::models::window::{BookingStatus, BookingUnitType};

use support::{book, seed_listing};

async fn app_with(repo: LocalRepository) -> (axum::Router, Arc<LocalRepository>) {
    let repo = Arc::new(repo);
    let state = AppState::new(Arc::clone(&repo) as Arc<dyn FullRepository>);
    (create_router(state), repo)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_connected_storage() {
    let (app, _repo) = app_with(LocalRepository::new()).await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn availability_roundtrip() {
    let repo = LocalRepository::new();
    seed_listing(&repo, 1, 10, BookingUnitType::Daily, None).await;
    let (app, _repo) = app_with(repo).await;

    let create = Request::post("/v1/listings/1/windows")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "interval": {
                    "start": "2024-03-01T09:00:00",
                    "end": "2024-03-01T17:00:00"
                }
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["windows"].as_array().unwrap().len(), 1);
    assert!(body["request_id"].is_string());

    let query = Request::get(
        "/v1/listings/1/availability?from=2024-03-01T00:00:00&to=2024-03-02T00:00:00",
    )
    .body(Body::empty())
    .unwrap();
    let response = app.oneshot(query).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(
        body["slots"][0]["interval"]["start"],
        "2024-03-01T09:00:00"
    );
}

#[tokio::test]
async fn conflicting_window_returns_409_with_set() {
    let repo = LocalRepository::new();
    seed_listing(&repo, 1, 10, BookingUnitType::Daily, None).await;
    book(
        &repo,
        1,
        "2024-03-01T10:00:00",
        "2024-03-01T11:00:00",
        BookingStatus::Confirmed,
    )
    .await;
    let (app, _repo) = app_with(repo).await;

    let create = Request::post("/v1/listings/1/windows")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "interval": {
                    "start": "2024-03-01T09:00:00",
                    "end": "2024-03-01T17:00:00"
                }
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.oneshot(create).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(body["conflicts"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["conflicts"][0]["interval"]["start"],
        "2024-03-01T10:00:00"
    );
}

#[tokio::test]
async fn malformed_timestamp_is_bad_request() {
    let repo = LocalRepository::new();
    seed_listing(&repo, 1, 10, BookingUnitType::Daily, None).await;
    let (app, _repo) = app_with(repo).await;

    let query = Request::get(
        "/v1/listings/1/availability?from=2024-03-01&to=2024-03-02T00:00:00",
    )
    .body(Body::empty())
    .unwrap();
    let response = app.oneshot(query).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_listing_is_404() {
    let (app, _repo) = app_with(LocalRepository::new()).await;

    let query = Request::get(
        "/v1/listings/404/availability?from=2024-03-01T00:00:00&to=2024-03-02T00:00:00",
    )
    .body(Body::empty())
    .unwrap();
    let response = app.oneshot(query).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn block_lifecycle_over_http() {
    let repo = LocalRepository::new();
    seed_listing(&repo, 1, 10, BookingUnitType::Daily, None).await;
    let (app, _repo) = app_with(repo).await;

    let create = Request::post("/v1/listings/1/blocks")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "interval": {
                    "start": "2024-03-01T09:00:00",
                    "end": "2024-03-01T12:00:00"
                },
                "reason": "maintenance"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let block_id = body["blocks"][0]["id"].as_i64().unwrap();

    let delete = Request::delete(format!("/v1/listings/1/blocks/{block_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Deleting again is a 404.
    let delete = Request::delete(format!("/v1/listings/1/blocks/{block_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reconcile_endpoint_reports_removed_windows() {
    let repo = LocalRepository::new();
    seed_listing(&repo, 1, 10, BookingUnitType::Daily, None).await;
    let (app, repo) = app_with(repo).await;

    let create = Request::post("/v1/listings/1/windows")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "interval": {
                    "start": "2024-03-01T09:00:00",
                    "end": "2024-03-01T17:00:00"
                }
            })
            .to_string(),
        ))
        .unwrap();
    app.clone().oneshot(create).await.unwrap();

    book(
        &repo,
        1,
        "2024-03-01T10:00:00",
        "2024-03-01T11:00:00",
        BookingStatus::Confirmed,
    )
    .await;

    let reconcile = Request::post("/v1/listings/1/reconcile")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(reconcile).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["removed_window_ids"].as_array().unwrap().len(), 1);
}
