// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use commentwatch::config::settings::GatewaySettings;
use commentwatch::domain::models::comment::CommentRecord;
use commentwatch::domain::models::link::{Link, LinkCategory};
use commentwatch::gateway::client::{base_url, build_client};
use commentwatch::gateway::comment_source::HttpCommentSource;
use commentwatch::gateway::identity_resolver::HttpIdentityResolver;
use commentwatch::gateway::side_effect::HttpHideCommentActuator;
use commentwatch::gateway::traits::{
    CommentSource, FetchStrategy, IdentityResolver, SideEffectActuator,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use uuid::Uuid;

async fn next_comment(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("post_id").map(String::as_str) {
        Some("empty") => StatusCode::NO_CONTENT.into_response(),
        Some("broken") => StatusCode::BAD_GATEWAY.into_response(),
        _ => Json(json!({
            "comment": {
                "comment_id": format!("{}-{}", params["strategy"], params["post_id"]),
                "actor_raw_id": "alice",
                "message": params.get("legacy_post_id").cloned().unwrap_or_default(),
                "created_at": "2025-03-01T10:00:00Z"
            }
        }))
        .into_response(),
    }
}

async fn resolve_identity(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("actor").map(String::as_str) {
        Some("alice") => Json(json!({ "uid": "100200300" })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn start_gateway(hidden: Arc<Mutex<Vec<Value>>>) -> String {
    let app = Router::new()
        .route("/api/comments/next", get(next_comment))
        .route("/api/identities/resolve", get(resolve_identity))
        .route(
            "/api/comments/hide",
            post(move |Json(body): Json<Value>| {
                let hidden = hidden.clone();
                async move {
                    hidden.lock().unwrap().push(body);
                    StatusCode::OK
                }
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

fn settings(base: String) -> GatewaySettings {
    GatewaySettings {
        base_url: base,
        timeout_secs: 5,
        user_agent: "commentwatch-test".to_string(),
    }
}

fn link(category: LinkCategory) -> Link {
    Link {
        id: 21,
        category,
        post_id: "p21".to_string(),
        legacy_post_id: Some("l21".to_string()),
        thread_count: 1,
        delay_seconds: 0,
        last_comment_time: None,
        owner_id: 3,
    }
}

#[tokio::test]
async fn test_comment_source_fetches_next_comment() {
    let base = start_gateway(Arc::new(Mutex::new(Vec::new()))).await;
    let settings = settings(base);
    let source = HttpCommentSource::new(
        build_client(&settings).unwrap(),
        base_url(&settings).unwrap(),
    );

    let public = link(LinkCategory::Public);
    let event = source
        .fetch_next("p21", FetchStrategy::Primary, &public)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.comment_id.as_deref(), Some("primary-p21"));
    assert_eq!(event.actor_raw_id.as_deref(), Some("alice"));
    assert_eq!(event.message.as_deref(), Some(""));
    assert!(event.created_at.is_some());

    let private = link(LinkCategory::Private);
    let event = source
        .fetch_next("p21", FetchStrategy::Private, &private)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.message.as_deref(), Some("l21"));
}

#[tokio::test]
async fn test_comment_source_empty_and_error_responses() {
    let base = start_gateway(Arc::new(Mutex::new(Vec::new()))).await;
    let settings = settings(base);
    let source = HttpCommentSource::new(
        build_client(&settings).unwrap(),
        base_url(&settings).unwrap(),
    );
    let link = link(LinkCategory::Public);

    let empty = source
        .fetch_next("empty", FetchStrategy::Primary, &link)
        .await
        .unwrap();
    assert!(empty.is_none());

    let broken = source
        .fetch_next("broken", FetchStrategy::Primary, &link)
        .await;
    assert!(broken.is_err());
}

#[tokio::test]
async fn test_identity_resolver() {
    let base = start_gateway(Arc::new(Mutex::new(Vec::new()))).await;
    let settings = settings(base);
    let resolver = HttpIdentityResolver::new(
        build_client(&settings).unwrap(),
        base_url(&settings).unwrap(),
    );

    assert_eq!(
        resolver.resolve("alice").await.unwrap(),
        Some("100200300".to_string())
    );
    assert_eq!(resolver.resolve("mallory").await.unwrap(), None);
}

#[tokio::test]
async fn test_hide_comment_actuator_posts_payload() {
    let hidden = Arc::new(Mutex::new(Vec::new()));
    let base = start_gateway(hidden.clone()).await;
    let settings = settings(base);
    let actuator = HttpHideCommentActuator::new(
        build_client(&settings).unwrap(),
        base_url(&settings).unwrap(),
    );

    let link = link(LinkCategory::Public);
    let record = CommentRecord {
        id: Uuid::new_v4(),
        external_comment_id: "c-77".to_string(),
        link_id: link.id,
        post_id: link.post_id.clone(),
        owner_id: link.owner_id,
        uid: "100200300".to_string(),
        message: "hello".to_string(),
        phone_number: None,
        display_name: "Alice".to_string(),
        created_at: chrono::Utc::now(),
    };

    actuator.on_accepted(&record, &link).await.unwrap();

    let hidden = hidden.lock().unwrap();
    assert_eq!(hidden.len(), 1);
    assert_eq!(hidden[0]["comment_id"], "c-77");
    assert_eq!(hidden[0]["link_id"], 21);
    assert_eq!(hidden[0]["post_id"], "p21");
}
