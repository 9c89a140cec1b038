use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_cell::router::chat_routes;
use chat_cell::services::templates;
use chat_cell::{ChatOrchestrator, KnowledgeBase, OllamaGenerator};
use doctor_cell::{AvailabilityService, SlotCalendar};
use shared_utils::test_utils::{seeded_database, TestConfig};

fn app(config: &TestConfig) -> Router {
    let config = config.to_app_config();
    let generator = Arc::new(OllamaGenerator::from_config(&config).unwrap());
    let knowledge = Arc::new(KnowledgeBase::load(&config.knowledge_dir).unwrap());
    let availability = Arc::new(AvailabilityService::new(seeded_database(), SlotCalendar::default()));

    chat_routes(Arc::new(ChatOrchestrator::new(generator, knowledge, availability, &config)))
}

async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_blank_message_gets_empty_reply() {
    let (status, json) = post_chat(app(&TestConfig::default()), json!({ "message": "   " })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], templates::EMPTY_MESSAGE_REPLY);
    assert_eq!(json["intent"], "empty");
    assert_eq!(json["source"], "rule-based");
}

#[tokio::test]
async fn test_missing_message_field_is_treated_as_blank() {
    let (status, json) = post_chat(app(&TestConfig::default()), json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "empty");
}

#[tokio::test]
async fn test_route_answer_survives_generation_outage() {
    // The default test config points at a port nothing listens on.
    let (status, json) = post_chat(app(&TestConfig::default()), json!({ "message": "dizimde ağrı var" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "route");
    assert_eq!(json["source"], "rule-based");
    assert_eq!(json["reply"], "Ön değerlendirme: Ortopedi / Fizik Tedavi uygun görünebilir.");
    assert_eq!(json["department"]["code"], "ortopedi");
    assert_eq!(json["availability"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_urgent_message_is_answered_without_generation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "never" })))
        .expect(0)
        .mount(&server)
        .await;

    let (status, json) = post_chat(
        app(&TestConfig::with_ollama_url(&server.uri())),
        json!({ "message": "Göğsümde ağrı var" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "urgent");
    assert_eq!(json["reply"], templates::URGENT_REPLY);
    assert!(json.get("department").is_none());
}

#[tokio::test]
async fn test_general_question_uses_generation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Günde 7-8 saat uyuyun." })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, json) = post_chat(
        app(&TestConfig::with_ollama_url(&server.uri())),
        json!({ "message": "uyku düzeni nasıl olmalı" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "general");
    // No knowledge directory in tests, so retrieval yields nothing.
    assert_eq!(json["source"], "generation");
    assert_eq!(json["reply"], "Günde 7-8 saat uyuyun.");
}

#[tokio::test]
async fn test_unreadable_body_gets_empty_reply() {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .body(Body::from("dizimde ağrı var"))
        .unwrap();

    let response = app(&TestConfig::default()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], templates::EMPTY_MESSAGE_REPLY);
    assert_eq!(json["intent"], "empty");
}
