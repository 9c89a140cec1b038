use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_cell::{GenerationContext, GenerationError, GenerationTask, OllamaGenerator, TextGenerator};
use shared_utils::test_utils::TestConfig;

fn context() -> GenerationContext {
    GenerationContext::task(GenerationTask::GeneralHealthInfo)
}

#[tokio::test]
async fn returns_trimmed_model_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "test-model", "stream": false })))
        .and(body_string_contains("general_health_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test-model",
            "response": "  Drink enough water.  ",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = OllamaGenerator::from_config(&TestConfig::with_ollama_url(&server.uri()).to_app_config()).unwrap();
    let text = generator.generate("su içmek", &context()).await.unwrap();

    assert_eq!(text, "Drink enough water.");
}

#[tokio::test]
async fn translation_makes_a_second_call_with_the_english_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("[CONTEXT]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Rest your knee." })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("Rest your knee."))
        .and(body_string_contains("Türkçe yanıt:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Dizinizi dinlendirin." })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = OllamaGenerator::new(&server.uri(), "test-model", Duration::from_secs(2), true).unwrap();
    let text = generator.generate("dizim ağrıyor", &context()).await.unwrap();

    assert_eq!(text, "Dizinizi dinlendirin.");
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let generator = OllamaGenerator::new(&server.uri(), "test-model", Duration::from_secs(2), false).unwrap();
    let result = generator.generate("merhaba", &context()).await;

    assert_matches!(result, Err(GenerationError::Status { status: 500, body }) if body == "model crashed");
}

#[tokio::test]
async fn empty_response_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": " \n " })))
        .mount(&server)
        .await;

    let generator = OllamaGenerator::new(&server.uri(), "test-model", Duration::from_secs(2), false).unwrap();

    assert_matches!(
        generator.generate("merhaba", &context()).await,
        Err(GenerationError::EmptyResponse)
    );
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let generator = OllamaGenerator::new(&server.uri(), "test-model", Duration::from_millis(200), false).unwrap();

    assert_matches!(
        generator.generate("merhaba", &context()).await,
        Err(GenerationError::Timeout)
    );
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let generator = OllamaGenerator::new(&server.uri(), "test-model", Duration::from_secs(2), false).unwrap();

    assert_matches!(
        generator.generate("merhaba", &context()).await,
        Err(GenerationError::Decode(_))
    );
}

#[test]
fn blank_model_name_is_not_configured() {
    let mut config = TestConfig::default().to_app_config();
    config.ollama_model = String::new();

    assert_matches!(OllamaGenerator::from_config(&config), Err(GenerationError::NotConfigured));
}
