use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ai_trainer::errors::AppError;
use ai_trainer::llm::{ChatTurn, GeminiClient, GeminiConfig, GenerationClient};

const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

fn test_config(server: &MockServer) -> GeminiConfig {
    let mut config = GeminiConfig::new("test-key");
    config.base_url = server.uri();
    config.timeout = Duration::from_secs(5);
    config
}

fn candidate_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": text}]}}
        ]
    })
}

#[tokio::test]
async fn complete_extracts_first_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "build me a workout"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("here you go")))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(test_config(&server)).unwrap();
    let text = client.complete("build me a workout").await.unwrap();

    assert_eq!(text, "here you go");
}

#[tokio::test]
async fn complete_with_history_forwards_turns_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "model", "parts": [{"text": "first workout"}]},
                {"role": "user", "parts": [{"text": "make it harder"}]},
                {"role": "model", "parts": [{"text": "second workout"}]},
                {"role": "user", "parts": [{"text": "final instruction"}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("third workout")))
        .expect(1)
        .mount(&server)
        .await;

    let turns = vec![
        ChatTurn::model("first workout"),
        ChatTurn::user("make it harder"),
        ChatTurn::model("second workout"),
    ];

    let client = GeminiClient::new(test_config(&server)).unwrap();
    let text = client
        .complete_with_history(&turns, "final instruction")
        .await
        .unwrap();

    assert_eq!(text, "third workout");
}

#[tokio::test]
async fn empty_candidate_list_is_a_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let client = GeminiClient::new(test_config(&server)).unwrap();
    let err = client.complete("prompt").await.unwrap_err();

    assert!(matches!(err, AppError::Generation(_)));
}

#[tokio::test]
async fn candidate_without_text_part_is_a_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{}]}}]
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(test_config(&server)).unwrap();
    let err = client.complete("prompt").await.unwrap_err();

    assert!(matches!(err, AppError::Generation(_)));
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(test_config(&server)).unwrap();
    let text = client.complete("prompt").await.unwrap();

    assert_eq!(text, "recovered");
}

#[tokio::test]
async fn gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.max_retries = 1;

    let client = GeminiClient::new(config).unwrap();
    let err = client.complete("prompt").await.unwrap_err();

    assert!(matches!(err, AppError::Generation(_)));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "API key not valid"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(test_config(&server)).unwrap();
    let err = client.complete("prompt").await.unwrap_err();

    match err {
        AppError::Generation(message) => assert!(message.contains("API key not valid")),
        other => panic!("expected generation error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_times_out_as_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate_body("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.timeout = Duration::from_millis(200);
    config.max_retries = 0;

    let client = GeminiClient::new(config).unwrap();
    let err = client.complete("prompt").await.unwrap_err();

    assert!(matches!(err, AppError::Generation(_)));
}
