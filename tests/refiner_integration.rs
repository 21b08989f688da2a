//! End-to-end tests for the refiner against a mock Generative Language API.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use promptforge::config::LlmConfig;
use promptforge::core::llm::{GoogleProvider, LlmError, PromptRefiner};

const MODEL: &str = "gemini-2.5-flash";

fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

fn refiner_for(server: &MockServer) -> PromptRefiner {
    let config = LlmConfig {
        retry_base_delay_ms: 1,
        ..LlmConfig::default()
    };
    let provider = Arc::new(
        GoogleProvider::new("AIzaTestKey".to_string(), MODEL.to_string())
            .with_base_url(server.uri()),
    );
    PromptRefiner::new(provider, &config)
}

#[tokio::test]
async fn generates_questions_from_structured_response() {
    let server = MockServer::start().await;

    let body = json!({
        "questions": [
            "What emotional tone should the story have?",
            "Who is the intended audience?",
            "How long should it be?",
            "Should it be in first or third person?",
            "What era is the lighthouse from?"
        ]
    });

    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}:generateContent")))
        .and(header_exists("x-goog-api-key"))
        .respond_with(gemini_reply(&body.to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let refiner = refiner_for(&server);
    let questions = refiner
        .generate_questions("a spooky story about a lighthouse")
        .await
        .unwrap();

    assert_eq!(questions.len(), 5);
    assert_eq!(questions[0], "What emotional tone should the story have?");
}

#[tokio::test]
async fn falls_back_to_numbered_list_parsing() {
    let server = MockServer::start().await;

    let text = "1. What tone?\n2. Who reads it?\n3. How long?";
    Mock::given(method("POST"))
        .respond_with(gemini_reply(text))
        .expect(1)
        .mount(&server)
        .await;

    let refiner = refiner_for(&server);
    let questions = refiner.generate_questions("an idea").await.unwrap();

    assert_eq!(questions, vec!["What tone?", "Who reads it?", "How long?"]);
}

#[tokio::test]
async fn request_carries_schema_and_temperature() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(gemini_reply(r#"{"questions": ["Q?"]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let refiner = refiner_for(&server);
    refiner.generate_questions("an idea").await.unwrap();

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    let gen_config = &body["generationConfig"];
    assert_eq!(gen_config["responseMimeType"], "application/json");
    assert_eq!(gen_config["temperature"], 0.7);
    assert!(gen_config["responseSchema"]["properties"]["questions"].is_object());
    assert!(body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .contains("an idea"));
}

#[tokio::test]
async fn retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(gemini_reply(r#"{"questions": ["Survived?"]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let refiner = refiner_for(&server);
    let questions = refiner.generate_questions("an idea").await.unwrap();

    assert_eq!(questions, vec!["Survived?"]);
}

#[tokio::test]
async fn exhausts_retries_after_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(3)
        .mount(&server)
        .await;

    let refiner = refiner_for(&server);
    let err = refiner.generate_questions("an idea").await.unwrap_err();

    match err {
        LlmError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_payload_is_retried_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(gemini_reply("I cannot answer that."))
        .expect(3)
        .mount(&server)
        .await;

    let refiner = refiner_for(&server);
    let err = refiner.generate_questions("an idea").await.unwrap_err();

    assert!(matches!(err, LlmError::RetriesExhausted { .. }));
}

#[tokio::test]
async fn missing_candidates_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .expect(3)
        .mount(&server)
        .await;

    let refiner = refiner_for(&server);
    let err = refiner.generate_questions("an idea").await.unwrap_err();

    assert!(matches!(err, LlmError::RetriesExhausted { .. }));
}

#[tokio::test]
async fn final_prompt_returned_verbatim_trimmed() {
    let server = MockServer::start().await;

    let prompt_text = "\n\nYou are a master storyteller.\nWrite an eerie tale.\n";
    Mock::given(method("POST"))
        .respond_with(gemini_reply(prompt_text))
        .expect(1)
        .mount(&server)
        .await;

    let refiner = refiner_for(&server);
    let pairs = vec![
        ("What tone?".to_string(), "Eerie".to_string()),
        ("How long?".to_string(), "Short".to_string()),
    ];
    let prompt = refiner
        .generate_final_prompt("a lighthouse story", &pairs)
        .await
        .unwrap();

    assert_eq!(
        prompt,
        "You are a master storyteller.\nWrite an eerie tale."
    );

    // Synthesis request embeds the Q&A context and the higher temperature.
    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(text.contains("Q1: What tone?"));
    assert!(text.contains("A2: Short"));
    assert_eq!(body["generationConfig"]["temperature"], 0.8);
    assert!(body["generationConfig"].get("responseSchema").is_none());
}

#[tokio::test]
async fn empty_synthesis_text_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(gemini_reply("   \n  "))
        .expect(3)
        .mount(&server)
        .await;

    let refiner = refiner_for(&server);
    let err = refiner
        .generate_final_prompt("idea", &[("Q?".to_string(), "A".to_string())])
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::RetriesExhausted { .. }));
}
