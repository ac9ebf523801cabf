// ABOUTME: Integration tests for the OpenAI-compatible provider against a mock HTTP server
// ABOUTME: Covers JSON mode, auth headers, upstream error mapping, and structured validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use objective_prompter::errors::ErrorCode;
use objective_prompter::llm::{
    ChatMessage, ChatRequest, GenerationRequest, GenerationService, LlmCapabilities, LlmProvider,
    OpenAiCompatibleConfig, OpenAiCompatibleProvider, OutputShape, ResponseFormat,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> OpenAiCompatibleConfig {
    OpenAiCompatibleConfig {
        base_url: format!("{}/v1", server.uri()),
        ..OpenAiCompatibleConfig::openai("sk-test", "gpt-4o")
    }
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
    })
}

fn json_request() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("Return JSON with a single key: 'response'."),
        ChatMessage::user("Say hello."),
    ])
    .with_model("gpt-4o")
    .with_temperature(1.0)
    .with_response_format(ResponseFormat::JsonObject)
}

async fn last_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    serde_json::from_slice(&requests.last().unwrap().body).unwrap()
}

// ============================================================================
// Request Shape
// ============================================================================

#[tokio::test]
async fn test_complete_sends_json_mode_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"response":"hi"}"#)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(config_for(&server)).unwrap();
    let response = provider.complete(&json_request()).await.unwrap();

    assert_eq!(response.content, r#"{"response":"hi"}"#);
    assert_eq!(response.model, "gpt-4o-2024-08-06");
    assert_eq!(response.usage.unwrap().total_tokens, 17);

    let body = last_body(&server).await;
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["temperature"], 1.0);
    assert_eq!(body["stream"], false);
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "Say hello.");
}

#[tokio::test]
async fn test_response_format_omitted_without_json_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .mount(&server)
        .await;

    let config = OpenAiCompatibleConfig {
        capabilities: LlmCapabilities::SYSTEM_MESSAGES,
        ..config_for(&server)
    };
    let provider = OpenAiCompatibleProvider::new(config).unwrap();
    provider.complete(&json_request()).await.unwrap();

    let body = last_body(&server).await;
    assert!(body.get("response_format").is_none());
}

#[tokio::test]
async fn test_local_server_without_key_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .mount(&server)
        .await;

    let config = OpenAiCompatibleConfig {
        base_url: format!("{}/v1", server.uri()),
        ..OpenAiCompatibleConfig::ollama("llama3.1")
    };
    let provider = OpenAiCompatibleProvider::new(config).unwrap();
    provider
        .complete(&ChatRequest::new(vec![ChatMessage::user("hi")]))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "llama3.1");
}

// ============================================================================
// Upstream Failures
// ============================================================================

#[tokio::test]
async fn test_upstream_error_status_is_generation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(config_for(&server)).unwrap();
    let error = provider.complete(&json_request()).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::GenerationFailure);
    assert_eq!(error.http_status(), 502);
    assert!(error.message.contains("authentication failed"));
    assert_eq!(error.details["upstream_status"], 401);
}

#[tokio::test]
async fn test_empty_choices_is_generation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(config_for(&server)).unwrap();
    let error = provider.complete(&json_request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::GenerationFailure);
}

#[tokio::test]
async fn test_timeout_is_generation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("{}"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = OpenAiCompatibleConfig {
        request_timeout: Duration::from_millis(200),
        ..config_for(&server)
    };
    let provider = OpenAiCompatibleProvider::new(config).unwrap();
    let error = provider.complete(&json_request()).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::GenerationFailure);
    assert!(error.message.contains("did not respond"));
}

#[tokio::test]
async fn test_unreachable_server_is_generation_failure() {
    let config = OpenAiCompatibleConfig {
        base_url: "http://127.0.0.1:9/v1".to_owned(),
        connect_timeout: Duration::from_millis(500),
        ..OpenAiCompatibleConfig::default()
    };
    let provider = OpenAiCompatibleProvider::new(config).unwrap();
    let error = provider.complete(&json_request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::GenerationFailure);
}

// ============================================================================
// Structured Generation End to End
// ============================================================================

fn evaluation_request() -> GenerationRequest {
    GenerationRequest {
        model: "gpt-4o".to_owned(),
        temperature: 0.0,
        system_instruction: "judge".to_owned(),
        user_instruction: "did it work?".to_owned(),
        shape: OutputShape::boolean("success"),
    }
}

#[tokio::test]
async fn test_service_accepts_fenced_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("```json\n{\"success\": true}\n```")),
        )
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(config_for(&server)).unwrap();
    let service = GenerationService::new(Arc::new(provider));
    let result = service.invoke(&evaluation_request()).await.unwrap();

    assert_eq!(result.get_bool("success"), Some(true));
    assert_eq!(last_body(&server).await["temperature"], 0.0);
}

#[tokio::test]
async fn test_service_rejects_prose_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("I think it probably worked.")),
        )
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(config_for(&server)).unwrap();
    let service = GenerationService::new(Arc::new(provider));
    let error = service.invoke(&evaluation_request()).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::GenerationFailure);
}

#[tokio::test]
async fn test_health_check_lists_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(config_for(&server)).unwrap();
    assert!(provider.health_check().await.unwrap());
}

#[test]
fn test_presets() {
    let ollama = OpenAiCompatibleConfig::ollama("qwen2.5:7b");
    assert_eq!(ollama.base_url, "http://localhost:11434/v1");
    assert!(ollama.api_key.is_none());
    assert_eq!(ollama.provider_name, "ollama");
    assert!(ollama.capabilities.supports_json_mode());

    let vllm = OpenAiCompatibleConfig::vllm("meta-llama/Llama-3.1-8B");
    assert_eq!(vllm.base_url, "http://localhost:8000/v1");
    assert_eq!(vllm.display_name, "vLLM (Local)");

    let openai = OpenAiCompatibleConfig::openai("sk-x", "gpt-4o-mini");
    assert_eq!(openai.api_key.as_deref(), Some("sk-x"));
    assert_eq!(openai.default_model, "gpt-4o-mini");
}
