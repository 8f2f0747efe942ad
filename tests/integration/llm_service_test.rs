// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use ayeaye_chef::config::settings::LlmSettings;
use ayeaye_chef::domain::services::ingredient_detection_service::ImageLabeler;
use ayeaye_chef::domain::services::llm_service::{ChatRequest, LlmService};
use ayeaye_chef::infrastructure::vision::llm_image_labeler::LlmImageLabeler;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(base: &str, api_key: Option<&str>) -> LlmSettings {
    LlmSettings {
        api_base_url: base.to_string(),
        api_key: api_key.map(str::to_string),
        text_model: "gpt-test".into(),
        vision_model: "gpt-vision-test".into(),
        timeout_secs: 5,
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 30, "total_tokens": 42 }
    })
}

#[tokio::test]
async fn test_complete_sends_bearer_and_parses_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("hello chef")))
        .expect(1)
        .mount(&server)
        .await;

    let service = LlmService::new(&settings(&server.uri(), Some("sk-test")), "gpt-test").unwrap();
    let response = service
        .complete(ChatRequest::new("system", "user"))
        .await
        .unwrap();

    assert_eq!(response.content, "hello chef");
    assert_eq!(response.usage.total_tokens, 42);
}

#[tokio::test]
async fn test_complete_without_key_fails_fast() {
    let service = LlmService::new(&settings("http://127.0.0.1:1", None), "gpt-test").unwrap();
    assert!(!service.is_configured());
    assert!(service
        .complete(ChatRequest::new("system", "user"))
        .await
        .is_err());
}

#[tokio::test]
async fn test_complete_reports_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let service = LlmService::new(&settings(&server.uri(), Some("sk-test")), "gpt-test").unwrap();
    let err = service
        .complete(ChatRequest::new("system", "user"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("429"));
}

/// 视觉模型输出的 JSON 被解析为图像信号
#[tokio::test]
async fn test_image_labeler_parses_vision_output() {
    let server = MockServer::start().await;
    let content = "Here you go:\n```json\n{\"labels\":[{\"text\":\"Spinach\",\"confidence\":0.9}],\"text\":[{\"text\":\"PANEER\",\"confidence\":0.8}]}\n```";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(&server)
        .await;

    let service =
        LlmService::new(&settings(&server.uri(), Some("sk-test")), "gpt-vision-test").unwrap();
    let labeler = LlmImageLabeler::new(Arc::new(service));
    assert_eq!(labeler.model(), "gpt-vision-test");

    let signals = labeler.label(&[0xFF, 0xD8], "image/jpeg").await.unwrap();
    assert_eq!(signals.labels.len(), 1);
    assert_eq!(signals.labels[0].text, "Spinach");
    assert_eq!(signals.text[0].text, "PANEER");
}
