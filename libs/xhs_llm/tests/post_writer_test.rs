use httpmock::prelude::*;
use serde_json::{json, Value};
use std::time::Duration;
use xhs_llm::{LlmError, PostWriter, WriterSettings};

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 900, "completion_tokens": 400, "total_tokens": 1300 }
    })
}

fn writer_for(server: &MockServer) -> PostWriter {
    PostWriter::new(WriterSettings {
        base_url: server.url("/v1"),
        timeout: Duration::from_secs(10),
        ..WriterSettings::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_generates_draft_from_chat_completion() {
    let server = MockServer::start_async().await;
    let draft = json!({
        "titles": ["秋天必备🍂", "手把手教你🔥", "建议收藏✨", "绝绝子😍", "万万没想到😱"],
        "content": "今天分享我的秋季穿搭～🍁\n\n#秋季穿搭 #OOTD"
    });
    let reply = format!("```json\n{}\n```", draft);

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .body_contains("gpt-3.5-turbo")
                .body_contains("秋季穿搭");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(completion(&reply));
        })
        .await;

    let result = writer_for(&server).generate("秋季穿搭", "sk-test").await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.titles.len(), 5);
    assert_eq!(result.titles[0], "秋天必备🍂");
    assert!(result.content.contains("#OOTD"));
}

#[tokio::test]
async fn test_wrong_title_count_is_reported() {
    let server = MockServer::start_async().await;
    let reply = json!({ "titles": ["a", "b", "c"], "content": "x" }).to_string();

    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(completion(&reply));
        })
        .await;

    let err = writer_for(&server).generate("主题", "sk-test").await.unwrap_err();

    assert!(matches!(err, LlmError::SchemaViolation(_)), "{err}");
    assert!(!err.is_validation());
}

#[tokio::test]
async fn test_missing_content_field_is_reported() {
    let server = MockServer::start_async().await;
    let reply = json!({ "titles": ["a", "b", "c", "d", "e"] }).to_string();

    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(completion(&reply));
        })
        .await;

    let err = writer_for(&server).generate("主题", "sk-test").await.unwrap_err();

    assert!(err.to_string().contains("content"), "{err}");
}

#[tokio::test]
async fn test_rejected_credential_surfaces_api_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401).json_body(json!({
                "error": {
                    "message": "Incorrect API key provided",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            }));
        })
        .await;

    let err = writer_for(&server).generate("主题", "sk-wrong").await.unwrap_err();

    assert!(matches!(err, LlmError::Request(_)));
    assert!(err.to_string().contains("Incorrect API key provided"));
}

#[tokio::test]
async fn test_empty_completion_is_reported() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(completion("   "));
        })
        .await;

    let err = writer_for(&server).generate("主题", "sk-test").await.unwrap_err();

    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn test_empty_inputs_make_no_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(completion("{}"));
        })
        .await;
    let writer = writer_for(&server);

    assert!(matches!(
        writer.generate("主题", "").await,
        Err(LlmError::MissingApiKey)
    ));
    assert!(matches!(
        writer.generate("", "sk-test").await,
        Err(LlmError::EmptyTheme)
    ));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_server_error_is_returned_after_one_attempt() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500).body("upstream exploded");
        })
        .await;
    let writer = PostWriter::new(WriterSettings {
        base_url: server.url("/v1"),
        timeout: Duration::from_secs(6),
        ..WriterSettings::default()
    })
    .unwrap();

    let err = writer.generate("主题", "sk-test").await.unwrap_err();

    assert!(matches!(err, LlmError::Request(_)), "{err}");
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).json_body(json!({
                "error": {
                    "message": "Rate limit reached",
                    "type": "requests",
                    "param": null,
                    "code": "rate_limit_exceeded"
                }
            }));
        })
        .await;

    let err = writer_for(&server).generate("主题", "sk-test").await.unwrap_err();

    assert!(matches!(err, LlmError::Request(_)), "{err}");
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_request_error() {
    let writer = PostWriter::new(WriterSettings {
        base_url: "http://127.0.0.1:9/v1".to_string(),
        timeout: Duration::from_secs(6),
        ..WriterSettings::default()
    })
    .unwrap();

    let err = writer.generate("主题", "sk-test").await.unwrap_err();

    assert!(matches!(err, LlmError::Request(_)), "{err}");
}
