//! Wire-level checks for the Google AI calls against a local stand-in server.

use ragctx::embedding::{Embedder, EmbeddingError, GoogleAiEmbedder};
use ragctx::services::google_ai::{
    EmbedContentRequest, EmbedContentResponse, GoogleAiClient, GoogleAiConfig, GoogleAiError,
};
use ragctx::services::llm::{GenerateRequest, GoogleAiAdapter, LlmClient, LlmError};
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

struct CapturedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: serde_json::Value,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Serve exactly one request with a canned status and JSON body
async fn serve_once(status: &'static str, response_body: String) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v1beta", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let read = socket.read(&mut chunk).await.unwrap();
            assert!(read > 0, "connection closed before headers");
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let mut lines = head.split("\r\n").filter(|l| !l.is_empty());
        let request_line = lines.next().unwrap().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();

        let content_length: usize = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .map(|(_, v)| v.parse().unwrap())
            .unwrap_or(0);

        while buffer.len() < header_end + content_length {
            let read = socket.read(&mut chunk).await.unwrap();
            assert!(read > 0, "connection closed before body");
            buffer.extend_from_slice(&chunk[..read]);
        }
        let body = serde_json::from_slice(&buffer[header_end..header_end + content_length])
            .unwrap_or(serde_json::Value::Null);

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
            response_body.len(),
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        CapturedRequest {
            request_line,
            headers,
            body,
        }
    });

    (base_url, handle)
}

fn test_config(base_url: String) -> GoogleAiConfig {
    GoogleAiConfig::new("test-key".to_string())
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5))
        .with_max_retries(0)
}

#[test]
fn test_embed_request_shape() {
    let request = EmbedContentRequest::new("text-embedding-004", "The heart has four chambers.")
        .with_task_type("SEMANTIC_SIMILARITY");

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "model": "models/text-embedding-004",
            "content": { "parts": [{ "text": "The heart has four chambers." }] },
            "taskType": "SEMANTIC_SIMILARITY"
        })
    );
}

#[test]
fn test_embed_response_shape() {
    let response: EmbedContentResponse =
        serde_json::from_value(json!({ "embedding": { "values": [0.25, -0.5, 1.0] } })).unwrap();

    assert_eq!(response.into_values().unwrap(), vec![0.25, -0.5, 1.0]);
}

#[tokio::test]
async fn test_embed_text_round_trip() {
    let (base_url, server) = serve_once(
        "200 OK",
        json!({ "embedding": { "values": [0.1, 0.2, 0.3] } }).to_string(),
    )
    .await;

    let client = GoogleAiClient::new(test_config(base_url)).unwrap();
    let values = client.embed_text("cardiology notes").await.unwrap();
    assert_eq!(values, vec![0.1, 0.2, 0.3]);

    let captured = server.await.unwrap();
    assert_eq!(
        captured.request_line,
        "POST /v1beta/models/text-embedding-004:embedContent HTTP/1.1"
    );
    assert_eq!(captured.header("x-goog-api-key"), Some("test-key"));
    assert_eq!(
        captured.body,
        json!({
            "model": "models/text-embedding-004",
            "content": { "parts": [{ "text": "cardiology notes" }] },
            "taskType": "SEMANTIC_SIMILARITY"
        })
    );
}

#[tokio::test]
async fn test_embedder_maps_auth_failure() {
    let (base_url, server) = serve_once(
        "401 Unauthorized",
        json!({ "error": { "code": 401, "message": "API key not valid" } }).to_string(),
    )
    .await;

    let client = GoogleAiClient::new(test_config(base_url)).unwrap();
    let embedder = GoogleAiEmbedder::from_client(client);
    let err = embedder.embed("anything").await.unwrap_err();

    match err {
        EmbeddingError::Unauthorized { message } => {
            assert!(message.contains("API key not valid"))
        }
        other => panic!("expected authentication failure, got {other:?}"),
    }

    server.await.unwrap();
}

#[tokio::test]
async fn test_empty_embedding_rejected() {
    let (base_url, server) =
        serve_once("200 OK", json!({ "embedding": { "values": [] } }).to_string()).await;

    let client = GoogleAiClient::new(test_config(base_url)).unwrap();
    let err = client.embed_text("anything").await.unwrap_err();

    assert!(matches!(err, GoogleAiError::Malformed { .. }));
    server.await.unwrap();
}

#[tokio::test]
async fn test_withheld_generation_is_rejected() {
    let (base_url, server) = serve_once(
        "200 OK",
        json!({ "candidates": [{ "finishReason": "SAFETY" }] }).to_string(),
    )
    .await;

    let llm = GoogleAiAdapter::from_client(GoogleAiClient::new(test_config(base_url)).unwrap());
    let err = llm
        .generate(GenerateRequest::new("Write about the heart"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Rejected { .. }));
    assert!(!err.is_retryable());

    let captured = server.await.unwrap();
    assert_eq!(
        captured.request_line,
        "POST /v1beta/models/gemini-2.5-flash:generateContent HTTP/1.1"
    );
    assert_eq!(
        captured.body["contents"][0]["parts"][0]["text"],
        "Write about the heart"
    );
}

#[tokio::test]
async fn test_server_error_without_retries_is_unavailable() {
    let (base_url, server) = serve_once(
        "503 Service Unavailable",
        json!({ "error": { "code": 503, "message": "The model is overloaded" } }).to_string(),
    )
    .await;

    let client = GoogleAiClient::new(test_config(base_url)).unwrap();
    let err = client.embed_text("anything").await.unwrap_err();

    assert!(matches!(err, GoogleAiError::Unavailable { status: 503, ref message } if message == "The model is overloaded"));
    server.await.unwrap();
}
