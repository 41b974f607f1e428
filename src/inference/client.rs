use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::Stream;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::stream_parser::ndjson_to_text_stream;
use super::{
    ChatMessage, ChatRequest, ConnectionStatus, InferenceBackend, ModelInfo, StatusReport,
    same_model,
};
use crate::error::{ErrorKind, Result, TranslateError};

/// Upper bound for liveness probes. Translation calls themselves have no timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    modified_at: Option<String>,
    #[serde(default)]
    digest: Option<String>,
}

impl From<TagModel> for ModelInfo {
    fn from(model: TagModel) -> Self {
        Self {
            name: model.name,
            size: model.size,
            modified_at: model
                .modified_at
                .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
                .map(|ts| ts.with_timezone(&Utc)),
            digest: model.digest,
        }
    }
}

pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// HTTP client for an Ollama server.
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    probe_timeout: Duration,
}

impl OllamaClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint.trim_end_matches('/'))
    }

    async fn fetch_models(&self, timeout: Option<Duration>) -> Result<Vec<ModelInfo>> {
        let mut request = self.client.get(self.url("/api/tags"));
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranslateError::from_transport(&e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::from_status(status, &body, None));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::from_transport(&e))?;

        Ok(tags.models.into_iter().map(ModelInfo::from).collect())
    }

    /// Fails with `ModelNotFound` unless the backend currently lists `name`.
    async fn ensure_model(&self, name: &str) -> Result<()> {
        let models = self.fetch_models(None).await?;
        if models.iter().any(|m| same_model(&m.name, name)) {
            Ok(())
        } else {
            Err(TranslateError::ModelNotFound(name.to_string()))
        }
    }

    async fn send_chat(&self, request: &ChatRequest, stream: bool) -> Result<reqwest::Response> {
        self.ensure_model(&request.model).await?;

        let body = ChatBody {
            model: &request.model,
            messages: &request.messages,
            stream,
            options: ChatOptions {
                temperature: request.temperature,
            },
        };

        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslateError::from_transport(&e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::from_status(
                status,
                &body,
                Some(&request.model),
            ));
        }

        Ok(response)
    }

    /// Streaming completion. Fragments arrive as the backend produces them.
    ///
    /// The existence check and request are aborted if `cancel` fires; once the
    /// stream is running, cancellation ends it with a `Cancelled` item.
    pub async fn chat_stream(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<TextStream> {
        tracing::debug!(model = %request.model, "starting streaming chat");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(TranslateError::Cancelled),
            response = self.send_chat(&request, true) => response?,
        };

        Ok(Box::pin(ndjson_to_text_stream(
            response.bytes_stream(),
            cancel,
        )))
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn is_connected(&self) -> bool {
        match self
            .client
            .get(self.url("/api/version"))
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "backend liveness probe failed");
                false
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.fetch_models(None).await
    }

    async fn model_exists(&self, name: &str) -> bool {
        match self.fetch_models(None).await {
            Ok(models) => models.iter().any(|m| same_model(&m.name, name)),
            Err(e) => {
                tracing::debug!(model = name, error = %e, "model lookup failed");
                false
            }
        }
    }

    async fn chat(&self, request: ChatRequest, cancel: &CancellationToken) -> Result<String> {
        tracing::debug!(model = %request.model, "sending chat request");

        let round_trip = async {
            let response = self.send_chat(&request, false).await?;
            let parsed: ChatResponse = response
                .json()
                .await
                .map_err(|e| TranslateError::from_transport(&e))?;
            Ok(parsed.message.content)
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TranslateError::Cancelled),
            result = round_trip => result,
        }
    }

    async fn connection_status(&self) -> StatusReport {
        match self.fetch_models(Some(self.probe_timeout)).await {
            Ok(models) => StatusReport {
                status: ConnectionStatus::Connected,
                endpoint: self.endpoint.clone(),
                model_count: Some(models.len()),
                message: None,
            },
            Err(e) => {
                let status = match e.kind() {
                    ErrorKind::BackendUnavailable | ErrorKind::Network => {
                        ConnectionStatus::Disconnected
                    }
                    _ => ConnectionStatus::Error,
                };
                tracing::debug!(%status, error = %e, "backend status probe failed");
                StatusReport {
                    status,
                    endpoint: self.endpoint.clone(),
                    model_count: None,
                    message: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use httpmock::prelude::*;
    use serde_json::json;

    fn tags_body() -> serde_json::Value {
        json!({
            "models": [
                {
                    "name": "llama3:latest",
                    "model": "llama3:latest",
                    "modified_at": "2024-05-01T12:00:00.123456789-07:00",
                    "size": 4_661_224_676_u64,
                    "digest": "365c0bd3c000"
                },
                { "name": "gemma3:12b", "model": "gemma3:12b" }
            ]
        })
    }

    async fn mock_tags(server: &MockServer) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tags");
                then.status(200).json_body(tags_body());
            })
            .await
    }

    fn chat_request(model: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("Hello")],
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn test_list_models_preserves_backend_order() {
        let server = MockServer::start_async().await;
        mock_tags(&server).await;
        let client = OllamaClient::new(server.base_url());

        let models = client.list_models().await.unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "llama3:latest");
        assert_eq!(models[0].size, Some(4_661_224_676));
        assert!(models[0].modified_at.is_some());
        assert_eq!(models[1].name, "gemma3:12b");
        assert!(models[1].modified_at.is_none());
    }

    #[tokio::test]
    async fn test_model_exists_normalizes_latest_tag() {
        let server = MockServer::start_async().await;
        mock_tags(&server).await;
        let client = OllamaClient::new(format!("{}/", server.base_url()));

        assert!(client.model_exists("llama3").await);
        assert!(client.model_exists("llama3:latest").await);
        assert!(client.model_exists("gemma3:12b").await);
        assert!(!client.model_exists("gemma3").await);
    }

    #[tokio::test]
    async fn test_model_exists_false_when_backend_down() {
        let client = OllamaClient::new("http://127.0.0.1:1");
        assert!(!client.model_exists("llama3").await);
    }

    #[tokio::test]
    async fn test_list_models_connection_refused_is_backend_unavailable() {
        let client = OllamaClient::new("http://127.0.0.1:1");
        let err = client.list_models().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
    }

    #[tokio::test]
    async fn test_is_connected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/version");
                then.status(200).json_body(json!({ "version": "0.5.7" }));
            })
            .await;

        assert!(OllamaClient::new(server.base_url()).is_connected().await);
        assert!(!OllamaClient::new("http://127.0.0.1:1").is_connected().await);
    }

    #[tokio::test]
    async fn test_chat_sends_model_and_temperature() {
        let server = MockServer::start_async().await;
        mock_tags(&server).await;
        let chat_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/chat")
                    .json_body_partial(r#"{"model":"llama3","stream":false,"options":{"temperature":0.3}}"#);
                then.status(200).json_body(json!({
                    "model": "llama3",
                    "message": { "role": "assistant", "content": "こんにちは世界" },
                    "done": true
                }));
            })
            .await;
        let client = OllamaClient::new(server.base_url());

        let text = client
            .chat(chat_request("llama3"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(text, "こんにちは世界");
        chat_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_unknown_model_fails_before_request() {
        let server = MockServer::start_async().await;
        mock_tags(&server).await;
        let chat_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat");
                then.status(200);
            })
            .await;
        let client = OllamaClient::new(server.base_url());

        let err = client
            .chat(chat_request("missing"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::ModelNotFound(ref name) if name == "missing"));
        assert_eq!(chat_mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_chat_cancellation_aborts_request() {
        let server = MockServer::start_async().await;
        mock_tags(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat");
                then.status(200)
                    .delay(Duration::from_secs(10))
                    .json_body(json!({ "message": { "content": "late" }, "done": true }));
            })
            .await;
        let client = OllamaClient::new(server.base_url());
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let err = client.chat(chat_request("llama3"), &cancel).await.unwrap_err();

        assert!(err.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_chat_server_error_is_classified() {
        let server = MockServer::start_async().await;
        mock_tags(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat");
                then.status(500).body("internal failure");
            })
            .await;
        let client = OllamaClient::new(server.base_url());

        let err = client
            .chat(chat_request("llama3"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Generic);
    }

    #[tokio::test]
    async fn test_chat_stream_yields_fragments() {
        let server = MockServer::start_async().await;
        mock_tags(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/chat")
                    .json_body_partial(r#"{"stream":true}"#);
                then.status(200).body(concat!(
                    "{\"message\":{\"role\":\"assistant\",\"content\":\"こんにちは\"},\"done\":false}\n",
                    "{\"message\":{\"role\":\"assistant\",\"content\":\"世界\"},\"done\":false}\n",
                    "{\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true}\n",
                ));
            })
            .await;
        let client = OllamaClient::new(server.base_url());

        let stream = client
            .chat_stream(chat_request("llama3"), CancellationToken::new())
            .await
            .unwrap();
        let text: String = stream.map(|r| r.unwrap()).collect::<Vec<_>>().await.concat();

        assert_eq!(text, "こんにちは世界");
    }

    #[tokio::test]
    async fn test_chat_stream_unknown_model() {
        let server = MockServer::start_async().await;
        mock_tags(&server).await;
        let client = OllamaClient::new(server.base_url());

        let result = client
            .chat_stream(chat_request("missing"), CancellationToken::new())
            .await;

        assert!(matches!(result, Err(TranslateError::ModelNotFound(_))));
    }

    #[tokio::test]
    async fn test_connection_status_connected() {
        let server = MockServer::start_async().await;
        mock_tags(&server).await;
        let client = OllamaClient::new(server.base_url());

        let report = client.connection_status().await;

        assert_eq!(report.status, ConnectionStatus::Connected);
        assert_eq!(report.model_count, Some(2));
        assert!(report.message.is_none());
    }

    #[tokio::test]
    async fn test_connection_status_disconnected() {
        let client = OllamaClient::new("http://127.0.0.1:1");

        let report = client.connection_status().await;

        assert_eq!(report.status, ConnectionStatus::Disconnected);
        assert_eq!(report.endpoint, "http://127.0.0.1:1");
        assert!(report.message.is_some());
    }

    #[tokio::test]
    async fn test_connection_status_error_on_bad_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tags");
                then.status(500).body("oops");
            })
            .await;
        let client = OllamaClient::new(server.base_url());

        let report = client.connection_status().await;

        assert_eq!(report.status, ConnectionStatus::Error);
    }

    #[tokio::test]
    async fn test_connection_status_reprobes_every_call() {
        let server = MockServer::start_async().await;
        let tags = mock_tags(&server).await;
        let client = OllamaClient::new(server.base_url());

        client.connection_status().await;
        client.connection_status().await;

        tags.assert_hits_async(2).await;
    }
}
