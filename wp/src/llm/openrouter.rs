//! OpenRouter API client implementation
//!
//! Implements the LlmClient trait against OpenRouter's Chat Completions API
//! (OpenAI wire format plus the attribution headers OpenRouter asks for).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, FinishReason, LlmClient, LlmError, Role, TokenUsage};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Classify a transport-level error, surfacing timeouts distinctly
fn classify_send_error(timeout: Duration, e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(timeout)
    } else {
        LlmError::Network(e)
    }
}

/// OpenRouter API client
pub struct OpenRouterClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
    referer: String,
    app_title: String,
}

impl OpenRouterClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::MissingApiKey(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
            timeout,
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
        })
    }

    /// Build the request body for the chat completions endpoint
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];

        for msg in &request.messages {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            messages.push(serde_json::json!({
                "role": role,
                "content": msg.content,
            }));
        }

        let max_tokens = request.max_tokens.min(self.max_tokens);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
        });

        if request.json_mode {
            debug!("build_request_body: requesting json_object response format");
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }

        body
    }

    /// Parse the API response
    fn parse_response(&self, api_response: OpenRouterResponse) -> CompletionResponse {
        let choice = api_response.choices.into_iter().next();

        let (content, finish_reason) = match choice {
            Some(c) => {
                let finish_reason = FinishReason::from_api(c.finish_reason.as_deref());
                (c.message.content, finish_reason)
            }
            None => (None, FinishReason::Stop),
        };

        if finish_reason == FinishReason::Length {
            warn!("parse_response: completion hit max_tokens, reply is likely truncated");
        }

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        CompletionResponse {
            content,
            finish_reason,
            usage,
        }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(
                    attempt,
                    backoff_ms = backoff,
                    "complete: retrying after transient error"
                );
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("content-type", "application/json")
                .header("HTTP-Referer", &self.referer)
                .header("X-Title", &self.app_title)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "complete: transport error");
                    last_error = Some(classify_send_error(self.timeout, e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 {
                debug!("complete: rate limited (429)");
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);

                return Err(LlmError::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                });
            }

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "complete: retryable error");
                last_error = Some(LlmError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(%status, "complete: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiError { status, message: text });
            }

            debug!("complete: success");
            let api_response: OpenRouterResponse = response
                .json()
                .await
                .map_err(|e| classify_send_error(self.timeout, e))?;
            return Ok(self.parse_response(api_response));
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

// OpenRouter API response types

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<OpenRouterChoice>,
    #[serde(default)]
    usage: Option<OpenRouterUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;

    fn test_client(base_url: &str) -> OpenRouterClient {
        OpenRouterClient {
            model: "deepseek/deepseek-chat-v3.1".to_string(),
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            http: Client::new(),
            max_tokens: 8192,
            timeout: Duration::from_secs(30),
            referer: "https://wayplan.dev".to_string(),
            app_title: "wayplan".to_string(),
        }
    }

    fn test_request(json_mode: bool) -> CompletionRequest {
        CompletionRequest {
            system_prompt: "You are a travel planner".to_string(),
            messages: vec![Message::user("Plan a trip")],
            max_tokens: 1000,
            json_mode,
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let client = test_client("https://openrouter.ai/api/v1");
        let body = client.build_request_body(&test_request(false));

        assert_eq!(body["model"], "deepseek/deepseek-chat-v3.1");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a travel planner");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_build_request_body_json_mode() {
        let client = test_client("https://openrouter.ai/api/v1");
        let body = client.build_request_body(&test_request(true));

        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_max_tokens_capped() {
        let mut client = test_client("https://openrouter.ai/api/v1");
        client.max_tokens = 500;

        let body = client.build_request_body(&test_request(false));
        assert_eq!(body["max_tokens"], 500);
    }

    #[test]
    fn test_parse_response_usage_optional() {
        let client = test_client("https://openrouter.ai/api/v1");
        let api_response = OpenRouterResponse {
            choices: vec![OpenRouterChoice {
                message: OpenRouterMessage {
                    content: Some("{}".to_string()),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        };

        let response = client.parse_response(api_response);
        assert_eq!(response.content.as_deref(), Some("{}"));
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_header("x-title", "wayplan")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{"message": {"content": "{\"tripName\": \"Tokyo\"}"}, "finish_reason": "stop"}],
                    "usage": {"prompt_tokens": 120, "completion_tokens": 40}
                }"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let response = client.complete(test_request(true)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.content.as_deref(), Some("{\"tripName\": \"Tokyo\"}"));
        assert_eq!(response.usage.input_tokens, 120);
        assert_eq!(response.usage.output_tokens, 40);
    }

    #[tokio::test]
    async fn test_timeout_classified_as_timeout_error() {
        // A socket that accepts but never answers forces a client timeout
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((sock, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(2)).await;
                drop(sock);
            }
        });

        let http = Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let e = http.get(format!("http://{}/", addr)).send().await.unwrap_err();
        assert!(e.is_timeout());

        let err = classify_send_error(Duration::from_millis(50), e);
        assert!(matches!(err, LlmError::Timeout(d) if d == Duration::from_millis(50)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_connect_error_classified_as_network() {
        // Nothing listens on the reserved port; connection refused, not a timeout
        let http = Client::new();
        let e = http.get("http://127.0.0.1:1/").send().await.unwrap_err();

        let err = classify_send_error(Duration::from_secs(30), e);
        assert!(matches!(err, LlmError::Network(_)));
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.complete(test_request(false)).await.unwrap_err();

        assert!(err.is_rate_limit());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
    }

    #[tokio::test]
    async fn test_complete_client_error_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("unauthorized")
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.complete(test_request(false)).await.unwrap_err();

        mock.assert_async().await;
        match err {
            LlmError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "unauthorized");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }
}
