//! Blocking OpenAI Chat Completions backend for the [`Completion`] trait.
//!
//! Enabled with the `openai` cargo feature. The client speaks the plain
//! chat-completions wire format; HTTP status codes are folded into the
//! [`CompletionError`] taxonomy so callers never see transport details.

use crate::compose::{Completion, CompletionError, CompletionRequest};
use serde_json::{Value, json};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Points the client at a non-default endpoint (proxy, test server).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Cheap liveness probe against the models endpoint; succeeds when the
    /// key is accepted and a model list comes back.
    pub fn check_connection(&self) -> Result<(), CompletionError> {
        let response = self
            .http
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| CompletionError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(map_status(status, &body));
        }
        let body: Value = response
            .json()
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;
        match body.get("data").and_then(Value::as_array) {
            Some(_) => Ok(()),
            None => Err(CompletionError::Malformed(
                "models response carried no data array".to_string(),
            )),
        }
    }
}

impl Completion for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let mut body = json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "max_tokens": request.max_tokens,
        });
        // The search-preview model rejects temperature and wants the web
        // search options object present.
        if request.model == "gpt-4o-search-preview" {
            body["web_search_options"] = json!({});
        } else if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }

        debug!(model = %request.model, max_tokens = request.max_tokens, "chat completion request");
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(map_status(status, &body));
        }

        let payload: Value = response
            .json()
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;
        payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                CompletionError::Malformed("response carried no message content".to_string())
            })
    }
}

fn map_status(status: reqwest::StatusCode, body: &str) -> CompletionError {
    let detail = api_error_message(body).unwrap_or_else(|| format!("HTTP {status}"));
    match status.as_u16() {
        401 | 403 => CompletionError::Auth(detail),
        429 => CompletionError::RateLimit(detail),
        _ => CompletionError::Server(detail),
    }
}

/// Pulls `error.message` out of an OpenAI error body, when present.
fn api_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_into_the_taxonomy() {
        let auth = map_status(reqwest::StatusCode::UNAUTHORIZED, "");
        assert!(matches!(auth, CompletionError::Auth(_)));
        let limited = map_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(limited, CompletionError::RateLimit(_)));
        let server = map_status(reqwest::StatusCode::BAD_GATEWAY, "");
        assert!(matches!(server, CompletionError::Server(_)));
    }

    #[test]
    fn api_error_detail_is_extracted() {
        let body = r#"{"error": {"message": "Incorrect API key provided"}}"#;
        let err = map_status(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(
            err,
            CompletionError::Auth("Incorrect API key provided".to_string())
        );
    }
}
