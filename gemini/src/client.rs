use anyhow::{anyhow, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::types::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Minimal client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_timeout(api_key, Duration::from_secs(60))
    }

    pub fn with_timeout(api_key: String, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(anyhow!("Gemini API key cannot be empty"));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("failed to create HTTP client: {e}"))?;
        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Sends one request and returns the text of the first candidate.
    pub async fn generate_content(&self, model: &str, request: &GenerateContentRequest) -> Result<String> {
        let url = self.endpoint(model);
        debug!(
            "gemini request to {url}: {}",
            serde_json::to_string(request).unwrap_or_default()
        );

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| anyhow!("gemini request failed: {e}"))?;

        let status = resp.status();
        info!("gemini response status {status} (model: {model})");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| format!("{} {}", b.error.status, b.error.message))
                .unwrap_or(body);
            warn!("gemini http {status}: {message}");
            return Err(anyhow!("gemini http {status}: {message}"));
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| anyhow!("invalid gemini response: {e}"))?;

        parsed.text().ok_or_else(|| {
            let reason = parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            anyhow!("gemini returned no text ({reason})")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Content, GenerationConfig};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri())
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(GeminiClient::new(String::new()).is_err());
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let c = GeminiClient::new("k".to_string())
            .unwrap()
            .with_base_url("http://localhost:1234/");
        assert_eq!(
            c.endpoint("gemini-2.5-flash"),
            "http://localhost:1234/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
                "systemInstruction": {"parts": [{"text": "persona"}]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "hello there"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut req = GenerateContentRequest::user_prompt("hi");
        req.system_instruction = Some(Content::instruction("persona"));
        let text = client(&server).generate_content("gemini-test", &req).await.unwrap();
        assert_eq!(text, "hello there");
    }

    #[tokio::test]
    async fn sends_response_schema_for_json_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "{\"ok\":true}"}]}}]
            })))
            .mount(&server)
            .await;

        let req = GenerateContentRequest {
            generation_config: Some(GenerationConfig::json(json!({"type": "OBJECT"}))),
            ..GenerateContentRequest::user_prompt("json please")
        };
        let text = client(&server).generate_content("m", &req).await.unwrap();
        assert_eq!(text, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn http_error_carries_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate_content("m", &GenerateContentRequest::user_prompt("x"))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("403"), "{msg}");
        assert!(msg.contains("API key not valid"), "{msg}");
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate_content("m", &GenerateContentRequest::user_prompt("x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
