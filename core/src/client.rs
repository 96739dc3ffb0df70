use anyhow::{anyhow, Result};
use async_trait::async_trait;
use campuseats_common::{ChatMessage, ChatRole};
use campuseats_gemini::{Content, GeminiClient, GenerateContentRequest, GenerationConfig, Tool, ToolConfig};
use std::sync::Arc;

use crate::config::Config;
use crate::geolocation::Coordinates;

/// Which feature a request serves; picks the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Recommendation,
    LocationInsight,
    Chat,
}

/// Provider-neutral request shape.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub system_instruction: Option<String>,
    /// Earlier turns, oldest first.
    pub history: Vec<ChatMessage>,
    pub prompt: String,
    pub response_schema: Option<serde_json::Value>,
    /// Enables map grounding around this point.
    pub location: Option<Coordinates>,
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, task: Task, request: ModelRequest) -> Result<String>;
}

/// Used when no API key is configured. Every call fails, so callers
/// fall back to their placeholder output.
pub struct OfflineClient;

#[async_trait]
impl ModelClient for OfflineClient {
    async fn generate(&self, task: Task, _request: ModelRequest) -> Result<String> {
        Err(anyhow!("no API key configured; {task:?} unavailable offline"))
    }
}

/// Adapter to drive `GeminiClient` through `ModelClient`.
pub struct GeminiAdapter {
    inner: GeminiClient,
    model: String,
    location_model: String,
}

impl GeminiAdapter {
    pub fn new(inner: GeminiClient, model: String, location_model: String) -> Self {
        Self { inner, model, location_model }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("missing API key"))?;
        let mut inner = GeminiClient::with_timeout(api_key, config.timeout())?;
        if let Some(base) = &config.api_base {
            inner = inner.with_base_url(base.clone());
        }
        Ok(Self::new(inner, config.model.clone(), config.location_model.clone()))
    }

    fn model_for(&self, task: Task) -> &str {
        match task {
            Task::LocationInsight => &self.location_model,
            Task::Recommendation | Task::Chat => &self.model,
        }
    }
}

pub(crate) fn to_gemini_request(request: ModelRequest) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request
        .history
        .into_iter()
        .map(|m| match m.role {
            ChatRole::User => Content::user(m.text),
            ChatRole::Bot => Content::model(m.text),
        })
        .collect();
    contents.push(Content::user(request.prompt));

    GenerateContentRequest {
        contents,
        system_instruction: request.system_instruction.map(Content::instruction),
        generation_config: request.response_schema.map(GenerationConfig::json),
        tools: request.location.map(|_| vec![Tool::google_maps()]),
        tool_config: request.location.map(|c| ToolConfig::at(c.lat, c.lng)),
    }
}

#[async_trait]
impl ModelClient for GeminiAdapter {
    async fn generate(&self, task: Task, request: ModelRequest) -> Result<String> {
        let body = to_gemini_request(request);
        self.inner.generate_content(self.model_for(task), &body).await
    }
}

/// Gemini when a key is configured, otherwise the offline client.
pub fn client_from_config(config: &Config) -> Arc<dyn ModelClient> {
    if config.api_key.is_none() {
        tracing::info!("no API key configured; AI features will use fallbacks");
        return Arc::new(OfflineClient);
    }
    match GeminiAdapter::from_config(config) {
        Ok(adapter) => Arc::new(adapter),
        Err(e) => {
            tracing::warn!("failed to build Gemini client: {e}; running offline");
            Arc::new(OfflineClient)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn history_maps_bot_turns_to_model_role() {
        let req = ModelRequest {
            history: vec![ChatMessage::bot("hello"), ChatMessage::user("menu?")],
            prompt: "pizza?".to_string(),
            ..ModelRequest::default()
        };
        let value = serde_json::to_value(to_gemini_request(req)).unwrap();
        let roles: Vec<_> = value["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, vec!["model", "user", "user"]);
        assert_eq!(value["contents"][2]["parts"][0]["text"], json!("pizza?"));
    }

    #[test]
    fn location_enables_maps_tool() {
        let req = ModelRequest {
            prompt: "where".to_string(),
            location: Some(Coordinates { lat: 1.0, lng: 2.0 }),
            ..ModelRequest::default()
        };
        let value = serde_json::to_value(to_gemini_request(req)).unwrap();
        assert_eq!(value["tools"], json!([{"googleMaps": {}}]));
        assert_eq!(value["toolConfig"]["retrievalConfig"]["latLng"]["latitude"], json!(1.0));
    }

    #[test]
    fn schema_switches_to_json_mode() {
        let req = ModelRequest {
            prompt: "json".to_string(),
            response_schema: Some(json!({"type": "OBJECT"})),
            ..ModelRequest::default()
        };
        let value = serde_json::to_value(to_gemini_request(req)).unwrap();
        assert_eq!(value["generationConfig"]["responseMimeType"], json!("application/json"));
        assert!(value.get("tools").is_none());
    }

    #[tokio::test]
    async fn offline_client_always_fails() {
        let err = OfflineClient
            .generate(Task::Chat, ModelRequest::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn location_task_uses_location_model() {
        let config = Config {
            api_key: Some("k".to_string()),
            ..Config::default()
        };
        let adapter = GeminiAdapter::from_config(&config).unwrap();
        assert_eq!(adapter.model_for(Task::LocationInsight), "gemini-2.5-flash");
        assert_eq!(adapter.model_for(Task::Chat), "gemini-3-flash-preview");
    }
}
