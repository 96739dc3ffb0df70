//! Wire types for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
}

impl GenerateContentRequest {
    /// A single user turn.
    pub fn user_prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(text)],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role("model", text)
    }

    /// System instructions carry no role.
    pub fn instruction(text: impl Into<String>) -> Self {
        Self { role: None, parts: vec![Part::text(text)] }
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()) }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationConfig {
    pub fn json(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps: Option<GoogleMaps>,
}

impl Tool {
    pub fn google_maps() -> Self {
        Self { google_maps: Some(GoogleMaps {}) }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleMaps {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub retrieval_config: RetrievalConfig,
}

impl ToolConfig {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            retrieval_config: RetrievalConfig {
                lat_lng: LatLng { latitude, longitude },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    pub lat_lng: LatLng,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_camel_case_and_skips_empty_fields() {
        let mut req = GenerateContentRequest::user_prompt("hello");
        req.system_instruction = Some(Content::instruction("be nice"));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "systemInstruction": {"parts": [{"text": "be nice"}]}
            })
        );
    }

    #[test]
    fn maps_tool_and_retrieval_config_shape() {
        let req = GenerateContentRequest {
            tools: Some(vec![Tool::google_maps()]),
            tool_config: Some(ToolConfig::at(13.05, 80.24)),
            ..GenerateContentRequest::user_prompt("where")
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["tools"], json!([{"googleMaps": {}}]));
        assert_eq!(
            value["toolConfig"],
            json!({"retrievalConfig": {"latLng": {"latitude": 13.05, "longitude": 80.24}}})
        );
    }

    #[test]
    fn json_generation_config_carries_only_mime_type_and_schema() {
        let value = serde_json::to_value(GenerationConfig::json(json!({"type": "OBJECT"}))).unwrap();
        assert_eq!(
            value,
            json!({"responseMimeType": "application/json", "responseSchema": {"type": "OBJECT"}})
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "campus!"}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(resp.text().as_deref(), Some("Hello, campus!"));
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.text().is_none());
    }
}
