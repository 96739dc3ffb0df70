//! Mood recommendations, location insight and the chat assistant.
//!
//! Each operation is a single round trip to the model. None of them
//! return errors to the caller: failures are logged and replaced by a
//! fixed fallback.

use campuseats_common::{ChatMessage, DeliveryLocation, FoodItem, MatchedRecommendation, Recommendation};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{ModelClient, ModelRequest, Task};
use crate::error::Result;
use crate::geolocation::{Coordinates, Geolocator};

pub const CHAT_FALLBACK: &str = "Sorry, I'm having trouble connecting to the server. Please try again.";
pub const INSIGHT_FALLBACK_ADDRESS: &str = "Campus Central Plaza";
pub const MANUAL_ENTRY_ADDRESS: &str = "Manual Entry Required";

pub const CONCIERGE_PERSONA: &str = "You are the Intelligent Concierge for 'CampusEats', a premium food ordering app. \
Be helpful, witty, and encourage healthy or delicious choices depending on user intent. \
Keep answers concise and relevant to food ordering. If they ask about the menu, mention we have Burgers, Pizza, Sushi, Salads, and Desserts. \
Do not mention that you are an AI model or mention Google/Gemini. Act as a built-in feature of the CampusEats platform.";

#[derive(Debug, Deserialize)]
struct RecommendationEnvelope {
    recommendations: Vec<Recommendation>,
}

pub fn recommendation_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "foodId": { "type": "STRING" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["foodId", "reason"]
                }
            }
        },
        "required": ["recommendations"]
    })
}

/// Only id, name and tags of each item are sent.
pub fn recommendation_request(mood: &str, menu: &[FoodItem]) -> Result<ModelRequest> {
    let slim: Vec<_> = menu
        .iter()
        .map(|i| json!({ "id": i.id, "name": i.name, "tags": i.tags }))
        .collect();
    let menu_json = serde_json::to_string(&slim)?;
    let prompt = format!(
        "The user says their mood/preference is: \"{mood}\". \
Based on this menu: {menu_json}, suggest the top 2 items from the menu. \
Explain why each fits their mood in a friendly way."
    );
    Ok(ModelRequest {
        prompt,
        response_schema: Some(recommendation_schema()),
        ..ModelRequest::default()
    })
}

pub fn parse_recommendations(text: &str) -> Result<Vec<Recommendation>> {
    let envelope: RecommendationEnvelope = serde_json::from_str(text.trim())?;
    Ok(envelope.recommendations)
}

/// Pairs suggestions with catalog entries, dropping unknown ids.
pub fn match_recommendations(recs: Vec<Recommendation>, menu: &[FoodItem]) -> Vec<MatchedRecommendation> {
    recs.into_iter()
        .filter_map(|rec| {
            let item = menu.iter().find(|i| i.id == rec.food_id)?;
            Some(MatchedRecommendation {
                item: item.clone(),
                reason: rec.reason,
            })
        })
        .collect()
}

async fn try_recommend(client: &dyn ModelClient, mood: &str, menu: &[FoodItem]) -> Result<Vec<MatchedRecommendation>> {
    let request = recommendation_request(mood, menu)?;
    let text = client.generate(Task::Recommendation, request).await?;
    debug!("recommendation response: {text}");
    let recs = parse_recommendations(&text)?;
    Ok(match_recommendations(recs, menu))
}

/// Empty on any failure. Blank moods are not sent.
pub async fn recommend(client: &dyn ModelClient, mood: &str, menu: &[FoodItem]) -> Vec<MatchedRecommendation> {
    if mood.trim().is_empty() {
        return Vec::new();
    }
    match try_recommend(client, mood, menu).await {
        Ok(recs) => recs,
        Err(e) => {
            warn!("mood analysis failed: {e}");
            Vec::new()
        }
    }
}

pub fn location_request(at: Coordinates) -> ModelRequest {
    let prompt = format!(
        "Tell me about the area at latitude {}, longitude {}. \
Is it a university campus area, a residential zone, or a business district? \
Provide a one-sentence tip for a food delivery driver coming here. \
Do not mention any AI branding in your response.",
        at.lat, at.lng
    );
    ModelRequest {
        prompt,
        location: Some(at),
        ..ModelRequest::default()
    }
}

pub async fn location_insight(client: &dyn ModelClient, at: Coordinates) -> Result<String> {
    let text = client.generate(Task::LocationInsight, location_request(at)).await?;
    Ok(text.trim().to_string())
}

/// Resolves the current position and asks the model about it.
pub async fn detect_location(geolocator: &dyn Geolocator, client: &dyn ModelClient) -> DeliveryLocation {
    let at = match geolocator.current_position().await {
        Ok(at) => at,
        Err(e) => {
            warn!("geolocation failed: {e}");
            return DeliveryLocation::manual(MANUAL_ENTRY_ADDRESS);
        }
    };

    match location_insight(client, at).await {
        Ok(insight) => DeliveryLocation {
            address: format!("Detected: {:.4}, {:.4}", at.lat, at.lng),
            lat: Some(at.lat),
            lng: Some(at.lng),
            insight: Some(insight),
        },
        Err(e) => {
            warn!("location insight failed: {e}");
            DeliveryLocation::manual(INSIGHT_FALLBACK_ADDRESS)
        }
    }
}

pub fn chat_request(history: Vec<ChatMessage>, message: &str) -> ModelRequest {
    ModelRequest {
        system_instruction: Some(CONCIERGE_PERSONA.to_string()),
        history,
        prompt: message.to_string(),
        ..ModelRequest::default()
    }
}

/// The assistant's answer, or the apology text on failure.
pub async fn chat_reply(client: &dyn ModelClient, history: Vec<ChatMessage>, message: &str) -> String {
    match client.generate(Task::Chat, chat_request(history, message)).await {
        Ok(text) => text,
        Err(e) => {
            warn!("chat request failed: {e}");
            CHAT_FALLBACK.to_string()
        }
    }
}
