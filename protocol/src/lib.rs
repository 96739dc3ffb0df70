//! Messages exchanged between the UI loop and the concierge worker.

use campuseats_common::{ChatMessage, DeliveryLocation, MatchedRecommendation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Op {
    /// Map a free-text mood to catalog suggestions.
    Recommend { mood: String },
    /// Resolve the current position and describe it.
    DetectLocation,
    /// Ask the assistant. `history` holds the turns before `message`.
    Chat {
        message: String,
        history: Vec<ChatMessage>,
    },
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    RecommendationsReady {
        recommendations: Vec<MatchedRecommendation>,
    },
    LocationResolved {
        location: DeliveryLocation,
    },
    ChatReply {
        text: String,
    },
    ShutdownComplete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub op: Op,
}

impl Submission {
    pub fn new(op: Op) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            op,
        }
    }
}
