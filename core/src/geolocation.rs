use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CampusError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Source of the user's current position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Reports a configured position, or fails when none is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedGeolocator {
    position: Option<Coordinates>,
}

impl FixedGeolocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates> {
        self.position.ok_or_else(|| {
            CampusError::Geolocation(
                "no position configured (set CAMPUSEATS_LAT/CAMPUSEATS_LNG)".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_position_is_reported() {
        let here = Coordinates { lat: 13.0418, lng: 80.2341 };
        let geo = FixedGeolocator::new(Some(here));
        assert_eq!(geo.current_position().await.unwrap(), here);
    }

    #[tokio::test]
    async fn unset_position_fails() {
        let err = FixedGeolocator::default().current_position().await.unwrap_err();
        assert!(matches!(err, CampusError::Geolocation(_)));
    }
}
