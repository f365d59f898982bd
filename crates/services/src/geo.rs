//! Best-effort geolocation used to enrich leaderboard records.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country_flag: String,
}

impl GeoLocation {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn unknown() -> Self {
        Self {
            country: Self::UNKNOWN.to_string(),
            city: Self::UNKNOWN.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            country_flag: String::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.country == Self::UNKNOWN && self.city == Self::UNKNOWN
    }
}

pub trait GeoLocator {
    fn lookup(&mut self) -> Result<GeoLocation, ServiceError>;
}

/// A location supplied up front (configuration or command line).
#[derive(Debug, Clone)]
pub struct FixedLocation(pub GeoLocation);

impl GeoLocator for FixedLocation {
    fn lookup(&mut self) -> Result<GeoLocation, ServiceError> {
        Ok(self.0.clone())
    }
}

/// No lookup backend available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocator;

impl GeoLocator for NoLocator {
    fn lookup(&mut self) -> Result<GeoLocation, ServiceError> {
        Err(ServiceError::Unavailable("no geolocation backend".to_string()))
    }
}

/// Look up the location, falling back to [`GeoLocation::unknown`] on any error.
pub fn lookup_or_unknown(locator: &mut dyn GeoLocator) -> GeoLocation {
    match locator.lookup() {
        Ok(location) => location,
        Err(err) => {
            warn!(%err, "geolocation failed, using unknown location");
            GeoLocation::unknown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_falls_back_to_unknown() {
        let location = lookup_or_unknown(&mut NoLocator);
        assert!(location.is_unknown());
        assert_eq!(location.latitude, 0.0);
    }

    #[test]
    fn test_fixed_location_is_returned() {
        let santiago = GeoLocation {
            country: "Chile".to_string(),
            city: "Santiago".to_string(),
            latitude: -33.45,
            longitude: -70.66,
            country_flag: String::new(),
        };
        let mut locator = FixedLocation(santiago.clone());
        assert_eq!(lookup_or_unknown(&mut locator), santiago);
    }
}
