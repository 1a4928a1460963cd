//! Location model and the built-in location catalog

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Id of the location used when nothing (or something unknown) is selected
pub const DEFAULT_LOCATION_ID: &str = "lierskogen";

/// A place to fetch forecasts for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Stable identifier used by the location selector
    pub id: String,
    /// Human readable name shown in titles
    pub display_name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new<S: Into<String>, N: Into<String>>(
        id: S,
        display_name: N,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            latitude,
            longitude,
        }
    }

    /// All locations offered by the selector
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        vec![
            Self::new("tonsberg", "Tønsberg", 59.2675, 10.4076),
            Self::new("lierskogen", "Lierskogen", 59.79, 10.315),
        ]
    }

    /// Look up a catalog location by id
    #[must_use]
    pub fn find(id: &str) -> Option<Self> {
        Self::catalog().into_iter().find(|location| location.id == id)
    }

    /// Resolve a selector value, falling back to the default location
    #[must_use]
    pub fn select(id: Option<&str>) -> Self {
        if let Some(location) = id.and_then(Self::find) {
            return location;
        }
        if let Some(id) = id {
            warn!("Unknown location '{}', using {}", id, DEFAULT_LOCATION_ID);
        }
        Self::default()
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// True when both coordinates are inside their valid ranges
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("lierskogen", "Lierskogen", 59.79, 10.315)
    }
}
