//! Place name lookup through the Open-Meteo geocoding API

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::get_json;
use crate::config::SourcesConfig;
use crate::models::Location;
use crate::{ForecastError, Result};

const SERVICE: &str = "Open-Meteo geokoding";

/// Geocoding response from Open-Meteo
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub id: Option<u64>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country_code: Option<String>,
    pub admin1: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        let id = result
            .id
            .map_or_else(|| result.name.to_lowercase(), |id| format!("geo-{id}"));
        Location::new(id, result.name, result.latitude, result.longitude)
    }
}

/// Resolves Norwegian place names to coordinates
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    client: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self::with_client(
            super::build_http_client(config)?,
            &config.geocoding_base_url,
        ))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/search?name={}&count=1&language=nb&countryCode=NO",
            self.base_url,
            urlencoding::encode(name)
        )
    }

    /// Best match for `name`; no match or out-of-range coordinates is a
    /// malformed payload
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> Result<Location> {
        info!("Geocoding location: '{}'", name);

        let response: GeocodingResponse =
            get_json(self.client.get(self.search_url(name)), SERVICE).await?;

        let Some(result) = response.results.unwrap_or_default().into_iter().next() else {
            warn!("No results found for location '{}'", name);
            return Err(ForecastError::malformed(
                SERVICE,
                format!("Fant ingen lokasjon for {name}."),
            ));
        };

        debug!(
            "Found location: {} ({:.4}, {:.4}) in {}",
            result.name,
            result.latitude,
            result.longitude,
            result.admin1.as_deref().unwrap_or("unknown region")
        );

        let location = Location::from(result);
        if !location.has_valid_coordinates() {
            warn!(
                "Geocoding returned out-of-range coordinates for '{}': {}",
                name,
                location.format_coordinates()
            );
            return Err(ForecastError::malformed(
                SERVICE,
                format!("Ugyldige koordinater for {}.", location.display_name),
            ));
        }
        Ok(location)
    }
}
