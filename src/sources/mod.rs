//! Forecast sources
//!
//! Each source fetches its native payload over HTTP and normalizes it into
//! daily summaries. Fetch failures are typed: transport problems, non-success
//! statuses and unexpected payload shapes each get their own error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SourcesConfig;
use crate::models::{DailySummary, Location};
use crate::{ForecastError, Result};

pub mod geocoding;
pub mod met;
pub mod open_meteo;

pub use geocoding::OpenMeteoGeocoder;
pub use met::MetClient;
pub use open_meteo::OpenMeteoClient;

/// Timezone sent to sources that do their own day bucketing
pub const SOURCE_TIMEZONE: &str = "Europe/Oslo";

/// Days requested from sources that take a day count
pub const FORECAST_DAYS: u8 = 6;

/// Which upstream a forecast came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// MET Norway locationforecast, as shown on Yr.no
    Yr,
    OpenMeteo,
}

impl SourceKind {
    /// Short name used in messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yr => "Yr.no",
            Self::OpenMeteo => "Open-Meteo",
        }
    }

    /// Table heading for a location
    #[must_use]
    pub fn title(self, location: &Location) -> String {
        match self {
            Self::Yr => format!("Yr.no (MET) - {}", location.display_name),
            Self::OpenMeteo => format!("Open-Meteo - {}", location.display_name),
        }
    }
}

/// A weather service that can produce a daily forecast for a location
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Raw payload in the source's native shape
    type Payload: Send;

    fn kind(&self) -> SourceKind;

    /// Fetch the raw payload for `location`
    async fn fetch(&self, location: &Location) -> Result<Self::Payload>;

    /// Reduce a raw payload to ordered daily summaries
    fn normalize(&self, payload: Self::Payload) -> Vec<DailySummary>;

    /// Fetch and normalize in one go
    async fn daily(&self, location: &Location) -> Result<Vec<DailySummary>> {
        let payload = self.fetch(location).await?;
        Ok(self.normalize(payload))
    }
}

/// Build the HTTP client shared by all sources
pub fn build_http_client(config: &SourcesConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| ForecastError::config(format!("Failed to create HTTP client: {e}")))
}

/// Send `request` and decode a JSON body, classifying every failure
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    service: &'static str,
) -> Result<T> {
    let response = request.send().await.map_err(|e| {
        warn!("Request to {} failed: {}", service, e);
        ForecastError::network(service, e.to_string())
    })?;

    let status = response.status();
    debug!("{} responded with {}", service, status);
    if !status.is_success() {
        warn!("{} returned HTTP {}", service, status);
        return Err(ForecastError::status(service, status.as_u16()));
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            warn!("Unexpected payload from {}: {}", service, e);
            ForecastError::malformed(service, e.to_string())
        } else {
            ForecastError::network(service, e.to_string())
        }
    })
}
