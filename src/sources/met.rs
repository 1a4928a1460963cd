//! MET Norway (Yr.no) locationforecast client
//!
//! The compact endpoint returns an hourly time series; each step carries an
//! instant temperature and up to three lookahead blocks (`next_1_hours`,
//! `next_6_hours`, `next_12_hours`) with precipitation and a symbol code.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::{ForecastSource, SourceKind, get_json};
use crate::aggregate::DailyAggregator;
use crate::config::SourcesConfig;
use crate::models::{DailySummary, Horizon, Location, RawInstantPoint};
use crate::{ForecastError, Result};

const SERVICE: &str = "Yr.no";

/// Compact locationforecast response
#[derive(Debug, Deserialize)]
pub struct MetResponse {
    pub properties: Option<MetProperties>,
}

#[derive(Debug, Deserialize)]
pub struct MetProperties {
    pub timeseries: Vec<MetTimeStep>,
}

#[derive(Debug, Deserialize)]
pub struct MetTimeStep {
    pub time: DateTime<Utc>,
    pub data: MetStepData,
}

#[derive(Debug, Deserialize)]
pub struct MetStepData {
    pub instant: MetInstant,
    pub next_1_hours: Option<MetPeriod>,
    pub next_6_hours: Option<MetPeriod>,
    pub next_12_hours: Option<MetPeriod>,
}

#[derive(Debug, Deserialize)]
pub struct MetInstant {
    pub details: MetInstantDetails,
}

#[derive(Debug, Deserialize)]
pub struct MetInstantDetails {
    pub air_temperature: f64,
}

/// One lookahead block
#[derive(Debug, Deserialize)]
pub struct MetPeriod {
    pub summary: Option<MetSummary>,
    pub details: Option<MetPeriodDetails>,
}

#[derive(Debug, Deserialize)]
pub struct MetSummary {
    pub symbol_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetPeriodDetails {
    pub precipitation_amount: Option<f64>,
}

impl MetPeriod {
    fn symbol_code(&self) -> Option<&str> {
        self.summary.as_ref()?.symbol_code.as_deref()
    }

    fn precipitation_amount(&self) -> Option<f64> {
        self.details.as_ref()?.precipitation_amount
    }
}

impl MetTimeStep {
    fn into_point(self) -> RawInstantPoint {
        let mut point = RawInstantPoint::new(self.time, self.data.instant.details.air_temperature);
        let periods = [
            (Horizon::OneHour, self.data.next_1_hours),
            (Horizon::SixHours, self.data.next_6_hours),
            (Horizon::TwelveHours, self.data.next_12_hours),
        ];
        for (horizon, period) in periods {
            if let Some(period) = period {
                point = point.with_horizon(
                    horizon,
                    period.symbol_code(),
                    period.precipitation_amount(),
                );
            }
        }
        point
    }
}

impl MetResponse {
    /// Flatten the response into raw hourly points
    pub fn into_points(self) -> Result<Vec<RawInstantPoint>> {
        let properties = self
            .properties
            .ok_or_else(|| ForecastError::malformed(SERVICE, "response has no properties"))?;
        Ok(properties
            .timeseries
            .into_iter()
            .map(MetTimeStep::into_point)
            .collect())
    }
}

/// HTTP client for the MET locationforecast API
#[derive(Debug, Clone)]
pub struct MetClient {
    client: Client,
    base_url: String,
}

impl MetClient {
    /// Create a client from the sources configuration
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self::with_client(
            super::build_http_client(config)?,
            &config.met_base_url,
        ))
    }

    /// Create a client around an existing HTTP client
    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// MET asks for at most four decimals
    fn forecast_url(&self, location: &Location) -> String {
        format!(
            "{}/compact?lat={:.4}&lon={:.4}",
            self.base_url, location.latitude, location.longitude
        )
    }
}

#[async_trait]
impl ForecastSource for MetClient {
    type Payload = Vec<RawInstantPoint>;

    fn kind(&self) -> SourceKind {
        SourceKind::Yr
    }

    #[instrument(skip(self, location), fields(location = %location.id))]
    async fn fetch(&self, location: &Location) -> Result<Vec<RawInstantPoint>> {
        info!(
            "Getting MET forecast for coordinates: {}",
            location.format_coordinates()
        );
        let start_time = Instant::now();

        let response: MetResponse =
            get_json(self.client.get(self.forecast_url(location)), SERVICE).await?;
        let points = response.into_points()?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {} hourly points from MET in {:.3}s",
            points.len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow MET response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(points)
    }

    fn normalize(&self, payload: Vec<RawInstantPoint>) -> Vec<DailySummary> {
        DailyAggregator::from_hourly(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "properties": {
                "meta": { "updated_at": "2024-01-01T10:00:00Z" },
                "timeseries": [
                    {
                        "time": "2024-01-01T12:00:00Z",
                        "data": {
                            "instant": { "details": { "air_temperature": -1.5, "wind_speed": 3.1 } },
                            "next_1_hours": {
                                "summary": { "symbol_code": "lightsnow" },
                                "details": { "precipitation_amount": 0.2 }
                            },
                            "next_6_hours": {
                                "summary": { "symbol_code": "snow" },
                                "details": { "precipitation_amount": 1.4 }
                            },
                            "next_12_hours": {
                                "summary": { "symbol_code": "cloudy" },
                                "details": {}
                            }
                        }
                    },
                    {
                        "time": "2024-01-08T12:00:00Z",
                        "data": {
                            "instant": { "details": { "air_temperature": 2.0 } }
                        }
                    }
                ]
            }
        })
    }

    #[test]
    fn test_response_flattens_horizons_in_order() {
        let response: MetResponse = serde_json::from_value(sample_response()).unwrap();
        let points = response.into_points().unwrap();

        assert_eq!(points.len(), 2);
        let first = &points[0];
        assert_eq!(first.air_temperature, -1.5);
        assert_eq!(first.horizons.len(), 3);
        assert_eq!(first.horizons[0].horizon, Horizon::OneHour);
        assert_eq!(first.horizons[2].precipitation_mm, None);
        assert_eq!(first.symbol_code(), Some("lightsnow"));
        assert_eq!(first.precipitation(), 0.2);

        assert!(points[1].horizons.is_empty());
        assert_eq!(points[1].precipitation(), 0.0);
    }

    #[test]
    fn test_missing_properties_is_malformed() {
        let response: MetResponse =
            serde_json::from_value(serde_json::json!({ "type": "Feature" })).unwrap();
        assert!(matches!(
            response.into_points(),
            Err(ForecastError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_forecast_url() {
        let client = MetClient::with_client(Client::new(), "https://api.met.no/weatherapi/locationforecast/2.0/");
        let url = client.forecast_url(&Location::new("x", "X", 59.2675, 10.40761));
        assert_eq!(
            url,
            "https://api.met.no/weatherapi/locationforecast/2.0/compact?lat=59.2675&lon=10.4076"
        );
    }
}
