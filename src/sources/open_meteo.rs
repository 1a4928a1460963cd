//! Open-Meteo daily forecast client
//!
//! Open-Meteo buckets days itself (we ask for Europe/Oslo) and answers with
//! parallel arrays indexed by day.

use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::{FORECAST_DAYS, ForecastSource, SOURCE_TIMEZONE, SourceKind, get_json};
use crate::aggregate::DailyAggregator;
use crate::config::SourcesConfig;
use crate::models::{DailySummary, Location, RawDailyPoint};
use crate::{ForecastError, Result};

const SERVICE: &str = "Open-Meteo";

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Forecast response; only the daily block is requested
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub timezone: Option<String>,
    pub daily: Option<DailyData>,
}

/// Daily weather data from Open-Meteo
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<NaiveDate>,
    pub weather_code: Vec<Option<u16>>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<Option<f64>>,
    #[serde(rename = "precipitation_sum")]
    pub precipitation: Vec<Option<f64>>,
}

impl DailyData {
    /// Zip the parallel arrays into one record per day
    pub fn into_points(self) -> Result<Vec<RawDailyPoint>> {
        let days = self.time.len();
        let lengths = [
            ("weather_code", self.weather_code.len()),
            ("temperature_2m_max", self.temperature_max.len()),
            ("temperature_2m_min", self.temperature_min.len()),
            ("precipitation_sum", self.precipitation.len()),
        ];
        if let Some((field, len)) = lengths.iter().find(|(_, len)| *len != days) {
            return Err(ForecastError::malformed(
                SERVICE,
                format!("daily.{field} has {len} entries, expected {days}"),
            ));
        }

        self.time
            .into_iter()
            .zip(self.weather_code)
            .zip(self.temperature_max)
            .zip(self.temperature_min)
            .zip(self.precipitation)
            .map(|((((date, weather_code), temp_max), temp_min), precipitation_sum)| {
                let (Some(temp_max), Some(temp_min)) = (temp_max, temp_min) else {
                    return Err(ForecastError::malformed(
                        SERVICE,
                        format!("missing temperatures for {date}"),
                    ));
                };
                if temp_min > temp_max {
                    return Err(ForecastError::malformed(
                        SERVICE,
                        format!("minimum {temp_min} above maximum {temp_max} for {date}"),
                    ));
                }
                Ok(RawDailyPoint {
                    date,
                    weather_code,
                    temp_max,
                    temp_min,
                    precipitation_sum,
                })
            })
            .collect()
    }
}

impl ForecastResponse {
    pub fn into_points(self) -> Result<Vec<RawDailyPoint>> {
        if let Some(timezone) = &self.timezone {
            if timezone != SOURCE_TIMEZONE {
                warn!("Open-Meteo answered in timezone {}", timezone);
            }
        }
        self.daily
            .ok_or_else(|| ForecastError::malformed(SERVICE, "response has no daily block"))?
            .into_points()
    }
}

/// HTTP client for the Open-Meteo forecast API
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Create a client from the sources configuration
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self::with_client(
            super::build_http_client(config)?,
            &config.open_meteo_base_url,
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

    fn forecast_url(&self, location: &Location) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&daily={}&timezone={}&forecast_days={}",
            self.base_url,
            location.latitude,
            location.longitude,
            DAILY_FIELDS,
            SOURCE_TIMEZONE,
            FORECAST_DAYS
        )
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    type Payload = Vec<RawDailyPoint>;

    fn kind(&self) -> SourceKind {
        SourceKind::OpenMeteo
    }

    #[instrument(skip(self, location), fields(location = %location.id))]
    async fn fetch(&self, location: &Location) -> Result<Vec<RawDailyPoint>> {
        info!(
            "Getting Open-Meteo forecast for coordinates: {}",
            location.format_coordinates()
        );
        let start_time = Instant::now();

        let response: ForecastResponse =
            get_json(self.client.get(self.forecast_url(location)), SERVICE).await?;
        let points = response.into_points()?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {} days from Open-Meteo in {:.3}s",
            points.len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow Open-Meteo response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(points)
    }

    fn normalize(&self, payload: Vec<RawDailyPoint>) -> Vec<DailySummary> {
        DailyAggregator::from_daily(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_daily() -> serde_json::Value {
        serde_json::json!({
            "latitude": 59.78,
            "longitude": 10.32,
            "timezone": "Europe/Oslo",
            "daily": {
                "time": ["2024-01-01", "2024-01-02", "2024-01-03"],
                "weather_code": [0, 61, null],
                "temperature_2m_max": [1.5, 3.0, 2.2],
                "temperature_2m_min": [-4.0, -1.0, 0.5],
                "precipitation_sum": [0.0, 4.2, null]
            }
        })
    }

    #[test]
    fn test_daily_arrays_are_zipped() {
        let response: ForecastResponse = serde_json::from_value(sample_daily()).unwrap();
        let points = response.into_points().unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[1].weather_code, Some(61));
        assert_eq!(points[1].precipitation_sum, Some(4.2));
        assert_eq!(points[2].weather_code, None);
        assert_eq!(points[0].temp_min, -4.0);
    }

    #[test]
    fn test_mismatched_arrays_are_malformed() {
        let mut payload = sample_daily();
        payload["daily"]["temperature_2m_min"] = serde_json::json!([1.0]);
        let response: ForecastResponse = serde_json::from_value(payload).unwrap();

        let err = response.into_points().unwrap_err();
        assert!(matches!(err, ForecastError::MalformedPayload { .. }));
        assert!(err.to_string().contains("temperature_2m_min"));
    }

    #[test]
    fn test_missing_daily_block_is_malformed() {
        let response: ForecastResponse =
            serde_json::from_value(serde_json::json!({ "timezone": "Europe/Oslo" })).unwrap();
        assert!(matches!(
            response.into_points(),
            Err(ForecastError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_null_temperature_is_malformed() {
        let mut payload = sample_daily();
        payload["daily"]["temperature_2m_max"] = serde_json::json!([1.0, null, 2.0]);
        let response: ForecastResponse = serde_json::from_value(payload).unwrap();
        assert!(response.into_points().is_err());
    }

    #[test]
    fn test_inverted_temperatures_are_malformed() {
        let mut payload = sample_daily();
        payload["daily"]["temperature_2m_min"] = serde_json::json!([-4.0, 5.0, 0.5]);
        let response: ForecastResponse = serde_json::from_value(payload).unwrap();

        let err = response.into_points().unwrap_err();
        assert!(matches!(err, ForecastError::MalformedPayload { .. }));
        assert!(err.to_string().contains("2024-01-02"));
    }

    #[test]
    fn test_forecast_url_requests_oslo_days() {
        let client = OpenMeteoClient::with_client(Client::new(), "https://api.open-meteo.com/v1");
        let url = client.forecast_url(&Location::default());
        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?latitude=59.79&longitude=10.315"));
        assert!(url.contains("timezone=Europe/Oslo"));
        assert!(url.contains("forecast_days=6"));
        assert!(url.contains(DAILY_FIELDS));
    }
}
