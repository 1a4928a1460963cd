//! `vaer-compare` - six-day forecast comparison of Yr.no (MET) and Open-Meteo
//!
//! Both services are queried for the same location, their payloads are
//! reduced to per-day summaries on the Europe/Oslo calendar, and the two
//! series are rendered side by side.

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod sources;
pub mod telemetry;
pub mod weather_codes;

// Re-export core types for public API
pub use aggregate::DailyAggregator;
pub use compare::{
    ComparisonOrchestrator, ComparisonResult, ComparisonStatus, ComparisonView, LocationProvider,
    SourceOutcome,
};
pub use config::CompareConfig;
pub use error::ForecastError;
pub use models::{DailySummary, Location};
pub use render::HtmlView;
pub use sources::{ForecastSource, MetClient, OpenMeteoClient, OpenMeteoGeocoder, SourceKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
