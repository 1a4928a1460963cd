//! Data models for the forecast comparison
//!
//! This module contains the core domain models organized by concern:
//! - Location: the place both sources are asked about
//! - Weather: raw points in each source's native shape
//! - Forecast: the shared daily summary both sources normalize into

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::DailySummary;
pub use location::Location;
pub use weather::{Horizon, HorizonForecast, RawDailyPoint, RawInstantPoint};
