//! Daily summary shared by both forecast sources

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::weather_codes;

const WEEKDAYS_NB: [&str; 7] = ["man.", "tir.", "ons.", "tor.", "fre.", "lør.", "søn."];
const MONTHS_NB: [&str; 12] = [
    "jan.", "feb.", "mar.", "apr.", "mai", "jun.", "jul.", "aug.", "sep.", "okt.", "nov.",
    "des.",
];

/// One calendar day of forecast, normalized from either source
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySummary {
    /// Local calendar day (Europe/Oslo), serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Lowest temperature in Celsius
    pub temp_min: f64,
    /// Highest temperature in Celsius
    pub temp_max: f64,
    /// Accumulated precipitation in mm, never negative
    pub precipitation_mm: f64,
    /// Localized weather description
    pub description: String,
    /// MET-style symbol key, the shared icon vocabulary
    pub icon_symbol: String,
}

impl DailySummary {
    /// Icon for this day's symbol key
    #[must_use]
    pub fn icon(&self) -> &'static str {
        weather_codes::icon_for_symbol(&self.icon_symbol)
    }

    /// Short Norwegian date, e.g. `man. 01. jan.`
    #[must_use]
    pub fn format_date(&self) -> String {
        let weekday = WEEKDAYS_NB[self.date.weekday().num_days_from_monday() as usize];
        let month = MONTHS_NB[self.date.month0() as usize];
        format!("{weekday} {:02}. {month}", self.date.day())
    }

    /// Highest temperature rounded to whole degrees
    #[must_use]
    pub fn format_max(&self) -> String {
        format_temperature(self.temp_max)
    }

    /// Lowest temperature rounded to whole degrees
    #[must_use]
    pub fn format_min(&self) -> String {
        format_temperature(self.temp_min)
    }

    /// Precipitation with one decimal
    #[must_use]
    pub fn format_precipitation(&self) -> String {
        format!("{:.1} mm", self.precipitation_mm)
    }
}

// Halves round up (-2.5 -> -2), matching how the tables have always read.
fn format_temperature(celsius: f64) -> String {
    let rounded = (celsius + 0.5).floor();
    // avoid "-0°C"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.0}°C")
}
