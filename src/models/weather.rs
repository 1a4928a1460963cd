//! Raw forecast points in each source's native shape

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Lookahead window a precipitation amount or symbol code was reported for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Horizon {
    OneHour,
    SixHours,
    TwelveHours,
}

impl Horizon {
    /// Window length in hours
    #[must_use]
    pub const fn hours(self) -> u32 {
        match self {
            Self::OneHour => 1,
            Self::SixHours => 6,
            Self::TwelveHours => 12,
        }
    }

    /// Whether an amount for this window is booked on a point at `utc_hour`.
    ///
    /// Multi-hour amounts are only counted at their natural boundary so that
    /// summing over a day never includes the same window twice.
    #[must_use]
    pub const fn is_booked_at(self, utc_hour: u32) -> bool {
        utc_hour % self.hours() == 0
    }
}

/// What one horizon says about a point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonForecast {
    pub horizon: Horizon,
    /// MET symbol code such as `lightrain` or `clearsky_day`
    pub symbol_code: Option<String>,
    /// Accumulated precipitation over the window in mm
    pub precipitation_mm: Option<f64>,
}

/// One hourly point of the MET series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInstantPoint {
    pub timestamp: DateTime<Utc>,
    /// Instantaneous air temperature in Celsius
    pub air_temperature: f64,
    /// Horizon candidates, sorted shortest window first
    pub horizons: Vec<HorizonForecast>,
}

impl RawInstantPoint {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, air_temperature: f64) -> Self {
        Self {
            timestamp,
            air_temperature,
            horizons: Vec::new(),
        }
    }

    /// Attach a horizon, replacing any earlier entry for the same window
    #[must_use]
    pub fn with_horizon(
        mut self,
        horizon: Horizon,
        symbol_code: Option<&str>,
        precipitation_mm: Option<f64>,
    ) -> Self {
        self.horizons.retain(|h| h.horizon != horizon);
        self.horizons.push(HorizonForecast {
            horizon,
            symbol_code: symbol_code.map(str::to_string),
            precipitation_mm,
        });
        self.horizons.sort_by_key(|h| h.horizon);
        self
    }

    #[must_use]
    pub fn utc_hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Precipitation this point contributes to its day.
    ///
    /// The shortest horizon with an amount wins; 6h and 12h amounts only
    /// count at UTC hours divisible by 6 and 12. Nothing usable yields 0.
    #[must_use]
    pub fn precipitation(&self) -> f64 {
        let hour = self.utc_hour();
        self.horizons
            .iter()
            .filter_map(|h| h.precipitation_mm.map(|amount| (h.horizon, amount)))
            .find(|(horizon, _)| horizon.is_booked_at(hour))
            .map_or(0.0, |(_, amount)| amount.max(0.0))
    }

    /// First non-empty symbol code in horizon order
    #[must_use]
    pub fn symbol_code(&self) -> Option<&str> {
        self.horizons
            .iter()
            .filter_map(|h| h.symbol_code.as_deref())
            .find(|code| !code.is_empty())
    }
}

/// One day of the Open-Meteo daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDailyPoint {
    pub date: NaiveDate,
    /// WMO weather code, `None` when the source reported null
    pub weather_code: Option<u16>,
    pub temp_max: f64,
    pub temp_min: f64,
    /// Daily precipitation sum in mm, `None` when the source reported null
    pub precipitation_sum: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_hour(hour: u32) -> RawInstantPoint {
        RawInstantPoint::new(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(), 3.0)
    }

    #[test]
    fn test_one_hour_amount_wins_regardless_of_hour() {
        let point = at_hour(7)
            .with_horizon(Horizon::SixHours, None, Some(4.0))
            .with_horizon(Horizon::OneHour, None, Some(0.3));
        assert_eq!(point.precipitation(), 0.3);

        let point = at_hour(6)
            .with_horizon(Horizon::OneHour, None, Some(0.3))
            .with_horizon(Horizon::SixHours, None, Some(4.0));
        assert_eq!(point.precipitation(), 0.3);
    }

    #[test]
    fn test_six_hour_amount_only_on_boundary() {
        let on_boundary = at_hour(6).with_horizon(Horizon::SixHours, None, Some(2.0));
        assert_eq!(on_boundary.precipitation(), 2.0);

        let off_boundary = at_hour(9).with_horizon(Horizon::SixHours, None, Some(2.0));
        assert_eq!(off_boundary.precipitation(), 0.0);
    }

    #[test]
    fn test_twelve_hour_amount_used_when_six_is_off_boundary() {
        let point = at_hour(12)
            .with_horizon(Horizon::SixHours, None, None)
            .with_horizon(Horizon::TwelveHours, None, Some(5.0));
        assert_eq!(point.precipitation(), 5.0);

        let point = at_hour(18).with_horizon(Horizon::TwelveHours, None, Some(5.0));
        assert_eq!(point.precipitation(), 0.0);
    }

    #[test]
    fn test_symbol_code_takes_first_non_empty_horizon() {
        let point = at_hour(0)
            .with_horizon(Horizon::TwelveHours, Some("rain"), None)
            .with_horizon(Horizon::OneHour, Some(""), None)
            .with_horizon(Horizon::SixHours, Some("fog"), None);
        assert_eq!(point.symbol_code(), Some("fog"));
        assert_eq!(at_hour(0).symbol_code(), None);
    }
}
