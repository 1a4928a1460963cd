//! Daily aggregation of raw forecast series
//!
//! Both sources end up as at most [`MAX_DAYS`] [`DailySummary`] records,
//! ordered by date. MET delivers an hourly series that has to be grouped into
//! local calendar days; Open-Meteo already delivers one record per day.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::models::{DailySummary, RawDailyPoint, RawInstantPoint};
use crate::weather_codes::WeatherPresentation;

/// Time zone that decides where one forecast day ends and the next begins
pub const FORECAST_TIMEZONE: Tz = chrono_tz::Europe::Oslo;

/// Most days a forecast is reduced to
pub const MAX_DAYS: usize = 6;

/// Calendar date of `timestamp` in [`FORECAST_TIMEZONE`]
#[must_use]
pub fn local_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&FORECAST_TIMEZONE).date_naive()
}

/// Running totals for one local day
struct DayAccumulator {
    date: NaiveDate,
    temp_min: f64,
    temp_max: f64,
    precipitation_mm: f64,
    presentation: WeatherPresentation,
}

impl DayAccumulator {
    fn start(date: NaiveDate, point: &RawInstantPoint) -> Self {
        Self {
            date,
            temp_min: point.air_temperature,
            temp_max: point.air_temperature,
            precipitation_mm: point.precipitation(),
            presentation: WeatherPresentation::from_symbol(point.symbol_code()),
        }
    }

    fn add(&mut self, point: &RawInstantPoint) {
        self.temp_min = self.temp_min.min(point.air_temperature);
        self.temp_max = self.temp_max.max(point.air_temperature);
        self.precipitation_mm += point.precipitation();
    }

    fn finish(self) -> DailySummary {
        DailySummary {
            date: self.date,
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            precipitation_mm: self.precipitation_mm,
            description: self.presentation.description,
            icon_symbol: self.presentation.icon_symbol,
        }
    }
}

/// Turns raw source series into daily summaries
pub struct DailyAggregator;

impl DailyAggregator {
    /// Group an hourly series into local days.
    ///
    /// The first point of a day decides its description and icon. Min/max
    /// and precipitation run over every point of the day. A partial first or
    /// last day still counts as one of the [`MAX_DAYS`] days.
    #[must_use]
    pub fn from_hourly(points: &[RawInstantPoint]) -> Vec<DailySummary> {
        let mut ordered: Vec<&RawInstantPoint> = points.iter().collect();
        ordered.sort_by_key(|point| point.timestamp);

        let mut days: Vec<DayAccumulator> = Vec::new();
        for point in ordered {
            let date = local_date(point.timestamp);
            match days.last_mut() {
                Some(day) if day.date == date => day.add(point),
                _ => {
                    if days.len() == MAX_DAYS {
                        break;
                    }
                    days.push(DayAccumulator::start(date, point));
                }
            }
        }

        debug!(
            "Aggregated {} hourly points into {} days",
            points.len(),
            days.len()
        );
        days.into_iter().map(DayAccumulator::finish).collect()
    }

    /// Translate an already-daily series, keeping the first [`MAX_DAYS`] days
    #[must_use]
    pub fn from_daily(points: &[RawDailyPoint]) -> Vec<DailySummary> {
        points
            .iter()
            .take(MAX_DAYS)
            .map(|point| {
                let presentation = WeatherPresentation::from_wmo(point.weather_code);
                DailySummary {
                    date: point.date,
                    temp_min: point.temp_min,
                    temp_max: point.temp_max,
                    precipitation_mm: point.precipitation_sum.unwrap_or(0.0).max(0.0),
                    description: presentation.description,
                    icon_symbol: presentation.icon_symbol,
                }
            })
            .collect()
    }
}
