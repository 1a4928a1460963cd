//! Side-by-side comparison of the two forecast sources
//!
//! The orchestrator fetches both sources concurrently and waits for both to
//! settle; one source failing never cancels or hides the other. Presentation
//! goes through a [`ComparisonView`] handed in by the caller, and the location
//! comes from a [`LocationProvider`].

use chrono::{DateTime, Utc};
use futures::future::join;
use tracing::{error, info, instrument, warn};

use crate::aggregate::FORECAST_TIMEZONE;
use crate::models::{DailySummary, Location};
use crate::sources::{ForecastSource, SourceKind};
use crate::{ForecastError, Result};

/// Status shown while both sources are being fetched
pub const LOADING_MESSAGE: &str = "Henter værdata fra begge kilder...";

/// Status shown when no source answered
pub const ALL_FAILED_MESSAGE: &str = "Ingen av kildene svarte akkurat nå.";

/// Rendering target for a comparison
pub trait ComparisonView {
    /// Show which location the tables are for
    fn show_titles(&mut self, location: &Location);

    /// Remove rows from a previous comparison
    fn clear_tables(&mut self);

    fn set_status(&mut self, message: &str, is_error: bool);

    /// Fill one source's table
    fn render_rows(&mut self, source: SourceKind, days: &[DailySummary]);

    /// Mark one source's table as unavailable
    fn render_placeholder(&mut self, source: SourceKind, message: &str, error: &ForecastError);
}

/// Supplies the location the user currently has selected
pub trait LocationProvider {
    fn selected_location(&self) -> Location;
}

impl LocationProvider for Location {
    fn selected_location(&self) -> Location {
        self.clone()
    }
}

/// What one source produced
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: SourceKind,
    pub result: Result<Vec<DailySummary>>,
}

impl SourceOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Days, if the source succeeded
    #[must_use]
    pub fn days(&self) -> Option<&[DailySummary]> {
        self.result.as_deref().ok()
    }

    /// Text for the table when the source failed
    #[must_use]
    pub fn placeholder_message(&self) -> String {
        format!("Kunne ikke hente data fra {}.", self.source.label())
    }
}

/// How the comparison went as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonStatus {
    AllSucceeded,
    Partial {
        responded: SourceKind,
        failed: SourceKind,
    },
    AllFailed,
}

impl ComparisonStatus {
    #[must_use]
    pub const fn is_error(self) -> bool {
        !matches!(self, Self::AllSucceeded)
    }

    /// Status line text; `finished_at` is shown in Oslo time on success
    #[must_use]
    pub fn message(self, finished_at: DateTime<Utc>) -> String {
        match self {
            Self::AllSucceeded => format!(
                "Sist oppdatert: {}",
                finished_at
                    .with_timezone(&FORECAST_TIMEZONE)
                    .format("%-d.%-m.%Y, %H:%M:%S")
            ),
            Self::Partial { responded, .. } => format!(
                "Kun én kilde svarte akkurat nå ({}). Prøv oppdater igjen.",
                responded.label()
            ),
            Self::AllFailed => ALL_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Both outcomes of one comparison run
#[derive(Debug)]
pub struct ComparisonResult {
    pub location: Location,
    pub yr: SourceOutcome,
    pub open_meteo: SourceOutcome,
    pub finished_at: DateTime<Utc>,
}

impl ComparisonResult {
    #[must_use]
    pub fn outcomes(&self) -> [&SourceOutcome; 2] {
        [&self.yr, &self.open_meteo]
    }

    #[must_use]
    pub fn status(&self) -> ComparisonStatus {
        match (self.yr.is_success(), self.open_meteo.is_success()) {
            (true, true) => ComparisonStatus::AllSucceeded,
            (true, false) => ComparisonStatus::Partial {
                responded: self.yr.source,
                failed: self.open_meteo.source,
            },
            (false, true) => ComparisonStatus::Partial {
                responded: self.open_meteo.source,
                failed: self.yr.source,
            },
            (false, false) => ComparisonStatus::AllFailed,
        }
    }

    #[must_use]
    pub fn status_message(&self) -> String {
        self.status().message(self.finished_at)
    }

    /// Number of sources that answered
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes().iter().filter(|o| o.is_success()).count()
    }
}

/// Runs the Yr and Open-Meteo pipelines side by side
#[derive(Debug)]
pub struct ComparisonOrchestrator<Y, O> {
    yr: Y,
    open_meteo: O,
}

impl<Y, O> ComparisonOrchestrator<Y, O>
where
    Y: ForecastSource,
    O: ForecastSource,
{
    pub fn new(yr: Y, open_meteo: O) -> Self {
        Self { yr, open_meteo }
    }

    /// Fetch and normalize both sources, waiting for both to settle
    #[instrument(skip(self, location), fields(location = %location.id))]
    pub async fn compare(&self, location: &Location) -> ComparisonResult {
        let (yr, open_meteo) =
            join(self.yr.daily(location), self.open_meteo.daily(location)).await;

        let result = ComparisonResult {
            location: location.clone(),
            yr: SourceOutcome {
                source: self.yr.kind(),
                result: yr,
            },
            open_meteo: SourceOutcome {
                source: self.open_meteo.kind(),
                result: open_meteo,
            },
            finished_at: Utc::now(),
        };

        for outcome in result.outcomes() {
            match &outcome.result {
                Err(e) if e.is_upstream() => warn!("{} failed: {}", outcome.source.label(), e),
                Err(e) => error!("{} failed locally: {}", outcome.source.label(), e),
                Ok(_) => {}
            }
        }
        info!(
            "Comparison for {} finished: {}/2 sources responded",
            location.display_name,
            result.succeeded()
        );
        result
    }

    /// One full refresh: read the selected location, fetch, and render
    pub async fn refresh<P, V>(&self, provider: &P, view: &mut V) -> ComparisonResult
    where
        P: LocationProvider + ?Sized,
        V: ComparisonView + ?Sized,
    {
        let location = provider.selected_location();
        view.show_titles(&location);
        view.clear_tables();
        view.set_status(LOADING_MESSAGE, false);

        let result = self.compare(&location).await;

        for outcome in result.outcomes() {
            match &outcome.result {
                Ok(days) => view.render_rows(outcome.source, days),
                Err(e) => view.render_placeholder(outcome.source, &outcome.placeholder_message(), e),
            }
        }

        view.set_status(&result.status_message(), result.status().is_error());
        result
    }
}
