//! HTML rendering of a comparison
//!
//! [`HtmlView`] collects what the orchestrator shows and renders it into a
//! standalone page through an embedded Tera template. Autoescaping is on, so
//! place names from geocoding land in the page as text.

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::compare::ComparisonView;
use crate::models::{DailySummary, Location};
use crate::sources::SourceKind;
use crate::{ForecastError, Result};

const TEMPLATE_NAME: &str = "comparison.html";
const TEMPLATE: &str = include_str!("../templates/comparison.html");

/// One formatted table row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RowView {
    pub date: String,
    pub icon: &'static str,
    pub description: String,
    pub max: String,
    pub min: String,
    pub precipitation: String,
}

impl From<&DailySummary> for RowView {
    fn from(day: &DailySummary) -> Self {
        Self {
            date: day.format_date(),
            icon: day.icon(),
            description: day.description.clone(),
            max: day.format_max(),
            min: day.format_min(),
            precipitation: day.format_precipitation(),
        }
    }
}

/// One source's table
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub id: &'static str,
    pub title: String,
    pub rows: Vec<RowView>,
    pub placeholder: Option<String>,
    pub detail: Option<String>,
}

impl TableView {
    fn new(source: SourceKind) -> Self {
        Self {
            id: table_id(source),
            title: source.label().to_string(),
            rows: Vec::new(),
            placeholder: None,
            detail: None,
        }
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.placeholder = None;
        self.detail = None;
    }
}

fn table_id(source: SourceKind) -> &'static str {
    match source {
        SourceKind::Yr => "yr",
        SourceKind::OpenMeteo => "openmeteo",
    }
}

/// In-memory page state that renders to HTML
#[derive(Debug)]
pub struct HtmlView {
    tera: Tera,
    page_title: String,
    yr: TableView,
    open_meteo: TableView,
    status: String,
    status_is_error: bool,
}

impl HtmlView {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

        Ok(Self {
            tera,
            page_title: String::new(),
            yr: TableView::new(SourceKind::Yr),
            open_meteo: TableView::new(SourceKind::OpenMeteo),
            status: String::new(),
            status_is_error: false,
        })
    }

    fn table_mut(&mut self, source: SourceKind) -> &mut TableView {
        match source {
            SourceKind::Yr => &mut self.yr,
            SourceKind::OpenMeteo => &mut self.open_meteo,
        }
    }

    #[must_use]
    pub fn table(&self, source: SourceKind) -> &TableView {
        match source {
            SourceKind::Yr => &self.yr,
            SourceKind::OpenMeteo => &self.open_meteo,
        }
    }

    #[must_use]
    pub fn status(&self) -> (&str, bool) {
        (&self.status, self.status_is_error)
    }

    /// Render the current state as a full HTML document
    pub fn render(&self) -> Result<String> {
        let mut context = Context::new();
        context.insert("page_title", &self.page_title);
        context.insert("tables", &[&self.yr, &self.open_meteo]);
        context.insert("status", &self.status);
        context.insert("status_is_error", &self.status_is_error);

        let html = self
            .tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| ForecastError::render(format!("{TEMPLATE_NAME}: {e}")))?;
        debug!("Rendered {} bytes of HTML", html.len());
        Ok(html)
    }
}

impl ComparisonView for HtmlView {
    fn show_titles(&mut self, location: &Location) {
        self.page_title = location.display_name.clone();
        self.yr.title = SourceKind::Yr.title(location);
        self.open_meteo.title = SourceKind::OpenMeteo.title(location);
    }

    fn clear_tables(&mut self) {
        self.yr.clear();
        self.open_meteo.clear();
    }

    fn set_status(&mut self, message: &str, is_error: bool) {
        self.status = message.to_string();
        self.status_is_error = is_error;
    }

    fn render_rows(&mut self, source: SourceKind, days: &[DailySummary]) {
        let table = self.table_mut(source);
        table.clear();
        table.rows = days.iter().map(RowView::from).collect();
    }

    fn render_placeholder(&mut self, source: SourceKind, message: &str, error: &ForecastError) {
        let table = self.table_mut(source);
        table.clear();
        table.placeholder = Some(message.to_string());
        table.detail = Some(error.user_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day() -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            temp_min: -3.4,
            temp_max: 2.5,
            precipitation_mm: 0.0,
            description: "Lettskyet".to_string(),
            icon_symbol: "fair_day".to_string(),
        }
    }

    #[test]
    fn test_row_formatting() {
        let row = RowView::from(&day());
        assert_eq!(row.date, "man. 01. jan.");
        assert_eq!(row.icon, "☀️");
        assert_eq!(row.max, "3°C");
        assert_eq!(row.min, "-3°C");
        assert_eq!(row.precipitation, "0.0 mm");
    }

    #[test]
    fn test_render_rows_and_placeholder() {
        let mut view = HtmlView::new().unwrap();
        view.show_titles(&Location::default());
        view.render_rows(SourceKind::Yr, &[day()]);
        view.render_placeholder(
            SourceKind::OpenMeteo,
            "Kunne ikke hente data fra Open-Meteo.",
            &ForecastError::status("Open-Meteo", 503),
        );
        view.set_status("Ingen av kildene svarte akkurat nå.", true);

        let html = view.render().unwrap();
        assert!(html.contains("Yr.no (MET) - Lierskogen"));
        assert!(html.contains("<td>man. 01. jan.</td>"));
        assert!(html.contains(r#"<td colspan="5" class="placeholder">Kunne ikke hente data fra Open-Meteo."#));
        assert!(html.contains("Open-Meteo-feil (503)"));
        assert!(html.contains(r#"class="status error""#));
    }

    #[test]
    fn test_clear_tables_drops_previous_rows() {
        let mut view = HtmlView::new().unwrap();
        view.render_rows(SourceKind::Yr, &[day(), day()]);
        view.clear_tables();
        assert!(view.table(SourceKind::Yr).rows.is_empty());
        assert!(view.table(SourceKind::Yr).placeholder.is_none());
    }

    #[test]
    fn test_place_names_are_escaped() {
        let mut view = HtmlView::new().unwrap();
        view.show_titles(&Location::new("x", "<b>Ås</b>", 59.66, 10.79));
        let html = view.render().unwrap();
        assert!(html.contains("&lt;b&gt;Ås&lt;&#x2F;b&gt;"));
        assert!(!html.contains("<b>Ås</b>"));
    }
}
