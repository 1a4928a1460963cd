//! CLI entry point for `vaer-compare`.
//!
//! Fetches both forecasts for one location, writes the comparison page and
//! prints the status line.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use vaer_compare::{
    CompareConfig, ComparisonOrchestrator, ComparisonStatus, HtmlView, Location, MetClient,
    OpenMeteoClient, OpenMeteoGeocoder, telemetry,
};

#[derive(Parser)]
#[command(name = "vaer-compare", version)]
#[command(about = "Compare six-day forecasts from Yr.no (MET) and Open-Meteo", long_about = None)]
struct Cli {
    /// Location id from the built-in catalog (tonsberg, lierskogen)
    #[arg(short, long, conflicts_with = "place")]
    location: Option<String>,

    /// Look up a Norwegian place name instead of using the catalog
    #[arg(short, long)]
    place: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the HTML page
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = CompareConfig::load_from_path(cli.config.clone())?;
    telemetry::init(&config.logging, cli.verbose);

    let location = match &cli.place {
        Some(place) => OpenMeteoGeocoder::new(&config.sources)?
            .resolve(place)
            .await
            .map_err(|e| {
                error!("{}", e);
                anyhow::anyhow!(e.user_message())
            })?,
        None => Location::select(Some(
            cli.location.as_deref().unwrap_or(&config.defaults.location),
        )),
    };
    info!(
        "Comparing forecasts for {} ({})",
        location.display_name,
        location.format_coordinates()
    );

    let orchestrator = ComparisonOrchestrator::new(
        MetClient::new(&config.sources)?,
        OpenMeteoClient::new(&config.sources)?,
    );
    let mut view = HtmlView::new()?;
    let result = orchestrator.refresh(&location, &mut view).await;

    let output = cli.output.unwrap_or(config.output.path);
    let html = view.render()?;
    std::fs::write(&output, html)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {}", output.display());

    let (status, is_error) = view.status();
    if is_error {
        error!("{}", status);
    }
    println!("{status}");

    Ok(match result.status() {
        ComparisonStatus::AllFailed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
