use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use delivery_range::config::DeliveryConfig;
use delivery_range::location::{
    CheckOutcome, CheckReport, GeolocationProvider, IpProvider, LocationCheck, ManualProvider,
    UnsupportedProvider,
};
use delivery_range::server;
use tracing_subscriber::EnvFilter;

/// Delivery range checker
///
/// Tells whether a position lies within the delivery radius around the
/// shop's reference point.
///
/// Examples:
///   range-check --lat 24.8949 --lon 91.8687
///   range-check --auto
///   range-check --lat 24.9 --lon 91.9 --radius 5
///   range-check --serve --port 8080
#[derive(Parser)]
#[command(name = "range-check", version, about, long_about = None)]
struct Cli {
    /// Latitude of the position to check (-90 to 90).
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude of the position to check (-180 to 180).
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Detect the current position via IP geolocation.
    #[arg(long, short = 'a', conflicts_with_all = ["lat", "lon"])]
    auto: bool,

    /// Offline mode: never touch the network.
    #[arg(long)]
    offline: bool,

    /// Config file (defaults to $DELIVERY_RANGE_CONFIG or ~/.delivery-range/config.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delivery radius override, in kilometers.
    #[arg(long)]
    radius: Option<f64>,

    /// Reference latitude override.
    #[arg(long, allow_hyphen_values = true)]
    ref_lat: Option<f64>,

    /// Reference longitude override.
    #[arg(long, allow_hyphen_values = true)]
    ref_lon: Option<f64>,

    /// Run the HTTP API instead of a single check.
    #[arg(long)]
    serve: bool,

    /// Bind host for --serve.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port for --serve.
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

const EXIT_OUT_OF_RANGE: u8 = 2;
const EXIT_UNAVAILABLE: u8 = 3;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── Load configuration ──────────────────────────────────────

    let config = match &cli.config {
        Some(path) => DeliveryConfig::load_from(path),
        None => DeliveryConfig::load(),
    }
    .and_then(|c| c.with_overrides(cli.radius, cli.ref_lat, cli.ref_lon));

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // ── Server mode ─────────────────────────────────────────────

    if cli.serve {
        return serve(&cli.host, cli.port, config);
    }

    // ── Single check ────────────────────────────────────────────

    let provider = select_provider(&cli);
    let check = LocationCheck::from_config(config);
    let outcome = check.run(provider.as_ref());

    print_banner(&outcome, check.config());

    let report = CheckReport::from_outcome(&outcome, check.config());
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match outcome.is_in_range() {
        Some(true) => ExitCode::SUCCESS,
        Some(false) => ExitCode::from(EXIT_OUT_OF_RANGE),
        None => ExitCode::from(EXIT_UNAVAILABLE),
    }
}

// Priority: --lat/--lon > --auto > nothing (unsupported)
fn select_provider(cli: &Cli) -> Box<dyn GeolocationProvider> {
    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        return Box::new(ManualProvider::new(lat, lon));
    }
    if cli.auto && !cli.offline {
        return Box::new(IpProvider::new());
    }
    Box::new(UnsupportedProvider)
}

fn print_banner(outcome: &CheckOutcome, config: &DeliveryConfig) {
    eprintln!(
        "  \u{1F3EA} {} (radius {} km)",
        config.reference_point, config.radius_km
    );
    if let Some(position) = outcome.position() {
        let label = position.label.as_deref().unwrap_or("Your location");
        eprintln!("  \u{1F4CD} {} \u{2014} {} [{}]", label, position.point, position.source);
    }
    if let Some(result) = outcome.result() {
        eprintln!("  \u{1F4CF} {:.2} km away", result.distance_km);
    }
    eprintln!("  {}", outcome.message());
    if let Some(notice) = outcome.notice() {
        eprintln!("  {}", notice);
    }
}

fn serve(host: &str, port: u16, config: DeliveryConfig) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Cannot start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server::start(host, port, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
