//! Court booking service and client CLI.
//!
//! ```sh
//! # Run the booking API with the default config (~/.config/court-booking/config.toml)
//! court-booking
//!
//! # Quote a booking offline
//! court-booking quote --start 21:00 --hours 2 --closing 22:00 --price 30
//!
//! # Walk the full booking flow against a running server
//! court-booking check --court court-1 --date 2026-10-20 --start 17:00 --hours 2
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info};

use court_booking::application::{AvailabilityLookup, BookingSession, SubmissionGate, SubmitOutcome};
use court_booking::config::{resolve_config_path, AppConfig, CONFIG_ENV};
use court_booking::domain::{compute_end_time, BookingPolicy};
use court_booking::infrastructure::HttpAvailabilityClient;
use court_booking::server::{init_tracing, ServerHandle};

#[derive(Parser, Debug)]
#[command(
    name = "court-booking",
    version,
    about = "Court booking API with closing-time aware duration reconciliation"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV, global = true)]
    config: Option<PathBuf>,

    /// Override the API listen port.
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the booking API (default).
    Serve,
    /// Reconcile a start time and duration against a closing time.
    Quote {
        #[arg(long)]
        start: String,
        #[arg(long)]
        hours: u32,
        /// Defaults to `booking.default_closing_time`.
        #[arg(long)]
        closing: Option<String>,
        /// Price per hour; prints a total when given.
        #[arg(long)]
        price: Option<Decimal>,
    },
    /// Select, re-check and confirm a slot against `client.base_url`.
    Check {
        #[arg(long)]
        court: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        start: String,
        #[arg(long)]
        hours: u32,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Quote {
    start_time: String,
    requested_hours: u32,
    actual_hours: u32,
    end_time: String,
    closing_time: String,
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    total_amount: Option<Decimal>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config);
    let mut config = AppConfig::load(&config_path)?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_tracing(&config);
    info!(path = %config_path.display(), "Configuration loaded");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Quote {
            start,
            hours,
            closing,
            price,
        } => quote(&config.booking, start, hours, closing, price),
        Command::Check {
            court,
            date,
            start,
            hours,
        } => check(config, &court, date, &start, hours).await,
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let handle = ServerHandle::start(config).await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully");

    handle.wait().await;
    Ok(())
}

fn quote(
    policy: &BookingPolicy,
    start: String,
    hours: u32,
    closing: Option<String>,
    price: Option<Decimal>,
) -> Result<(), Box<dyn std::error::Error>> {
    let closing = closing.unwrap_or_else(|| policy.default_closing_time.clone());

    policy.check_requested(hours)?;
    let actual = policy.actual_duration(&start, hours, &closing)?;
    let end_time = compute_end_time(&start, actual, &closing)?;

    let quote = Quote {
        start_time: start,
        requested_hours: hours,
        actual_hours: actual,
        end_time,
        closing_time: closing,
        total_amount: price.map(|p| p * Decimal::from(actual)),
    };
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}

async fn check(
    config: AppConfig,
    court_id: &str,
    date: NaiveDate,
    start: &str,
    hours: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpAvailabilityClient::new(&config.client.base_url, config.client.timeout())?;
    let mut session = BookingSession::new(config.client.auth_token.clone());

    let court = client.fetch_court(court_id, session.auth_token()).await?;
    let lookup = Arc::new(
        AvailabilityLookup::new(Arc::new(client), config.booking.clone())
            .with_retry(config.client.retry()),
    );
    let mut gate = SubmissionGate::new(court, lookup);

    let report = gate.select_date(&session, date).await?;
    info!(
        open = report.open_slots().count(),
        closing = %report.closing_time,
        "Availability loaded"
    );

    let draft = gate.select_time(start, hours)?;
    if draft.was_clamped() {
        println!(
            "Note: booking shortened to {}h to end by {}",
            draft.actual_hours, draft.end_time
        );
    }

    match gate.submit(&mut session).await? {
        SubmitOutcome::Confirmed(_) => {
            let handoff = session
                .take_pending()
                .ok_or("confirmed draft missing from session")?;
            println!("{}", serde_json::to_string_pretty(&handoff)?);
            Ok(())
        }
        SubmitOutcome::Rejected { start_time } => {
            error!(start = %start_time, "Slot was taken before confirmation");
            Err(format!("slot {start_time} on {date} is no longer available").into())
        }
    }
}
