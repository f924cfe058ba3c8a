//! weathervane CLI
//!
//! Looks up forecasts for place names and posts them to a channel, either on
//! demand, in answer to chat messages, or on a schedule.

#![allow(clippy::print_stdout)]

mod wiring;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use application::services::{IncomingMessage, WeatherRelayService};
use clap::{Parser, Subcommand};
use domain::PlaceName;
use infrastructure::{
    AppConfig, SchedulerConfig, TaskScheduler, init_tracing, register_schedules,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{debug, info, warn};

/// weathervane CLI
#[derive(Parser)]
#[command(name = "weathervane")]
#[command(author, version, about = "Forecast lookups for chat channels", long_about = None)]
struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./weathervane.toml if present)
    #[arg(short, long, env = "WEATHERVANE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the forecast for a place and deliver it
    ///
    /// Example: weathervane lookup "Los Angeles, CA" --channel la
    Lookup {
        /// Place name, passed to the geocoder verbatim
        place: String,

        /// Channel to deliver to (default: delivery.default_channel)
        #[arg(long)]
        channel: Option<String>,
    },

    /// Handle a single chat message
    ///
    /// Example: weathervane message --author alice --channel la "The weather in Boise is..."
    Message {
        /// Nickname of the sender
        #[arg(short, long)]
        author: String,

        /// Channel the message was posted in
        #[arg(long)]
        channel: String,

        /// Message body
        text: String,
    },

    /// Handle chat messages read from stdin, one JSON object per line
    ///
    /// Each line looks like {"author": "...", "channel": "...", "text": "..."}.
    Listen,

    /// Run the configured [[schedule]] entries until interrupted
    Schedule,

    /// Print the persisted pipeline state as JSON
    State,

    /// Print the effective configuration as TOML (secrets omitted)
    Config,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Exit status of a one-shot lookup
const fn lookup_exit_code(found: bool) -> ExitCode {
    if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.telemetry, log_filter_from_verbosity(cli.verbose))?;
    debug!(version = env!("CARGO_PKG_VERSION"), "weathervane starting");

    match cli.command {
        Commands::Lookup { place, channel } => {
            let relay = wiring::build_relay(&config)?;
            let place = PlaceName::new(place)?;
            let channel = channel.unwrap_or_else(|| config.delivery.default_channel.clone());
            let report = relay.handle_scheduled(place, &channel).await?;
            return Ok(lookup_exit_code(report.found));
        },

        Commands::Message {
            author,
            channel,
            text,
        } => {
            let relay = wiring::build_relay(&config)?;
            let message = IncomingMessage {
                author,
                channel,
                text,
            };
            if relay.handle_message(&message).await?.is_none() {
                info!("Message does not ask for a forecast");
            }
        },

        Commands::Listen => {
            let relay = wiring::build_relay(&config)?;
            listen(&relay).await?;
        },

        Commands::Schedule => {
            let relay = wiring::build_relay(&config)?;
            run_schedules(&config, &relay).await?;
        },

        Commands::State => {
            let store = wiring::build_store(&config.state)?;
            match store.get().await? {
                Some(state) => println!("{}", serde_json::to_string_pretty(&state)?),
                None => println!("{{}}"),
            }
        },

        Commands::Config => {
            print!("{}", config.to_toml()?);
        },
    }

    Ok(ExitCode::SUCCESS)
}

/// Answer messages from stdin until it closes
async fn listen(relay: &WeatherRelayService) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let message: IncomingMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Skipping malformed message");
                continue;
            },
        };
        // Delivery failures are already logged; keep reading
        let _ = relay.handle_message(&message).await;
    }

    info!("Input closed");
    Ok(())
}

/// Register the configured schedules and run them until Ctrl+C
async fn run_schedules(config: &AppConfig, relay: &Arc<WeatherRelayService>) -> anyhow::Result<()> {
    if config.schedule.is_empty() {
        anyhow::bail!("No [[schedule]] entries configured");
    }

    let scheduler = TaskScheduler::new(SchedulerConfig::default()).await?;
    let count = register_schedules(&scheduler, relay, &config.schedule).await?;
    info!(count, "Scheduler running, press Ctrl+C to stop");

    let mut events = scheduler
        .take_event_receiver()
        .context("Scheduler event stream already taken")?;

    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl+C");
                }
                info!("Received Ctrl+C, stopping scheduler");
                break;
            }
            Some(event) = events.recv() => {
                debug!(
                    task = %event.task_name,
                    succeeded = event.succeeded(),
                    duration_ms = event.duration_ms,
                    "Scheduled lookup finished"
                );
            }
        }
    }

    scheduler.stop().await?;
    for stats in scheduler.get_all_stats() {
        info!(
            task = %stats.name,
            succeeded = stats.success_count,
            failed = stats.failure_count,
            avg_duration_ms = stats.avg_duration_ms,
            "Task summary"
        );
    }
    Ok(())
}
