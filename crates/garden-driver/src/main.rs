//! Terminal driver for the garden simulation.

mod command;
mod render;
mod state;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use command::{Command, HELP};
use garden_core::{GardenConfig, MAX_GRID_SIZE};
use garden_world::Simulation;
use state::{DriverState, Response};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

/// Grow a garden in the terminal.
#[derive(Debug, Parser)]
#[command(name = "garden", version)]
struct CliArgs {
    /// JSON configuration file
    #[arg(long, short, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Side length of the grid, overriding the configuration
    #[arg(
        long,
        value_name = "CELLS",
        value_parser = clap::value_parser!(i32).range(1..=i64::from(MAX_GRID_SIZE))
    )]
    size: Option<i32>,
    /// Milliseconds between growth ticks, overriding the configuration
    #[arg(
        long = "tick-ms",
        value_name = "MILLISECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    tick_ms: Option<u64>,
    /// Draw the garden without terminal colors
    #[arg(long)]
    no_color: bool,
}

impl CliArgs {
    fn load_config(&self) -> Result<GardenConfig> {
        let mut config = match &self.config {
            Some(path) => GardenConfig::from_file(path).with_context(|| {
                format!("failed to load configuration from {}", path.display())
            })?,
            None => GardenConfig::default(),
        };

        if let Some(size) = self.size {
            config.size = size;
            // Drop starting ponds that no longer fit
            config.initial_water.retain(|pos| pos.in_bounds(size));
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    telemetry::init_telemetry()?;

    // Load configuration
    let config = args.load_config()?;

    info!("Starting garden driver");
    info!(
        size = config.size,
        tick_interval_ms = config.tick_interval_ms,
        "Garden configuration"
    );

    let simulation = Simulation::new(&config)?;
    let color = !args.no_color && std::io::stdout().is_terminal();
    let mut state = DriverState::new(simulation, color);

    if let Ok(Response::Print(text)) = state.execute(Command::Show) {
        println!("{}\n\n{}", text, HELP);
    }

    let mut growth = interval(Duration::from_millis(config.tick_interval_ms));
    growth.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    growth.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = growth.tick() => {
                println!("{}", state.tick());
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        if !handle_line(&mut state, &line) {
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("Input closed");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }

    info!(ticks = state.simulation().tick_count(), "Shutting down garden driver");
    Ok(())
}

/// Run one input line; returns false when the driver should stop
fn handle_line(state: &mut DriverState, line: &str) -> bool {
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return true;
        }
    };

    match state.execute(command) {
        Ok(Response::Print(text)) => println!("{}", text),
        Ok(Response::Quit) => return false,
        Err(e) => {
            // Rejected actions leave the garden untouched
            warn!(input = line, "Command rejected: {}", e);
            println!("{}", e);
        }
    }

    true
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_core::Position;

    #[test]
    fn test_default_arguments() {
        let args = CliArgs::try_parse_from(["garden"]).unwrap();
        let config = args.load_config().unwrap();
        assert_eq!(config.size, 10);
        assert_eq!(config.tick_interval_ms, 5000);
        assert!(!args.no_color);
    }

    #[test]
    fn test_overrides_drop_ponds_outside_grid() {
        let args =
            CliArgs::try_parse_from(["garden", "--size", "5", "--tick-ms", "250", "--no-color"])
                .unwrap();
        let config = args.load_config().unwrap();
        assert_eq!(config.size, 5);
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(
            config.initial_water,
            vec![Position::new(2, 2), Position::new(3, 3)]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(CliArgs::try_parse_from(["garden", "--size", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["garden", "--size", "257"]).is_err());
    }
}
