use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pixdex::{cli, config, reset::ResetRequest};

#[derive(Parser)]
#[command(name = "pixdex", version, about = "Photo library index maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resets the index, clears the cache, and removes sidecar files
    Reset {
        /// Reset index database only
        #[arg(short, long)]
        index: bool,
        /// Show trace logs for debugging
        #[arg(short, long)]
        trace: bool,
        /// Assume "yes" and run non-interactively
        #[arg(short, long)]
        yes: bool,
    },
    /// Create the index database or upgrade it to the latest schema
    Migrate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::PixdexConfig::load()?;

    let log_level = match cli.command {
        Command::Reset { trace: true, .. } => "trace",
        _ => config.server.log_level.as_str(),
    };
    // Log to stderr so stdout carries only prompts and progress markers.
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Reset { index, trace, yes } => {
            let request = ResetRequest {
                index_only: index,
                assume_yes: yes,
                trace,
            };
            cli::reset::reset(&config, request)?;
        }
        Command::Migrate => cli::migrate::migrate(&config)?,
    }

    Ok(())
}
