//! Main entry point for the courier tracker CLI.
//!
//! This binary is the presenter for the tracker core: each invocation
//! parses one user intent, loads the persisted snapshot, drives the
//! corresponding state machine operation, saves the result, and renders
//! it to stdout.

use clap::Parser;
use courier_config::Config;
use std::path::PathBuf;

mod commands;

use commands::Command;

/// Command-line arguments for the courier tracker.
#[derive(Parser, Debug)]
#[command(author, version, about = "Delivery-driver shift tracker", long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "courier.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));

	fmt().with_env_filter(env_filter).init();

	let config = Config::from_file(&args.config)?;
	tracing::debug!(identity = %config.tracker.identity, "loaded configuration");

	let store = commands::build_store(&config)?;
	commands::run(args.command, &config.tracker.identity, &store).await?;

	Ok(())
}
