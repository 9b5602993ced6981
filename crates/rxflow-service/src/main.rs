//! Main entry point for the rxflow fulfillment service.
//!
//! This binary loads the configuration, assembles the fulfillment engine
//! with its pluggable backends and serves the HTTP API until interrupted.

use clap::Parser;
use rxflow_config::Config;
use rxflow_service::{build_engine, server};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line arguments for the fulfillment service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the fulfillment service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the fulfillment engine with all implementations
/// 5. Serves the HTTP API
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.init();

	tracing::info!("Started rxflow");

	// Load configuration
	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	// Build the engine with all registered implementations
	let engine = Arc::new(build_engine(config.clone())?);

	match config.api {
		Some(api_config) if api_config.enabled => {
			server::start_server(api_config, engine).await?;
		},
		_ => {
			tracing::warn!("API server disabled in configuration - nothing to serve");
		},
	}

	tracing::info!("Stopped rxflow");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn args_default_values() {
		let args = Args::parse_from(["rxflow"]);
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn args_custom_values() {
		let args = Args::parse_from(["rxflow", "--config", "custom.toml", "--log-level", "debug"]);
		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
	}
}
