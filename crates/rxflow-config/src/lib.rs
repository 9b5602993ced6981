//! Configuration module for the rxflow fulfillment system.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files with
//! environment-variable interpolation and validates that all required
//! values are properly set before the service starts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Workflow transition policies accepted in `[order] workflow_policy`.
pub const WORKFLOW_POLICIES: &[&str] = &["permissive", "sequential"];

/// Main configuration structure for the fulfillment service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this service instance.
	pub service: ServiceConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for the account directory.
	pub account: AccountConfig,
	/// Configuration for order workflow processing.
	#[serde(default)]
	pub order: OrderConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Configuration specific to the service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Unique identifier for this service instance.
	pub id: String,
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the account directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of account implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for order workflow processing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderConfig {
	/// Transition policy for the workflow validator.
	#[serde(default = "default_workflow_policy")]
	pub workflow_policy: String,
}

impl Default for OrderConfig {
	fn default() -> Self {
		Self {
			workflow_policy: default_workflow_policy(),
		}
	}
}

/// Returns the default workflow policy.
///
/// The permissive policy matches the reference behavior: any member of the
/// workflow enumeration is accepted as the next state.
fn default_workflow_policy() -> String {
	"permissive".to_string()
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Request timeout in seconds.
	#[serde(default = "default_api_timeout")]
	pub timeout_seconds: u64,
}

/// Returns the default API host.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	3000
}

/// Returns the default API timeout in seconds.
fn default_api_timeout() -> u64 {
	30
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).ok_or_else(|| {
			ConfigError::Parse("Malformed environment variable reference".into())
		})?;
		let var_name = &cap[1];
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file with environment variable resolution.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let raw = tokio::fs::read_to_string(path).await?;
		raw.parse()
	}

	/// Validates the configuration to ensure all required fields are set.
	///
	/// - Service id must be non-empty
	/// - Storage/account primary implementations must exist in their maps
	/// - The workflow policy must be one of the known policies
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}

		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		if self.account.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one account implementation must be configured".into(),
			));
		}
		if !self
			.account
			.implementations
			.contains_key(&self.account.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary account implementation '{}' not found in implementations",
				self.account.primary
			)));
		}

		if !WORKFLOW_POLICIES.contains(&self.order.workflow_policy.as_str()) {
			return Err(ConfigError::Validation(format!(
				"Unknown workflow policy '{}' (expected one of: {})",
				self.order.workflow_policy,
				WORKFLOW_POLICIES.join(", ")
			)));
		}

		Ok(())
	}
}

/// Parses a configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is automatically
/// validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const BASE_CONFIG: &str = r#"
[service]
id = "rxflow-test"

[storage]
primary = "memory"
[storage.implementations.memory]

[account]
primary = "local"
[account.implementations.local]
accounts = []

[api]
enabled = true
port = 8080
"#;

	#[test]
	fn parses_minimal_config() {
		let config: Config = BASE_CONFIG.parse().unwrap();
		assert_eq!(config.service.id, "rxflow-test");
		assert_eq!(config.order.workflow_policy, "permissive");
		let api = config.api.unwrap();
		assert!(api.enabled);
		assert_eq!(api.host, "127.0.0.1");
		assert_eq!(api.port, 8080);
	}

	#[test]
	fn env_var_resolution() {
		std::env::set_var("RXFLOW_TEST_ID", "from-env");
		let input = "id = \"${RXFLOW_TEST_ID}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "id = \"from-env\"");
		std::env::remove_var("RXFLOW_TEST_ID");
	}

	#[test]
	fn env_var_with_default() {
		let input = "value = \"${RXFLOW_MISSING_VAR:-fallback}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"fallback\"");
	}

	#[test]
	fn missing_env_var_is_an_error() {
		let input = "value = \"${RXFLOW_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("RXFLOW_MISSING_VAR"));
	}

	#[test]
	fn rejects_unknown_primary_storage() {
		let config = BASE_CONFIG.replace("primary = \"memory\"", "primary = \"redis\"");
		let result: Result<Config, _> = config.parse();
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Primary storage 'redis' not found"));
	}

	#[test]
	fn rejects_unknown_workflow_policy() {
		let config = format!("{}\n[order]\nworkflow_policy = \"chaotic\"\n", BASE_CONFIG);
		let result: Result<Config, _> = config.parse();
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Unknown workflow policy"));
	}

	#[test]
	fn accepts_sequential_policy() {
		let config = format!("{}\n[order]\nworkflow_policy = \"sequential\"\n", BASE_CONFIG);
		let config: Config = config.parse().unwrap();
		assert_eq!(config.order.workflow_policy, "sequential");
	}

	#[tokio::test]
	async fn loads_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(&path, BASE_CONFIG).unwrap();

		let config = Config::from_file(path.to_str().unwrap()).await.unwrap();
		assert_eq!(config.service.id, "rxflow-test");
	}
}
