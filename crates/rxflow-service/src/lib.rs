//! rxflow fulfillment service.
//!
//! Library surface of the service binary: engine assembly from configuration
//! plus the HTTP server and endpoint implementations. Kept as a library so
//! integration tests can drive the router directly.

use rxflow_core::{FulfillmentBuilder, FulfillmentEngine, FulfillmentError, FulfillmentFactories};

pub mod apis;
pub mod server;

/// Builds the fulfillment engine with all registered backend
/// implementations.
///
/// This function wires up the concrete implementations for:
/// - Storage backends (file, in-memory)
/// - Account directories (config-seeded local directory)
/// - Settlement views (ageing-based aggregates)
pub fn build_engine(config: rxflow_config::Config) -> Result<FulfillmentEngine, FulfillmentError> {
	let factories = FulfillmentFactories {
		storage_factories: rxflow_storage::get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect(),
		account_factories: rxflow_account::get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect(),
		settlement_factory: rxflow_settlement::implementations::aging::create_settlement,
	};

	FulfillmentBuilder::new(config).build(factories)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_engine_from_minimal_config() {
		let config: rxflow_config::Config = r#"
[service]
id = "rxflow-test"

[storage]
primary = "memory"
[storage.implementations.memory]

[account]
primary = "local"
[account.implementations.local]
accounts = []
"#
		.parse()
		.unwrap();

		let engine = build_engine(config).unwrap();
		assert_eq!(engine.config().service.id, "rxflow-test");
	}

	#[test]
	fn unknown_storage_factory_is_a_config_error() {
		let config: rxflow_config::Config = r#"
[service]
id = "rxflow-test"

[storage]
primary = "redis"
[storage.implementations.redis]

[account]
primary = "local"
[account.implementations.local]
accounts = []
"#
		.parse()
		.unwrap();

		let result = build_engine(config);
		assert!(matches!(result, Err(FulfillmentError::Config(_))));
	}
}
