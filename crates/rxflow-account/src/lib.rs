//! Account directory module for the rxflow fulfillment system.
//!
//! This module provides the identity boundary: it resolves inbound
//! credentials to an [`Actor`] (account id, tenant category, display name)
//! which every core operation receives. The core trusts the resolved actor
//! but still performs its own fine-grained ownership checks.

use async_trait::async_trait;
use rxflow_types::{Actor, ConfigSchema};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// The presented credential does not map to any account.
	#[error("Unknown API key")]
	UnknownKey,
	/// The referenced account id does not exist.
	#[error("Unknown account: {0}")]
	UnknownAccount(String),
	/// Error that occurs when interacting with the account implementation.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Trait defining the interface for account directory implementations.
///
/// Implementations resolve credentials and account ids to actors. The
/// directory is read-only from the service's perspective; account
/// provisioning happens out-of-band.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Returns the configuration schema for this account implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Resolves an API key to the actor it authenticates.
	async fn authenticate(&self, api_key: &str) -> Result<Actor, AccountError>;

	/// Looks up an account by its id.
	async fn lookup(&self, account_id: &str) -> Result<Actor, AccountError>;
}

/// Type alias for account factory functions.
pub type AccountFactory = fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError>;

/// Get all registered account implementations.
///
/// Returns a vector of (name, factory) tuples for all available account
/// implementations, used by the service builder.
pub fn get_all_implementations() -> Vec<(&'static str, AccountFactory)> {
	use implementations::local;

	vec![("local", local::create_directory)]
}

/// Service that manages account resolution.
///
/// This struct provides a high-level interface for the identity boundary,
/// wrapping an underlying directory implementation.
pub struct AccountService {
	/// The underlying account directory implementation.
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService with the specified implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Resolves an API key to an actor.
	pub async fn authenticate(&self, api_key: &str) -> Result<Actor, AccountError> {
		self.implementation.authenticate(api_key).await
	}

	/// Looks up an account by id.
	pub async fn lookup(&self, account_id: &str) -> Result<Actor, AccountError> {
		self.implementation.lookup(account_id).await
	}
}
