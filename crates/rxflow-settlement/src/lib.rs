//! Settlement module for the rxflow fulfillment system.
//!
//! Settlements here are derived, read-only aggregates: per-retailer
//! outstanding balance and ageing computed from the order collection at read
//! time. There is no settlement entity with its own lifecycle. The
//! computation sits behind a trait so a deployment reconciling against an
//! external ledger can swap the implementation.

use async_trait::async_trait;
use rxflow_types::{ConfigSchema, Order, SettlementSummary};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod aging;
}

/// Errors that can occur during settlement computation.
#[derive(Debug, Error)]
pub enum SettlementError {
	/// Error that occurs when the summary cannot be computed.
	#[error("Computation failed: {0}")]
	ComputationFailed(String),
}

/// Trait defining the interface for settlement view implementations.
#[async_trait]
pub trait SettlementInterface: Send + Sync {
	/// Returns the configuration schema for this settlement implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Computes per-retailer settlement summaries over the given orders.
	///
	/// `as_of` is the Unix timestamp ageing is measured against, supplied by
	/// the caller so results are reproducible.
	async fn summarize(
		&self,
		orders: &[Order],
		as_of: i64,
	) -> Result<Vec<SettlementSummary>, SettlementError>;
}

/// Type alias for settlement factory functions.
pub type SettlementFactory =
	fn(&toml::Value) -> Result<Box<dyn SettlementInterface>, SettlementError>;

/// Get all registered settlement implementations.
pub fn get_all_implementations() -> Vec<(&'static str, SettlementFactory)> {
	use implementations::aging;

	vec![("aging", aging::create_settlement)]
}

/// Service wrapping the configured settlement implementation.
pub struct SettlementService {
	/// The underlying settlement implementation.
	implementation: Box<dyn SettlementInterface>,
}

impl SettlementService {
	/// Creates a new SettlementService with the specified implementation.
	pub fn new(implementation: Box<dyn SettlementInterface>) -> Self {
		Self { implementation }
	}

	/// Computes per-retailer settlement summaries.
	pub async fn summarize(
		&self,
		orders: &[Order],
		as_of: i64,
	) -> Result<Vec<SettlementSummary>, SettlementError> {
		self.implementation.summarize(orders, as_of).await
	}
}
