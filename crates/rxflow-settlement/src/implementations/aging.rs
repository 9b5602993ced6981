//! Ageing-based settlement summary implementation.
//!
//! Outstanding balance is the sum of net amounts over a retailer's open
//! orders (placed, neither cancelled nor delivered); ageing is the age in
//! days of the oldest open order.

use crate::{SettlementError, SettlementInterface};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rxflow_types::{ConfigSchema, Order, Schema, SettlementSummary, ValidationError};
use std::collections::BTreeMap;

const SECONDS_PER_DAY: i64 = 86_400;

/// Settlement view computed from order ageing.
pub struct AgingSettlement;

#[async_trait]
impl SettlementInterface for AgingSettlement {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AgingSettlementSchema)
	}

	async fn summarize(
		&self,
		orders: &[Order],
		as_of: i64,
	) -> Result<Vec<SettlementSummary>, SettlementError> {
		// BTreeMap keeps the output ordered by retailer id
		let mut buckets: BTreeMap<&str, (Decimal, i64, usize)> = BTreeMap::new();

		for order in orders.iter().filter(|o| o.is_open()) {
			let entry = buckets
				.entry(order.retailer_id.as_str())
				.or_insert((Decimal::ZERO, order.created_at, 0));
			entry.0 += order.net_amount;
			entry.1 = entry.1.min(order.created_at);
			entry.2 += 1;
		}

		Ok(buckets
			.into_iter()
			.map(|(retailer_id, (outstanding, oldest, open_orders))| SettlementSummary {
				retailer_id: retailer_id.to_string(),
				outstanding,
				ageing_days: (as_of - oldest).max(0) / SECONDS_PER_DAY,
				open_orders,
			})
			.collect())
	}
}

/// Configuration schema for the ageing settlement view.
pub struct AgingSettlementSchema;

impl ConfigSchema for AgingSettlementSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// No required configuration
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create the ageing settlement view.
pub fn create_settlement(
	_config: &toml::Value,
) -> Result<Box<dyn SettlementInterface>, SettlementError> {
	Ok(Box::new(AgingSettlement))
}
