//! Derived read-only view types.
//!
//! Settlement summaries and inventory allocation rows are computed on read
//! from the order collection; neither has an independent lifecycle or its own
//! storage namespace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-retailer settlement aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
	/// Retailer account the aggregate belongs to.
	pub retailer_id: String,
	/// Sum of net amounts over the retailer's open orders.
	pub outstanding: Decimal,
	/// Age in days of the oldest open order, 0 when nothing is open.
	pub ageing_days: i64,
	/// Number of open orders contributing to the balance.
	pub open_orders: usize,
}

/// Per-product allocation row for the distributor inventory view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAllocation {
	/// Catalog reference of the product.
	pub product_id: String,
	/// Quantity in orders whose workflow reached ALLOCATED or SHIPPED.
	pub allocated_quantity: u64,
	/// Quantity still upstream of allocation.
	pub pending_quantity: u64,
}
