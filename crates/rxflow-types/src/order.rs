//! Order document types for the rxflow fulfillment system.
//!
//! This module defines the persistent purchase-order record and the two
//! independent status axes it carries: the retailer-facing lifecycle status
//! and the distributor-facing workflow sub-state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AccountType;

/// One line of an order: a product reference, a quantity and a unit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
	/// Catalog reference of the product being ordered.
	pub product_id: String,
	/// Ordered quantity, must be positive.
	pub quantity: u32,
	/// Unit price in the deployment currency.
	pub unit_price: Decimal,
}

impl LineItem {
	/// Line subtotal: quantity times unit price.
	pub fn subtotal(&self) -> Decimal {
		Decimal::from(self.quantity) * self.unit_price
	}
}

/// Retailer-facing lifecycle status of an order.
///
/// Orders are never physically deleted; cancellation and delivery
/// confirmation only move this status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Order has been placed and is open.
	Placed,
	/// Order was cancelled before delivery.
	Cancelled,
	/// Delivery has been confirmed.
	Delivered,
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Placed => write!(f, "PLACED"),
			OrderStatus::Cancelled => write!(f, "CANCELLED"),
			OrderStatus::Delivered => write!(f, "DELIVERED"),
		}
	}
}

/// Distributor-facing workflow sub-state, independent of [`OrderStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
	/// Waiting for the assigned distributor to approve.
	PendingApproval,
	/// Approved for fulfillment.
	Approved,
	/// Consolidated into a dispatch batch.
	Consolidated,
	/// Stock has been allocated.
	Allocated,
	/// Shipment is on its way.
	Shipped,
}

impl WorkflowStatus {
	/// Returns an iterator over all workflow statuses in sequence order.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::PendingApproval,
			Self::Approved,
			Self::Consolidated,
			Self::Allocated,
			Self::Shipped,
		]
		.into_iter()
	}
}

impl fmt::Display for WorkflowStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			WorkflowStatus::PendingApproval => write!(f, "PENDING_APPROVAL"),
			WorkflowStatus::Approved => write!(f, "APPROVED"),
			WorkflowStatus::Consolidated => write!(f, "CONSOLIDATED"),
			WorkflowStatus::Allocated => write!(f, "ALLOCATED"),
			WorkflowStatus::Shipped => write!(f, "SHIPPED"),
		}
	}
}

/// Nested workflow sub-state carried by every order.
///
/// Mutated only through explicit transition requests by distributor or admin
/// actors; every mutation stamps the acting account and time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
	/// Current workflow sub-state.
	pub distributor_status: WorkflowStatus,
	/// Free-text notes set by the last transition, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Account id of the last actor that touched the workflow.
	pub updated_by: String,
	/// Unix timestamp of the last workflow mutation.
	pub updated_at: i64,
}

impl WorkflowState {
	/// Initial workflow state for a freshly placed order.
	pub fn pending(created_by: impl Into<String>, now: i64) -> Self {
		Self {
			distributor_status: WorkflowStatus::PendingApproval,
			notes: None,
			updated_by: created_by.into(),
			updated_at: now,
		}
	}
}

/// The authoritative purchase-order document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier (UUID v4).
	pub id: String,
	/// Human-readable order number, unique, assigned at creation.
	pub order_number: String,
	/// Account id of the retailer that placed the order.
	pub retailer_id: String,
	/// Distributor the order is assigned to, if any. An order is visible to
	/// at most one distributor.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub distributor_id: Option<String>,
	/// Net amount; equals the sum of line subtotals at creation time.
	pub net_amount: Decimal,
	/// Ordered sequence of line items.
	pub items: Vec<LineItem>,
	/// Retailer-facing lifecycle status.
	pub status: OrderStatus,
	/// Distributor-facing workflow sub-state.
	pub workflow: WorkflowState,
	/// Unix timestamp when this order was created.
	pub created_at: i64,
	/// Unix timestamp when this order was last updated.
	pub updated_at: i64,
}

impl Order {
	/// Sum of the line subtotals.
	pub fn items_total(&self) -> Decimal {
		self.items.iter().map(LineItem::subtotal).sum()
	}

	/// True if the order is assigned to the given distributor account.
	pub fn assigned_to(&self, account_id: &str) -> bool {
		self.distributor_id.as_deref() == Some(account_id)
	}

	/// True if the order still counts toward a retailer's outstanding
	/// balance: placed, neither cancelled nor delivered.
	pub fn is_open(&self) -> bool {
		self.status == OrderStatus::Placed
	}

	/// Visibility rule shared by the read operations: admins see everything,
	/// retailers their own orders, distributors their assigned orders.
	pub fn visible_to(&self, account_id: &str, account_type: AccountType) -> bool {
		match account_type {
			AccountType::Admin => true,
			AccountType::Retailer => self.retailer_id == account_id,
			AccountType::Distributor => self.assigned_to(account_id),
			AccountType::Customer => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	fn sample_order() -> Order {
		Order {
			id: "7c9e6679-7425-40de-944b-e07fc1f90ae7".into(),
			order_number: "ORD-1001".into(),
			retailer_id: "R1".into(),
			distributor_id: Some("D1".into()),
			net_amount: dec!(150.00),
			items: vec![
				LineItem {
					product_id: "P-AMOX-500".into(),
					quantity: 10,
					unit_price: dec!(12.50),
				},
				LineItem {
					product_id: "P-IBU-200".into(),
					quantity: 5,
					unit_price: dec!(5.00),
				},
			],
			status: OrderStatus::Placed,
			workflow: WorkflowState::pending("R1", 1_700_000_000),
			created_at: 1_700_000_000,
			updated_at: 1_700_000_000,
		}
	}

	#[test]
	fn items_total_sums_subtotals() {
		let order = sample_order();
		assert_eq!(order.items_total(), dec!(150.00));
	}

	#[test]
	fn visibility_by_account_type() {
		let order = sample_order();
		assert!(order.visible_to("anyone", AccountType::Admin));
		assert!(order.visible_to("R1", AccountType::Retailer));
		assert!(!order.visible_to("R2", AccountType::Retailer));
		assert!(order.visible_to("D1", AccountType::Distributor));
		assert!(!order.visible_to("D2", AccountType::Distributor));
		assert!(!order.visible_to("C1", AccountType::Customer));
	}

	#[test]
	fn workflow_status_wire_format() {
		let json = serde_json::to_string(&WorkflowStatus::PendingApproval).unwrap();
		assert_eq!(json, "\"PENDING_APPROVAL\"");
		assert!(serde_json::from_str::<WorkflowStatus>("\"IN_TRANSIT\"").is_err());
	}

	#[test]
	fn workflow_state_serializes_distributor_status() {
		let order = sample_order();
		let value = serde_json::to_value(&order).unwrap();
		assert_eq!(
			value["workflow"]["distributorStatus"],
			serde_json::json!("PENDING_APPROVAL")
		);
		assert_eq!(value["orderNumber"], serde_json::json!("ORD-1001"));
	}
}
