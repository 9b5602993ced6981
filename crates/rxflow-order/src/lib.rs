//! Order processing module for the rxflow fulfillment system.
//!
//! This module holds the pure decision logic around orders: the workflow
//! transition validator with its swappable policy table, and the creation
//! invariants checked when a retailer places a new order. Nothing in this
//! crate touches storage or performs I/O.

use rust_decimal::Decimal;
use rxflow_types::LineItem;
use thiserror::Error;

mod workflow;

pub use workflow::{validate_transition, TransitionError, TransitionPolicy};

/// Errors that can occur when validating a new order.
#[derive(Debug, Error)]
pub enum OrderError {
	/// Error that occurs when order validation fails.
	#[error("Validation failed: {0}")]
	ValidationFailed(String),
}

/// Validates the creation invariants of a new order.
///
/// - the item list must be non-empty
/// - every quantity must be positive
/// - no unit price may be negative
/// - the claimed net amount must equal the sum of line subtotals
///
/// The net-amount invariant holds at creation time only; it is not
/// re-validated on reads.
pub fn validate_new_order(items: &[LineItem], net_amount: Decimal) -> Result<(), OrderError> {
	if items.is_empty() {
		return Err(OrderError::ValidationFailed(
			"Order must contain at least one line item".into(),
		));
	}

	for (i, item) in items.iter().enumerate() {
		if item.quantity == 0 {
			return Err(OrderError::ValidationFailed(format!(
				"Line item {} has zero quantity",
				i
			)));
		}
		if item.unit_price < Decimal::ZERO {
			return Err(OrderError::ValidationFailed(format!(
				"Line item {} has a negative unit price",
				i
			)));
		}
	}

	let total: Decimal = items.iter().map(LineItem::subtotal).sum();
	if total != net_amount {
		return Err(OrderError::ValidationFailed(format!(
			"Net amount {} does not match line item total {}",
			net_amount, total
		)));
	}

	Ok(())
}

/// First value of the human-readable order-number sequence.
pub const ORDER_SEQ_START: u64 = 1001;

/// Formats a sequence value as a human-readable order number.
pub fn format_order_number(seq: u64) -> String {
	format!("ORD-{}", seq)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	fn item(quantity: u32, unit_price: Decimal) -> LineItem {
		LineItem {
			product_id: "P-TEST".into(),
			quantity,
			unit_price,
		}
	}

	#[test]
	fn accepts_matching_net_amount() {
		let items = vec![item(10, dec!(12.50)), item(5, dec!(5.00))];
		assert!(validate_new_order(&items, dec!(150.00)).is_ok());
	}

	#[test]
	fn rejects_empty_order() {
		let err = validate_new_order(&[], dec!(0)).unwrap_err();
		assert!(err.to_string().contains("at least one line item"));
	}

	#[test]
	fn rejects_zero_quantity() {
		let items = vec![item(0, dec!(1.00))];
		let err = validate_new_order(&items, dec!(0)).unwrap_err();
		assert!(err.to_string().contains("zero quantity"));
	}

	#[test]
	fn rejects_net_amount_mismatch() {
		let items = vec![item(2, dec!(10.00))];
		let err = validate_new_order(&items, dec!(25.00)).unwrap_err();
		assert!(err.to_string().contains("does not match"));
	}

	#[test]
	fn order_number_format() {
		assert_eq!(format_order_number(ORDER_SEQ_START), "ORD-1001");
		assert_eq!(format_order_number(1002), "ORD-1002");
	}
}
