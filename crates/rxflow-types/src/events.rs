//! Event types for out-of-band notification.
//!
//! The fulfillment core performs exactly one document write per operation;
//! downstream concerns (notifications, invoicing, analytics) are informed
//! through these events instead of synchronous cascading writes. Losing an
//! event never affects the order record itself.

use serde::{Deserialize, Serialize};

use crate::{OrderStatus, WorkflowStatus};

/// Events published by the fulfillment core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A retailer placed a new order.
	Placed {
		order_id: String,
		order_number: String,
		retailer_id: String,
	},
	/// The distributor workflow sub-state changed.
	WorkflowTransitioned {
		order_id: String,
		from: WorkflowStatus,
		to: WorkflowStatus,
		actor_id: String,
	},
	/// The retailer-facing lifecycle status changed.
	StatusChanged {
		order_id: String,
		status: OrderStatus,
		actor_id: String,
	},
}
