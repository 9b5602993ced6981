//! Account and actor types for the rxflow fulfillment system.
//!
//! Every request enters the system carrying an [`Actor`]: the authenticated
//! identity plus the coarse tenant category it belongs to. Capability checks
//! are methods on [`AccountType`] so that role decisions have a single source
//! of truth instead of ad hoc string comparisons in route handlers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse tenant category gating which operations are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
	/// Platform operator with unrestricted access.
	Admin,
	/// Pharmacy/retailer account that places orders.
	Retailer,
	/// Distributor account that fulfills assigned orders.
	Distributor,
	/// End customer account (support tickets only, no fulfillment access).
	Customer,
}

impl AccountType {
	/// True for account types allowed to drive the fulfillment workflow.
	///
	/// Only distributors and admins may request workflow transitions or read
	/// the distributor-facing list/inventory/settlement views.
	pub fn can_manage_fulfillment(&self) -> bool {
		matches!(self, AccountType::Distributor | AccountType::Admin)
	}

	/// True for account types allowed to place new orders.
	pub fn can_place_orders(&self) -> bool {
		matches!(self, AccountType::Retailer)
	}

	/// True if this account type sees every order regardless of assignment.
	pub fn is_admin(&self) -> bool {
		matches!(self, AccountType::Admin)
	}
}

impl fmt::Display for AccountType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			AccountType::Admin => "ADMIN",
			AccountType::Retailer => "RETAILER",
			AccountType::Distributor => "DISTRIBUTOR",
			AccountType::Customer => "CUSTOMER",
		};
		write!(f, "{}", s)
	}
}

impl FromStr for AccountType {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ADMIN" => Ok(Self::Admin),
			"RETAILER" => Ok(Self::Retailer),
			"DISTRIBUTOR" => Ok(Self::Distributor),
			"CUSTOMER" => Ok(Self::Customer),
			_ => Err(()),
		}
	}
}

/// The authenticated identity making a request.
///
/// Supplied by the identity boundary after authentication; the core trusts
/// the fields but still performs its own fine-grained ownership checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
	/// Unique account identifier.
	pub account_id: String,
	/// Tenant category of the account.
	pub account_type: AccountType,
	/// Human-readable name, used for audit stamps on workflow updates.
	pub display_name: String,
}

impl Actor {
	/// Creates an actor from its parts.
	pub fn new(
		account_id: impl Into<String>,
		account_type: AccountType,
		display_name: impl Into<String>,
	) -> Self {
		Self {
			account_id: account_id.into(),
			account_type,
			display_name: display_name.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn capability_checks() {
		assert!(AccountType::Admin.can_manage_fulfillment());
		assert!(AccountType::Distributor.can_manage_fulfillment());
		assert!(!AccountType::Retailer.can_manage_fulfillment());
		assert!(!AccountType::Customer.can_manage_fulfillment());

		assert!(AccountType::Retailer.can_place_orders());
		assert!(!AccountType::Distributor.can_place_orders());
	}

	#[test]
	fn wire_format_is_screaming_snake_case() {
		let json = serde_json::to_string(&AccountType::Distributor).unwrap();
		assert_eq!(json, "\"DISTRIBUTOR\"");
		let parsed: AccountType = serde_json::from_str("\"ADMIN\"").unwrap();
		assert_eq!(parsed, AccountType::Admin);
	}
}
