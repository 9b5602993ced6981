//! Workflow transition validator.
//!
//! The distributor workflow is an explicit transition table rather than an
//! implicit membership check, so the sequencing policy is a single testable
//! data structure. Two policies exist: the permissive table reproduces the
//! reference behavior where any workflow status may follow any other, the
//! sequential table restricts movement to the forward sequence
//! PENDING_APPROVAL -> APPROVED -> CONSOLIDATED -> ALLOCATED -> SHIPPED.
//! Self-transitions are legal under both so that repeating a request is
//! idempotent.

use once_cell::sync::Lazy;
use rxflow_types::{AccountType, WorkflowStatus};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors returned by the transition validator.
#[derive(Debug, Error)]
pub enum TransitionError {
	/// The actor's account type may not drive the workflow at all.
	#[error("Account type {0} may not modify the fulfillment workflow")]
	Forbidden(AccountType),
	/// The requested transition is not in the active policy's table.
	#[error("Workflow transition {from} -> {to} is not permitted")]
	NotPermitted {
		from: WorkflowStatus,
		to: WorkflowStatus,
	},
}

/// Which transition table the validator consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
	/// Any workflow status may follow any other (reference behavior).
	#[default]
	Permissive,
	/// Strict forward-only sequencing; SHIPPED is terminal.
	Sequential,
}

impl TransitionPolicy {
	/// Parses the policy name used in configuration.
	pub fn from_config(name: &str) -> Option<Self> {
		match name {
			"permissive" => Some(Self::Permissive),
			"sequential" => Some(Self::Sequential),
			_ => None,
		}
	}

	fn table(&self) -> &'static HashMap<WorkflowStatus, HashSet<WorkflowStatus>> {
		match self {
			TransitionPolicy::Permissive => &PERMISSIVE,
			TransitionPolicy::Sequential => &SEQUENTIAL,
		}
	}
}

// Each state maps to the set of states allowed to follow it.
static PERMISSIVE: Lazy<HashMap<WorkflowStatus, HashSet<WorkflowStatus>>> = Lazy::new(|| {
	WorkflowStatus::all()
		.map(|from| (from, WorkflowStatus::all().collect()))
		.collect()
});

static SEQUENTIAL: Lazy<HashMap<WorkflowStatus, HashSet<WorkflowStatus>>> = Lazy::new(|| {
	use WorkflowStatus::*;
	let mut m = HashMap::new();
	m.insert(PendingApproval, HashSet::from([PendingApproval, Approved]));
	m.insert(Approved, HashSet::from([Approved, Consolidated]));
	m.insert(Consolidated, HashSet::from([Consolidated, Allocated]));
	m.insert(Allocated, HashSet::from([Allocated, Shipped]));
	m.insert(Shipped, HashSet::from([Shipped])); // terminal
	m
});

/// Decides whether a requested workflow transition is legal.
///
/// Pure function: checks the actor's account type first, then the policy
/// table. Returns a decision only, no side effects.
pub fn validate_transition(
	policy: TransitionPolicy,
	current: WorkflowStatus,
	requested: WorkflowStatus,
	account_type: AccountType,
) -> Result<(), TransitionError> {
	if !account_type.can_manage_fulfillment() {
		return Err(TransitionError::Forbidden(account_type));
	}

	let allowed = policy
		.table()
		.get(&current)
		.is_some_and(|set| set.contains(&requested));
	if !allowed {
		return Err(TransitionError::NotPermitted {
			from: current,
			to: requested,
		});
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use WorkflowStatus::*;

	#[test]
	fn permissive_accepts_any_member_for_distributor() {
		for from in WorkflowStatus::all() {
			for to in WorkflowStatus::all() {
				assert!(validate_transition(
					TransitionPolicy::Permissive,
					from,
					to,
					AccountType::Distributor
				)
				.is_ok());
			}
		}
	}

	#[test]
	fn permissive_allows_backward_jump_for_admin() {
		// Reference behavior: membership only, no sequencing
		assert!(validate_transition(
			TransitionPolicy::Permissive,
			Shipped,
			PendingApproval,
			AccountType::Admin
		)
		.is_ok());
		assert!(validate_transition(
			TransitionPolicy::Permissive,
			Approved,
			Shipped,
			AccountType::Admin
		)
		.is_ok());
	}

	#[test]
	fn non_fulfillment_roles_are_forbidden() {
		for account_type in [AccountType::Retailer, AccountType::Customer] {
			let result = validate_transition(
				TransitionPolicy::Permissive,
				PendingApproval,
				Approved,
				account_type,
			);
			assert!(matches!(result, Err(TransitionError::Forbidden(t)) if t == account_type));
		}
	}

	#[test]
	fn sequential_accepts_only_successor_or_self() {
		let policy = TransitionPolicy::Sequential;
		let actor = AccountType::Distributor;

		assert!(validate_transition(policy, PendingApproval, Approved, actor).is_ok());
		assert!(validate_transition(policy, Approved, Consolidated, actor).is_ok());
		assert!(validate_transition(policy, Consolidated, Allocated, actor).is_ok());
		assert!(validate_transition(policy, Allocated, Shipped, actor).is_ok());

		// Self-transition stays idempotent
		assert!(validate_transition(policy, Approved, Approved, actor).is_ok());

		// Skips and reversals are rejected
		assert!(matches!(
			validate_transition(policy, Approved, Shipped, actor),
			Err(TransitionError::NotPermitted { .. })
		));
		assert!(matches!(
			validate_transition(policy, Shipped, PendingApproval, actor),
			Err(TransitionError::NotPermitted { .. })
		));
	}

	#[test]
	fn sequential_shipped_is_terminal() {
		for to in WorkflowStatus::all().filter(|s| *s != Shipped) {
			assert!(validate_transition(
				TransitionPolicy::Sequential,
				Shipped,
				to,
				AccountType::Admin
			)
			.is_err());
		}
	}

	#[test]
	fn policy_parses_from_config_names() {
		assert_eq!(
			TransitionPolicy::from_config("permissive"),
			Some(TransitionPolicy::Permissive)
		);
		assert_eq!(
			TransitionPolicy::from_config("sequential"),
			Some(TransitionPolicy::Sequential)
		);
		assert_eq!(TransitionPolicy::from_config("strict"), None);
	}
}
