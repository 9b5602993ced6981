//! Core fulfillment engine for the rxflow system.
//!
//! This module provides the authorized read/write surface over order records
//! for distributor-facing operations, coordinating the storage, account and
//! settlement services with the workflow transition validator. It includes
//! the builder and factory pattern for assembling an engine instance from
//! configuration.

use rxflow_account::{AccountError, AccountFactory, AccountService};
use rxflow_config::Config;
use rxflow_order::{validate_new_order, validate_transition, TransitionError, TransitionPolicy};
use rxflow_settlement::{SettlementFactory, SettlementService};
use rxflow_storage::{StorageFactory, StorageService};
use rxflow_types::{
	AccountType, Actor, InventoryAllocation, Order, OrderEvent, OrderStatus, PlaceOrderRequest,
	SettlementSummary, WorkflowState, WorkflowStatus,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod event_bus;
mod state;

pub use event_bus::EventBus;
pub use state::OrderStore;

/// Errors that can occur during fulfillment operations.
///
/// Every failure is surfaced synchronously to the caller; nothing is
/// retried and a failed operation never leaves a partially mutated record.
#[derive(Debug, Error)]
pub enum FulfillmentError {
	/// Error related to engine assembly or configuration issues.
	#[error("Configuration error: {0}")]
	Config(String),
	/// Malformed or invariant-breaking input.
	#[error("Validation failed: {0}")]
	Validation(String),
	/// The actor lacks the role or ownership for the operation.
	#[error("{0}")]
	Forbidden(String),
	/// The referenced order does not exist or is not visible to the actor.
	#[error("{0}")]
	NotFound(String),
	/// The requested workflow or status transition is not legal.
	#[error("{0}")]
	InvalidState(String),
	/// The storage boundary reported a failure.
	#[error("Storage error: {0}")]
	Storage(String),
}

impl From<TransitionError> for FulfillmentError {
	fn from(err: TransitionError) -> Self {
		match err {
			TransitionError::Forbidden(_) => FulfillmentError::Forbidden(err.to_string()),
			TransitionError::NotPermitted { .. } => {
				FulfillmentError::InvalidState(err.to_string())
			},
		}
	}
}

/// The distributor fulfillment service.
///
/// Holds the shared services and the configured transition policy. Each
/// operation runs to completion independently; the only mutation discipline
/// is the role/ownership gate plus the storage backend's per-document write
/// atomicity.
pub struct FulfillmentEngine {
	/// Service configuration.
	config: Config,
	/// Typed order access over the storage boundary.
	orders: OrderStore,
	/// Identity boundary used by the HTTP layer to resolve actors.
	accounts: Arc<AccountService>,
	/// Settlement view implementation.
	settlement: Arc<SettlementService>,
	/// Active workflow transition policy.
	policy: TransitionPolicy,
	/// Event bus for out-of-band notification.
	event_bus: EventBus,
}

impl FulfillmentEngine {
	/// Returns a reference to the configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns the account service for credential resolution.
	pub fn accounts(&self) -> &Arc<AccountService> {
		&self.accounts
	}

	/// Returns a reference to the event bus.
	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	/// Places a new order on behalf of a retailer.
	///
	/// Validates the line-item/net-amount invariant, assigns the id and the
	/// human-readable order number, and stores the document with status
	/// PLACED and workflow PENDING_APPROVAL.
	pub async fn place_order(
		&self,
		actor: &Actor,
		request: PlaceOrderRequest,
	) -> Result<Order, FulfillmentError> {
		if !actor.account_type.can_place_orders() {
			return Err(FulfillmentError::Forbidden(format!(
				"Account type {} may not place orders",
				actor.account_type
			)));
		}

		validate_new_order(&request.items, request.net_amount)
			.map_err(|e| FulfillmentError::Validation(e.to_string()))?;

		// An assigned distributor must reference a real distributor account
		if let Some(distributor_id) = &request.distributor_id {
			match self.accounts.lookup(distributor_id).await {
				Ok(account) if account.account_type == AccountType::Distributor => {},
				Ok(account) => {
					return Err(FulfillmentError::Validation(format!(
						"Account {} is not a distributor",
						account.account_id
					)))
				},
				Err(AccountError::UnknownAccount(id)) => {
					return Err(FulfillmentError::Validation(format!(
						"Unknown distributor account: {}",
						id
					)))
				},
				Err(e) => return Err(FulfillmentError::Storage(e.to_string())),
			}
		}

		let now = chrono::Utc::now().timestamp();
		let order = Order {
			id: Uuid::new_v4().to_string(),
			order_number: self.orders.next_order_number().await?,
			retailer_id: actor.account_id.clone(),
			distributor_id: request.distributor_id,
			net_amount: request.net_amount,
			items: request.items,
			status: OrderStatus::Placed,
			workflow: WorkflowState::pending(&actor.account_id, now),
			created_at: now,
			updated_at: now,
		};

		self.orders.store_order(&order).await?;

		tracing::info!(
			order_id = %order.id,
			order_number = %order.order_number,
			retailer = %order.retailer_id,
			"Order placed"
		);
		self.event_bus.publish(OrderEvent::Placed {
			order_id: order.id.clone(),
			order_number: order.order_number.clone(),
			retailer_id: order.retailer_id.clone(),
		});

		Ok(order)
	}

	/// Lists the orders visible to a fulfillment actor.
	///
	/// Distributors see the orders assigned to them, admins see everything.
	/// The result is sorted by creation time descending; ordering is the
	/// only guaranteed property of the listing.
	pub async fn list_orders(&self, actor: &Actor) -> Result<Vec<Order>, FulfillmentError> {
		self.require_fulfillment_role(actor)?;
		self.scoped_orders(actor).await
	}

	/// Fetches a single order.
	///
	/// An order that exists but is not visible to the actor is reported as
	/// not found, so callers cannot probe for foreign order ids.
	pub async fn get_order(&self, actor: &Actor, order_id: &str) -> Result<Order, FulfillmentError> {
		let order = self.orders.get_order(order_id).await?;
		if !order.visible_to(&actor.account_id, actor.account_type) {
			return Err(FulfillmentError::NotFound(format!(
				"Order not found: {}",
				order_id
			)));
		}
		Ok(order)
	}

	/// Transitions the distributor workflow sub-state of an order.
	///
	/// Load, gate, validate, write, return: exactly one document write, and
	/// downstream concerns are notified out-of-band through the event bus.
	pub async fn update_workflow(
		&self,
		actor: &Actor,
		order_id: &str,
		requested: WorkflowStatus,
		notes: Option<String>,
	) -> Result<Order, FulfillmentError> {
		let order = self.orders.get_order(order_id).await?;

		if !actor.account_type.can_manage_fulfillment() {
			return Err(FulfillmentError::Forbidden(format!(
				"Account type {} may not modify the fulfillment workflow",
				actor.account_type
			)));
		}
		if actor.account_type == AccountType::Distributor && !order.assigned_to(&actor.account_id)
		{
			return Err(FulfillmentError::Forbidden(format!(
				"Order {} is not assigned to distributor {}",
				order.order_number, actor.account_id
			)));
		}

		let current = order.workflow.distributor_status;
		validate_transition(self.policy, current, requested, actor.account_type)?;

		let now = chrono::Utc::now().timestamp();
		let actor_id = actor.account_id.clone();
		let updated = self
			.orders
			.update_order_with(order_id, |order| {
				order.workflow.distributor_status = requested;
				if let Some(notes) = notes {
					order.workflow.notes = Some(notes);
				}
				order.workflow.updated_by = actor_id;
				order.workflow.updated_at = now;
			})
			.await?;

		tracing::info!(
			order_id = %updated.id,
			from = %current,
			to = %requested,
			actor = %actor.account_id,
			"Workflow transitioned"
		);
		self.event_bus.publish(OrderEvent::WorkflowTransitioned {
			order_id: updated.id.clone(),
			from: current,
			to: requested,
			actor_id: actor.account_id.clone(),
		});

		Ok(updated)
	}

	/// Cancels a placed order.
	pub async fn cancel_order(
		&self,
		actor: &Actor,
		order_id: &str,
	) -> Result<Order, FulfillmentError> {
		self.set_status(actor, order_id, OrderStatus::Cancelled).await
	}

	/// Confirms delivery of a placed order.
	pub async fn confirm_delivery(
		&self,
		actor: &Actor,
		order_id: &str,
	) -> Result<Order, FulfillmentError> {
		self.set_status(actor, order_id, OrderStatus::Delivered).await
	}

	/// Moves the retailer-facing lifecycle status off PLACED.
	///
	/// Allowed for the owning retailer and for admins. Cancellation and
	/// delivery confirmation are both one-way: the record itself is never
	/// deleted.
	async fn set_status(
		&self,
		actor: &Actor,
		order_id: &str,
		new_status: OrderStatus,
	) -> Result<Order, FulfillmentError> {
		let order = self.orders.get_order(order_id).await?;

		let permitted = actor.account_type.is_admin()
			|| (actor.account_type == AccountType::Retailer
				&& order.retailer_id == actor.account_id);
		if !permitted {
			return Err(FulfillmentError::Forbidden(format!(
				"Account {} may not change the status of order {}",
				actor.account_id, order.order_number
			)));
		}

		if order.status != OrderStatus::Placed {
			return Err(FulfillmentError::InvalidState(format!(
				"Order {} is {} and cannot become {}",
				order.order_number, order.status, new_status
			)));
		}

		let updated = self
			.orders
			.update_order_with(order_id, |order| {
				order.status = new_status;
			})
			.await?;

		tracing::info!(
			order_id = %updated.id,
			status = %new_status,
			actor = %actor.account_id,
			"Order status changed"
		);
		self.event_bus.publish(OrderEvent::StatusChanged {
			order_id: updated.id.clone(),
			status: new_status,
			actor_id: actor.account_id.clone(),
		});

		Ok(updated)
	}

	/// Computes the inventory allocation view over the actor's orders.
	///
	/// Quantities from open orders are split by whether the workflow has
	/// reached ALLOCATED; cancelled and delivered orders do not contribute.
	pub async fn list_inventory(
		&self,
		actor: &Actor,
	) -> Result<Vec<InventoryAllocation>, FulfillmentError> {
		self.require_fulfillment_role(actor)?;
		let orders = self.scoped_orders(actor).await?;

		let mut buckets: BTreeMap<String, (u64, u64)> = BTreeMap::new();
		for order in orders.iter().filter(|o| o.is_open()) {
			let allocated = matches!(
				order.workflow.distributor_status,
				WorkflowStatus::Allocated | WorkflowStatus::Shipped
			);
			for item in &order.items {
				let entry = buckets.entry(item.product_id.clone()).or_insert((0, 0));
				if allocated {
					entry.0 += u64::from(item.quantity);
				} else {
					entry.1 += u64::from(item.quantity);
				}
			}
		}

		Ok(buckets
			.into_iter()
			.map(|(product_id, (allocated_quantity, pending_quantity))| InventoryAllocation {
				product_id,
				allocated_quantity,
				pending_quantity,
			})
			.collect())
	}

	/// Computes the settlement view over the actor's orders.
	pub async fn list_settlements(
		&self,
		actor: &Actor,
	) -> Result<Vec<SettlementSummary>, FulfillmentError> {
		self.require_fulfillment_role(actor)?;
		let orders = self.scoped_orders(actor).await?;
		self.settlement
			.summarize(&orders, chrono::Utc::now().timestamp())
			.await
			.map_err(|e| FulfillmentError::Storage(e.to_string()))
	}

	fn require_fulfillment_role(&self, actor: &Actor) -> Result<(), FulfillmentError> {
		if !actor.account_type.can_manage_fulfillment() {
			return Err(FulfillmentError::Forbidden(format!(
				"Account type {} may not access fulfillment views",
				actor.account_type
			)));
		}
		Ok(())
	}

	/// Loads the orders visible to the actor, newest first.
	async fn scoped_orders(&self, actor: &Actor) -> Result<Vec<Order>, FulfillmentError> {
		let mut orders: Vec<Order> = self
			.orders
			.all_orders()
			.await?
			.into_iter()
			.filter(|o| o.visible_to(&actor.account_id, actor.account_type))
			.collect();
		// Creation time descending, order number as a stable tie-break
		orders.sort_by(|a, b| {
			b.created_at
				.cmp(&a.created_at)
				.then_with(|| b.order_number.cmp(&a.order_number))
		});
		Ok(orders)
	}
}

/// Factory functions used to assemble an engine from configuration.
pub struct FulfillmentFactories {
	/// Storage backend factories by implementation name.
	pub storage_factories: HashMap<String, StorageFactory>,
	/// Account directory factories by implementation name.
	pub account_factories: HashMap<String, AccountFactory>,
	/// Settlement view factory.
	pub settlement_factory: SettlementFactory,
}

/// Builder for constructing a FulfillmentEngine with pluggable backends.
pub struct FulfillmentBuilder {
	config: Config,
}

impl FulfillmentBuilder {
	/// Creates a new builder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the engine using the configured factories.
	///
	/// Each backend's configuration is validated against the schema the
	/// implementation exposes before the engine is assembled.
	pub fn build(self, factories: FulfillmentFactories) -> Result<FulfillmentEngine, FulfillmentError> {
		let storage_name = &self.config.storage.primary;
		let storage_config = self
			.config
			.storage
			.implementations
			.get(storage_name)
			.ok_or_else(|| {
				FulfillmentError::Config(format!("Storage '{}' is not configured", storage_name))
			})?;
		let storage_factory = factories.storage_factories.get(storage_name).ok_or_else(|| {
			FulfillmentError::Config(format!("No factory for storage '{}'", storage_name))
		})?;
		let storage_backend = storage_factory(storage_config).map_err(|e| {
			FulfillmentError::Config(format!(
				"Failed to create storage backend '{}': {}",
				storage_name, e
			))
		})?;
		storage_backend
			.config_schema()
			.validate(storage_config)
			.map_err(|e| {
				FulfillmentError::Config(format!(
					"Invalid configuration for storage '{}': {}",
					storage_name, e
				))
			})?;
		let storage = Arc::new(StorageService::new(storage_backend));
		tracing::info!(component = "storage", implementation = %storage_name, "Loaded");

		let account_name = &self.config.account.primary;
		let account_config = self
			.config
			.account
			.implementations
			.get(account_name)
			.ok_or_else(|| {
				FulfillmentError::Config(format!(
					"Account implementation '{}' is not configured",
					account_name
				))
			})?;
		let account_factory = factories.account_factories.get(account_name).ok_or_else(|| {
			FulfillmentError::Config(format!("No factory for account '{}'", account_name))
		})?;
		let account_backend = account_factory(account_config).map_err(|e| {
			FulfillmentError::Config(format!(
				"Failed to create account directory '{}': {}",
				account_name, e
			))
		})?;
		account_backend
			.config_schema()
			.validate(account_config)
			.map_err(|e| {
				FulfillmentError::Config(format!(
					"Invalid configuration for account '{}': {}",
					account_name, e
				))
			})?;
		let accounts = Arc::new(AccountService::new(account_backend));
		tracing::info!(component = "account", implementation = %account_name, "Loaded");

		let settlement_backend = (factories.settlement_factory)(&toml::Value::Table(
			toml::map::Map::new(),
		))
		.map_err(|e| {
			FulfillmentError::Config(format!("Failed to create settlement view: {}", e))
		})?;
		let settlement = Arc::new(SettlementService::new(settlement_backend));
		tracing::info!(component = "settlement", implementation = "aging", "Loaded");

		let policy = TransitionPolicy::from_config(&self.config.order.workflow_policy)
			.ok_or_else(|| {
				FulfillmentError::Config(format!(
					"Unknown workflow policy '{}'",
					self.config.order.workflow_policy
				))
			})?;

		Ok(FulfillmentEngine {
			config: self.config,
			orders: OrderStore::new(storage),
			accounts,
			settlement,
			policy,
			event_bus: EventBus::new(1000),
		})
	}
}
