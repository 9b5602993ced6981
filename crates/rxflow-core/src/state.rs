//! Order persistence layer.
//!
//! Wraps the storage service with order-typed operations. Every mutation
//! goes through [`OrderStore::update_order_with`], which loads the document,
//! applies a closure and writes the result back as a single update, stamping
//! `updated_at`. That single write is the only mutation an operation
//! performs; there is no cross-document transaction.

use crate::FulfillmentError;
use chrono::Utc;
use rxflow_order::{format_order_number, ORDER_SEQ_START};
use rxflow_storage::{StorageError, StorageService};
use rxflow_types::{Order, StorageKey};
use std::sync::Arc;

/// Typed order access over the storage boundary.
pub struct OrderStore {
	storage: Arc<StorageService>,
}

impl OrderStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Gets an order by ID.
	pub async fn get_order(&self, order_id: &str) -> Result<Order, FulfillmentError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => {
					FulfillmentError::NotFound(format!("Order not found: {}", order_id))
				},
				other => FulfillmentError::Storage(other.to_string()),
			})
	}

	/// Stores a new order.
	pub async fn store_order(&self, order: &Order) -> Result<(), FulfillmentError> {
		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, order)
			.await
			.map_err(|e| FulfillmentError::Storage(e.to_string()))
	}

	/// Retrieves every order document.
	pub async fn all_orders(&self) -> Result<Vec<Order>, FulfillmentError> {
		self.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(|e| FulfillmentError::Storage(e.to_string()))
	}

	/// Updates an order with a closure and persists it.
	///
	/// The closure sees the freshly loaded document; `updated_at` is stamped
	/// automatically. Concurrent updates to the same order are not
	/// coordinated beyond the backend's per-document atomicity, so the last
	/// writer wins.
	pub async fn update_order_with<F>(
		&self,
		order_id: &str,
		updater: F,
	) -> Result<Order, FulfillmentError>
	where
		F: FnOnce(&mut Order),
	{
		let mut order = self.get_order(order_id).await?;

		updater(&mut order);
		order.updated_at = Utc::now().timestamp();

		self.storage
			.update(StorageKey::Orders.as_str(), order_id, &order)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => {
					FulfillmentError::NotFound(format!("Order not found: {}", order_id))
				},
				other => FulfillmentError::Storage(other.to_string()),
			})?;

		Ok(order)
	}

	/// Draws the next human-readable order number from the persisted
	/// sequence.
	pub async fn next_order_number(&self) -> Result<String, FulfillmentError> {
		let seq: u64 = match self
			.storage
			.retrieve(StorageKey::Meta.as_str(), "order_seq")
			.await
		{
			Ok(value) => value,
			Err(StorageError::NotFound) => ORDER_SEQ_START,
			Err(e) => return Err(FulfillmentError::Storage(e.to_string())),
		};

		self.storage
			.store(StorageKey::Meta.as_str(), "order_seq", &(seq + 1))
			.await
			.map_err(|e| FulfillmentError::Storage(e.to_string()))?;

		Ok(format_order_number(seq))
	}
}
