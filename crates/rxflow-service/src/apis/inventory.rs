//! Inventory allocation endpoint.

use axum::response::Json;
use rxflow_core::FulfillmentEngine;
use rxflow_types::{Actor, ApiError, ApiResponse, InventoryAllocation};

use super::to_api_error;

/// Returns the per-product allocation view scoped to the actor.
pub async fn list_inventory(
	engine: &FulfillmentEngine,
	actor: &Actor,
) -> Result<Json<ApiResponse<Vec<InventoryAllocation>>>, ApiError> {
	let rows = engine.list_inventory(actor).await.map_err(to_api_error)?;
	Ok(Json(ApiResponse::ok(rows)))
}
