//! Settlement view endpoint.

use axum::response::Json;
use rxflow_core::FulfillmentEngine;
use rxflow_types::{Actor, ApiError, ApiResponse, SettlementSummary};

use super::to_api_error;

/// Returns per-retailer settlement summaries scoped to the actor.
pub async fn list_settlements(
	engine: &FulfillmentEngine,
	actor: &Actor,
) -> Result<Json<ApiResponse<Vec<SettlementSummary>>>, ApiError> {
	let summaries = engine.list_settlements(actor).await.map_err(to_api_error)?;
	Ok(Json(ApiResponse::ok(summaries)))
}
