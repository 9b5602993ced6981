//! Order endpoints.
//!
//! Placement, listing, retrieval, workflow transitions and the two
//! retailer-facing lifecycle events. All authorization beyond credential
//! resolution happens inside the engine.

use axum::response::Json;
use rxflow_core::FulfillmentEngine;
use rxflow_types::{
	Actor, ApiError, ApiResponse, Order, PlaceOrderRequest, UpdateWorkflowRequest,
};
use tracing::warn;

use super::to_api_error;

/// Places a new order for a retailer actor.
pub async fn place_order(
	engine: &FulfillmentEngine,
	actor: &Actor,
	request: PlaceOrderRequest,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let order = engine
		.place_order(actor, request)
		.await
		.map_err(to_api_error)?;
	Ok(Json(ApiResponse::ok_with_message(order, "Order placed")))
}

/// Lists orders scoped to the actor, newest first.
pub async fn list_orders(
	engine: &FulfillmentEngine,
	actor: &Actor,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
	let orders = engine.list_orders(actor).await.map_err(to_api_error)?;
	Ok(Json(ApiResponse::ok(orders)))
}

/// Fetches one order visible to the actor.
pub async fn get_order(
	engine: &FulfillmentEngine,
	actor: &Actor,
	order_id: &str,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let order = engine
		.get_order(actor, order_id)
		.await
		.map_err(to_api_error)?;
	Ok(Json(ApiResponse::ok(order)))
}

/// Applies a workflow transition to an order.
pub async fn update_workflow(
	engine: &FulfillmentEngine,
	actor: &Actor,
	order_id: &str,
	request: UpdateWorkflowRequest,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let order = engine
		.update_workflow(actor, order_id, request.distributor_status, request.notes)
		.await
		.map_err(|e| {
			warn!(order_id = %order_id, error = %e, "Workflow update rejected");
			to_api_error(e)
		})?;
	Ok(Json(ApiResponse::ok_with_message(order, "Workflow updated")))
}

/// Cancels a placed order.
pub async fn cancel_order(
	engine: &FulfillmentEngine,
	actor: &Actor,
	order_id: &str,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let order = engine
		.cancel_order(actor, order_id)
		.await
		.map_err(to_api_error)?;
	Ok(Json(ApiResponse::ok_with_message(order, "Order cancelled")))
}

/// Confirms delivery of a placed order.
pub async fn confirm_delivery(
	engine: &FulfillmentEngine,
	actor: &Actor,
	order_id: &str,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let order = engine
		.confirm_delivery(actor, order_id)
		.await
		.map_err(to_api_error)?;
	Ok(Json(ApiResponse::ok_with_message(order, "Delivery confirmed")))
}
