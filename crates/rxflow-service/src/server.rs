//! HTTP server for the rxflow fulfillment API.
//!
//! This module provides the HTTP surface over the fulfillment engine:
//! routing, identity resolution from the `X-Api-Key` header, and the uniform
//! response envelope. Handlers delegate to the functions in [`crate::apis`].

use axum::{
	extract::{Path, State},
	http::HeaderMap,
	response::Json,
	routing::{get, patch, post},
	Router,
};
use rxflow_config::ApiConfig;
use rxflow_core::FulfillmentEngine;
use rxflow_types::{
	Actor, ApiError, ApiResponse, InventoryAllocation, Order, PlaceOrderRequest,
	SettlementSummary, UpdateWorkflowRequest,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the fulfillment engine for processing requests.
	pub engine: Arc<FulfillmentEngine>,
}

/// Builds the API router over the given state.
///
/// Separated from [`start_server`] so integration tests can drive the router
/// without binding a socket.
pub fn build_router(state: AppState) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/orders", get(handle_list_orders).post(handle_place_order))
				.route(
					"/orders/{id}",
					patch(handle_update_order).get(handle_get_order),
				)
				.route("/orders/{id}/cancel", post(handle_cancel_order))
				.route("/orders/{id}/deliver", post(handle_confirm_delivery))
				.route("/inventory", get(handle_list_inventory))
				.route("/settlements", get(handle_list_settlements)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(state)
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<FulfillmentEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(AppState { engine });

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("rxflow API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Resolves the actor from the `X-Api-Key` request header.
///
/// Route-level gating is coarse; the engine re-checks ownership on every
/// operation.
async fn resolve_actor(state: &AppState, headers: &HeaderMap) -> Result<Actor, ApiError> {
	let api_key = headers
		.get("x-api-key")
		.and_then(|v| v.to_str().ok())
		.ok_or_else(|| ApiError::Unauthenticated("Missing X-Api-Key header".into()))?;

	state
		.engine
		.accounts()
		.authenticate(api_key)
		.await
		.map_err(|_| ApiError::Unauthenticated("Unknown API key".into()))
}

/// Parses a request body into its typed form.
///
/// Bodies are taken as raw JSON and parsed explicitly so schema violations
/// (an unknown workflow status, a missing field) come back as a 400 inside
/// the uniform envelope instead of the framework's default rejection.
fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
	serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))
}

/// Handles POST /api/orders requests.
async fn handle_place_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(body): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let actor = resolve_actor(&state, &headers).await?;
	let request: PlaceOrderRequest = parse_body(body)?;
	crate::apis::orders::place_order(&state.engine, &actor, request).await
}

/// Handles GET /api/orders requests.
async fn handle_list_orders(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
	let actor = resolve_actor(&state, &headers).await?;
	crate::apis::orders::list_orders(&state.engine, &actor).await
}

/// Handles GET /api/orders/{id} requests.
async fn handle_get_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let actor = resolve_actor(&state, &headers).await?;
	crate::apis::orders::get_order(&state.engine, &actor, &id).await
}

/// Handles PATCH /api/orders/{id} requests.
async fn handle_update_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(body): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let actor = resolve_actor(&state, &headers).await?;
	let request: UpdateWorkflowRequest = parse_body(body)?;
	crate::apis::orders::update_workflow(&state.engine, &actor, &id, request).await
}

/// Handles POST /api/orders/{id}/cancel requests.
async fn handle_cancel_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let actor = resolve_actor(&state, &headers).await?;
	crate::apis::orders::cancel_order(&state.engine, &actor, &id).await
}

/// Handles POST /api/orders/{id}/deliver requests.
async fn handle_confirm_delivery(
	Path(id): Path<String>,
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
	let actor = resolve_actor(&state, &headers).await?;
	crate::apis::orders::confirm_delivery(&state.engine, &actor, &id).await
}

/// Handles GET /api/inventory requests.
async fn handle_list_inventory(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<InventoryAllocation>>>, ApiError> {
	let actor = resolve_actor(&state, &headers).await?;
	crate::apis::inventory::list_inventory(&state.engine, &actor).await
}

/// Handles GET /api/settlements requests.
async fn handle_list_settlements(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<SettlementSummary>>>, ApiError> {
	let actor = resolve_actor(&state, &headers).await?;
	crate::apis::settlements::list_settlements(&state.engine, &actor).await
}
