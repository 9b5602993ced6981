//! End-to-end tests for the HTTP API surface.
//!
//! Drives the router directly with in-memory storage and a config-seeded
//! account directory, asserting the response envelope and status-code
//! mapping for the documented scenarios.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rxflow_service::server::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const CONFIG: &str = r#"
[service]
id = "rxflow-api-test"

[storage]
primary = "memory"
[storage.implementations.memory]

[account]
primary = "local"
[account.implementations.local]

[[account.implementations.local.accounts]]
id = "R1"
api_key = "key-r1"
account_type = "RETAILER"
display_name = "City Pharmacy"

[[account.implementations.local.accounts]]
id = "D1"
api_key = "key-d1"
account_type = "DISTRIBUTOR"

[[account.implementations.local.accounts]]
id = "D2"
api_key = "key-d2"
account_type = "DISTRIBUTOR"

[[account.implementations.local.accounts]]
id = "A1"
api_key = "key-a1"
account_type = "ADMIN"

[api]
enabled = true
"#;

fn app() -> Router {
	let config = CONFIG.parse().unwrap();
	let engine = rxflow_service::build_engine(config).unwrap();
	build_router(AppState {
		engine: Arc::new(engine),
	})
}

async fn send(
	app: &Router,
	method: &str,
	path: &str,
	api_key: Option<&str>,
	body: Option<Value>,
) -> (StatusCode, Value) {
	let mut builder = Request::builder().method(method).uri(path);
	if let Some(key) = api_key {
		builder = builder.header("x-api-key", key);
	}
	let request = match body {
		Some(value) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(value.to_string()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	};

	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	let value = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap()
	};
	(status, value)
}

fn place_order_body() -> Value {
	json!({
		"items": [
			{"productId": "P-AMOX-500", "quantity": 10, "unitPrice": "12.50"},
			{"productId": "P-IBU-200", "quantity": 5, "unitPrice": "5.00"}
		],
		"netAmount": "150.00",
		"distributorId": "D1"
	})
}

async fn place_order(app: &Router) -> String {
	let (status, body) = send(app, "POST", "/api/orders", Some("key-r1"), Some(place_order_body())).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], json!(true));
	body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_credentials_are_unauthenticated() {
	let app = app();
	let (status, body) = send(&app, "GET", "/api/orders", None, None).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["success"], json!(false));
	assert_eq!(body["error"], json!("UNAUTHENTICATED"));

	let (status, body) = send(&app, "GET", "/api/orders", Some("bogus-key"), None).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["error"], json!("UNAUTHENTICATED"));
}

#[tokio::test]
async fn placement_assigns_order_number_and_pending_workflow() {
	let app = app();
	let (status, body) = send(&app, "POST", "/api/orders", Some("key-r1"), Some(place_order_body())).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], json!(true));
	assert_eq!(body["data"]["orderNumber"], json!("ORD-1001"));
	assert_eq!(body["data"]["status"], json!("PLACED"));
	assert_eq!(
		body["data"]["workflow"]["distributorStatus"],
		json!("PENDING_APPROVAL")
	);
}

#[tokio::test]
async fn distributors_may_not_place_orders() {
	let app = app();
	let (status, body) = send(&app, "POST", "/api/orders", Some("key-d1"), Some(place_order_body())).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	assert_eq!(body["error"], json!("FORBIDDEN"));
}

#[tokio::test]
async fn assigned_distributor_approves_then_foreign_distributor_is_forbidden() {
	let app = app();
	let order_id = place_order(&app).await;

	// D1 approves ORD-1001
	let (status, body) = send(
		&app,
		"PATCH",
		&format!("/api/orders/{}", order_id),
		Some("key-d1"),
		Some(json!({"distributorStatus": "APPROVED", "notes": "stock confirmed"})),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], json!(true));
	assert_eq!(body["data"]["workflow"]["distributorStatus"], json!("APPROVED"));
	assert_eq!(body["data"]["workflow"]["notes"], json!("stock confirmed"));

	// D2 touches the same order and is rejected
	let (status, body) = send(
		&app,
		"PATCH",
		&format!("/api/orders/{}", order_id),
		Some("key-d2"),
		Some(json!({"distributorStatus": "CONSOLIDATED"})),
	)
	.await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	assert_eq!(body["success"], json!(false));
	assert_eq!(body["error"], json!("FORBIDDEN"));
}

#[tokio::test]
async fn admin_may_jump_workflow_states_under_default_policy() {
	let app = app();
	let order_id = place_order(&app).await;

	send(
		&app,
		"PATCH",
		&format!("/api/orders/{}", order_id),
		Some("key-a1"),
		Some(json!({"distributorStatus": "APPROVED"})),
	)
	.await;

	// APPROVED -> SHIPPED directly, skipping consolidation and allocation
	let (status, body) = send(
		&app,
		"PATCH",
		&format!("/api/orders/{}", order_id),
		Some("key-a1"),
		Some(json!({"distributorStatus": "SHIPPED"})),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["workflow"]["distributorStatus"], json!("SHIPPED"));
}

#[tokio::test]
async fn repeated_transition_is_idempotent() {
	let app = app();
	let order_id = place_order(&app).await;
	let patch = json!({"distributorStatus": "APPROVED"});

	for _ in 0..2 {
		let (status, body) = send(
			&app,
			"PATCH",
			&format!("/api/orders/{}", order_id),
			Some("key-d1"),
			Some(patch.clone()),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["data"]["workflow"]["distributorStatus"], json!("APPROVED"));
	}
}

#[tokio::test]
async fn unknown_workflow_status_is_a_validation_error() {
	let app = app();
	let order_id = place_order(&app).await;

	let (status, body) = send(
		&app,
		"PATCH",
		&format!("/api/orders/{}", order_id),
		Some("key-d1"),
		Some(json!({"distributorStatus": "IN_TRANSIT"})),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["success"], json!(false));
	assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn unknown_order_is_not_found() {
	let app = app();
	let (status, body) = send(
		&app,
		"PATCH",
		"/api/orders/0e9d4a8c-0000-0000-0000-000000000000",
		Some("key-d1"),
		Some(json!({"distributorStatus": "APPROVED"})),
	)
	.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn order_listing_is_scoped_by_account() {
	let app = app();
	place_order(&app).await;

	// Assigned distributor sees the order
	let (status, body) = send(&app, "GET", "/api/orders", Some("key-d1"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"].as_array().unwrap().len(), 1);

	// The other distributor sees nothing
	let (_, body) = send(&app, "GET", "/api/orders", Some("key-d2"), None).await;
	assert!(body["data"].as_array().unwrap().is_empty());

	// Admin sees everything
	let (_, body) = send(&app, "GET", "/api/orders", Some("key-a1"), None).await;
	assert_eq!(body["data"].as_array().unwrap().len(), 1);

	// Retailers are not a fulfillment role
	let (status, body) = send(&app, "GET", "/api/orders", Some("key-r1"), None).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	assert_eq!(body["error"], json!("FORBIDDEN"));
}

#[tokio::test]
async fn cancellation_is_one_way() {
	let app = app();
	let order_id = place_order(&app).await;

	let (status, body) = send(
		&app,
		"POST",
		&format!("/api/orders/{}/cancel", order_id),
		Some("key-r1"),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["status"], json!("CANCELLED"));

	// Delivering a cancelled order is rejected as an invalid state
	let (status, body) = send(
		&app,
		"POST",
		&format!("/api/orders/{}/deliver", order_id),
		Some("key-r1"),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], json!("INVALID_STATE"));
}

#[tokio::test]
async fn settlement_and_inventory_views_respond_for_fulfillment_roles() {
	let app = app();
	let order_id = place_order(&app).await;
	send(
		&app,
		"PATCH",
		&format!("/api/orders/{}", order_id),
		Some("key-d1"),
		Some(json!({"distributorStatus": "ALLOCATED"})),
	)
	.await;

	let (status, body) = send(&app, "GET", "/api/settlements", Some("key-d1"), None).await;
	assert_eq!(status, StatusCode::OK);
	let rows = body["data"].as_array().unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["retailerId"], json!("R1"));
	assert_eq!(rows[0]["outstanding"], json!("150.00"));
	assert_eq!(rows[0]["openOrders"], json!(1));

	let (status, body) = send(&app, "GET", "/api/inventory", Some("key-d1"), None).await;
	assert_eq!(status, StatusCode::OK);
	let rows = body["data"].as_array().unwrap();
	assert_eq!(rows.len(), 2);
	assert_eq!(rows[0]["productId"], json!("P-AMOX-500"));
	assert_eq!(rows[0]["allocatedQuantity"], json!(10));
	assert_eq!(rows[0]["pendingQuantity"], json!(0));

	// Retailers have no access to the fulfillment views
	let (status, _) = send(&app, "GET", "/api/settlements", Some("key-r1"), None).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn fetching_a_single_order_respects_visibility() {
	let app = app();
	let order_id = place_order(&app).await;

	let (status, body) = send(
		&app,
		"GET",
		&format!("/api/orders/{}", order_id),
		Some("key-r1"),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["retailerId"], json!("R1"));

	// Invisible orders are indistinguishable from missing ones
	let (status, body) = send(
		&app,
		"GET",
		&format!("/api/orders/{}", order_id),
		Some("key-d2"),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error"], json!("NOT_FOUND"));
}
