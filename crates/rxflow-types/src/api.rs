//! API types for the rxflow HTTP surface.
//!
//! This module defines the request bodies, the uniform response envelope and
//! the structured API error type with its HTTP status mapping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{LineItem, WorkflowStatus};

/// Uniform response envelope returned by every endpoint.
///
/// Success responses carry `data`; failures carry `error` (a stable code)
/// and `message` (human-readable detail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
	/// Whether the request was processed successfully.
	pub success: bool,
	/// Payload for successful responses.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	/// Stable error code for failures.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Human-readable detail, present on failures and some successes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl<T> ApiResponse<T> {
	/// Builds a success envelope around a payload.
	pub fn ok(data: T) -> Self {
		Self {
			success: true,
			data: Some(data),
			error: None,
			message: None,
		}
	}

	/// Builds a success envelope with an additional message.
	pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
		Self {
			success: true,
			data: Some(data),
			error: None,
			message: Some(message.into()),
		}
	}
}

impl ApiResponse<()> {
	/// Builds a failure envelope from an error code and message.
	pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			success: false,
			data: None,
			error: Some(error.into()),
			message: Some(message.into()),
		}
	}
}

/// Request body for placing a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
	/// Line items of the new order; must be non-empty.
	pub items: Vec<LineItem>,
	/// Claimed net amount; must equal the sum of line subtotals.
	pub net_amount: Decimal,
	/// Distributor the order is assigned to, if already known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub distributor_id: Option<String>,
}

/// Request body for a workflow transition (`PATCH /orders/{id}`).
///
/// The workflow status is deserialized into the closed enum, so values
/// outside the five-member enumeration are rejected at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowRequest {
	/// Requested new workflow sub-state.
	pub distributor_status: WorkflowStatus,
	/// Optional notes overwriting the current ones.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

/// Structured API error with its HTTP status mapping.
///
/// Every failure surfaced to a caller is one of these classes; nothing is
/// retried and nothing is suppressed inside the core.
#[derive(Debug, Clone)]
pub enum ApiError {
	/// Malformed input (bad enum value, missing field, broken invariant) — 400.
	Validation(String),
	/// Missing or unknown identity — 401.
	Unauthenticated(String),
	/// Authenticated but lacking role or ownership — 403.
	Forbidden(String),
	/// Referenced order does not exist or is not visible — 404.
	NotFound(String),
	/// Transition rejected by the workflow validator — reported as a
	/// validation-class failure, 400.
	InvalidState(String),
	/// Unexpected or storage failure — 500, logged, caller must resubmit.
	Internal(String),
}

impl ApiError {
	/// HTTP status code for this error class.
	pub fn status_code(&self) -> u16 {
		match self {
			ApiError::Validation(_) | ApiError::InvalidState(_) => 400,
			ApiError::Unauthenticated(_) => 401,
			ApiError::Forbidden(_) => 403,
			ApiError::NotFound(_) => 404,
			ApiError::Internal(_) => 500,
		}
	}

	/// Stable error code placed in the envelope's `error` field.
	pub fn error_code(&self) -> &'static str {
		match self {
			ApiError::Validation(_) => "VALIDATION_ERROR",
			ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
			ApiError::Forbidden(_) => "FORBIDDEN",
			ApiError::NotFound(_) => "NOT_FOUND",
			ApiError::InvalidState(_) => "INVALID_STATE",
			ApiError::Internal(_) => "INTERNAL_ERROR",
		}
	}

	/// Converts to the failure envelope for JSON serialization.
	pub fn to_envelope(&self) -> ApiResponse<()> {
		ApiResponse::failure(self.error_code(), self.to_string())
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::Validation(m)
			| ApiError::Unauthenticated(m)
			| ApiError::Forbidden(m)
			| ApiError::NotFound(m)
			| ApiError::InvalidState(m)
			| ApiError::Internal(m) => write!(f, "{}", m),
		}
	}
}

impl std::error::Error for ApiError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self.to_envelope())).into_response()
	}
}
