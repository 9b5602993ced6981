//! API endpoint implementations.
//!
//! Each submodule maps one resource of the HTTP surface onto the fulfillment
//! engine and wraps results in the uniform response envelope.

pub mod inventory;
pub mod orders;
pub mod settlements;

use rxflow_core::FulfillmentError;
use rxflow_types::ApiError;

/// Maps core errors onto the API error taxonomy.
///
/// Storage and configuration failures are logged and reported as opaque
/// internal errors; everything else surfaces verbatim to the caller.
pub fn to_api_error(err: FulfillmentError) -> ApiError {
	match err {
		FulfillmentError::Validation(m) => ApiError::Validation(m),
		FulfillmentError::Forbidden(m) => ApiError::Forbidden(m),
		FulfillmentError::NotFound(m) => ApiError::NotFound(m),
		FulfillmentError::InvalidState(m) => ApiError::InvalidState(m),
		FulfillmentError::Storage(m) | FulfillmentError::Config(m) => {
			tracing::error!(error = %m, "Internal failure");
			ApiError::Internal("Internal server error".into())
		},
	}
}
