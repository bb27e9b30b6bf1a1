//! Response serialization and error formatting.

use serde::Serialize;

use reviewstack_model::error::{ReviewsError, ReviewsErrorCode};
use reviewstack_model::output::{DataEnvelope, MessageBody, ServerErrorBody};

use crate::body::ReviewsResponseBody;

/// Content type of every response.
pub const CONTENT_TYPE: &str = "application/json";

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Serialize a review error into its JSON body.
///
/// - validation failures echo the structured schema error,
/// - server errors use `{"error": ...}`,
/// - everything else uses `{"Message": ...}`.
#[must_use]
pub fn error_to_json(error: &ReviewsError) -> Vec<u8> {
    let result = match (&error.code, &error.schema) {
        (ReviewsErrorCode::ValidationFailed, Some(schema)) => serde_json::to_vec(schema),
        _ if error.is_server_error() => serde_json::to_vec(&ServerErrorBody {
            error: &error.message,
        }),
        _ => serde_json::to_vec(&MessageBody {
            message: &error.message,
        }),
    };
    result.expect("JSON serialization of error cannot fail")
}

/// Convert a `ReviewsError` into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &ReviewsError) -> http::Response<ReviewsResponseBody> {
    if error.is_server_error() {
        tracing::error!(code = %error.code, error = %error, "request failed");
    } else {
        tracing::debug!(code = %error.code, message = %error.message, "request rejected");
    }
    json_response(error.status_code, error_to_json(error))
}

/// Build a response from JSON bytes.
#[must_use]
pub fn json_response(
    status: http::StatusCode,
    json: Vec<u8>,
) -> http::Response<ReviewsResponseBody> {
    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .body(ReviewsResponseBody::from_json(json))
        .expect("valid JSON response")
}

/// Wrap a payload as `{"data": ...}` in a 200 response.
pub fn data_response<T: Serialize>(
    data: &T,
) -> Result<http::Response<ReviewsResponseBody>, ReviewsError> {
    let json = serde_json::to_vec(&DataEnvelope { data }).map_err(|e| {
        ReviewsError::with_message(
            ReviewsErrorCode::SerializationError,
            format!("Failed to serialize response: {e}"),
        )
    })?;
    Ok(json_response(http::StatusCode::OK, json))
}
