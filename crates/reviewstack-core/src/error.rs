//! Component error types and their mapping onto the wire error.

use thiserror::Error;

use reviewstack_model::error::{ReviewsError, ReviewsErrorCode};

/// Planner failures. Both are detected before any backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// No movie id, or one that is not an integer.
    #[error("Missing movie Id")]
    MissingIdentifier,
    /// No usable secondary parameter.
    #[error("{0}")]
    MissingDisambiguator(&'static str),
}

/// Storage backend failures. Surfaced unmodified, never retried.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The backend could not be reached or answered with a service error.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    /// The backend returned an item that does not decode as a review.
    #[error("malformed item from storage backend: {0}")]
    MalformedItem(String),
}

/// Translation service failures.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// The request never produced a response.
    #[error("translation request failed: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("translation service returned {status}: {body}")]
    Service {
        /// HTTP status returned.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },
    /// The service answered 2xx with a body we cannot read.
    #[error("malformed translation response: {0}")]
    MalformedResponse(String),
}

/// Convert a planner error into a wire error.
///
/// Takes `e` by value because this is used as a closure argument to `.map_err()`.
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn plan_error_to_reviews(e: PlanError) -> ReviewsError {
    match e {
        PlanError::MissingIdentifier => ReviewsError::missing_identifier(),
        PlanError::MissingDisambiguator(msg) => ReviewsError::missing_disambiguator(msg),
    }
}

/// Convert a storage error into a wire error.
#[must_use]
pub fn executor_error_to_reviews(e: ExecutorError) -> ReviewsError {
    ReviewsError::with_message(ReviewsErrorCode::ExecutorError, e.to_string()).with_source(e)
}

/// Convert a translation error into a wire error.
#[must_use]
pub fn translation_error_to_reviews(e: TranslationError) -> ReviewsError {
    ReviewsError::with_message(ReviewsErrorCode::TranslationError, e.to_string()).with_source(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_plan_errors_to_not_found_codes() {
        let err = plan_error_to_reviews(PlanError::MissingIdentifier);
        assert_eq!(err.code, ReviewsErrorCode::MissingIdentifier);
        assert_eq!(err.message, "Missing movie Id");

        let err = plan_error_to_reviews(PlanError::MissingDisambiguator("Missing reviewer name"));
        assert_eq!(err.code, ReviewsErrorCode::MissingDisambiguator);
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_should_keep_executor_error_as_source() {
        let err = executor_error_to_reviews(ExecutorError::Unavailable("timeout".to_owned()));
        assert_eq!(err.code, ReviewsErrorCode::ExecutorError);
        assert!(err.is_server_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
