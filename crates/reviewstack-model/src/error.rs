//! ReviewStack error types.
//!
//! Every failure that reaches the HTTP boundary is a [`ReviewsError`]: a code
//! from the closed [`ReviewsErrorCode`] taxonomy, a message, the HTTP status
//! it maps to and, for validation failures, the structured schema error.

use std::fmt;

use crate::schema::SchemaError;

/// Well-known ReviewStack error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ReviewsErrorCode {
    /// No usable movie id in the request.
    MissingIdentifier,
    /// Movie id present but no usable reviewer name or year.
    MissingDisambiguator,
    /// Body or query string failed its schema.
    ValidationFailed,
    /// The lookup matched nothing.
    NotFound,
    /// A translation was requested for a review without content.
    ContentUnavailable,
    /// The storage backend failed.
    ExecutorError,
    /// The translation service failed.
    TranslationError,
    /// The request body could not be decoded at all.
    SerializationError,
    /// No route matches the request path.
    UnknownRoute,
    /// The path exists but not for this method.
    MethodNotAllowed,
}

impl ReviewsErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingIdentifier => "MissingIdentifier",
            Self::MissingDisambiguator => "MissingDisambiguator",
            Self::ValidationFailed => "ValidationFailed",
            Self::NotFound => "NotFound",
            Self::ContentUnavailable => "ContentUnavailable",
            Self::ExecutorError => "ExecutorError",
            Self::TranslationError => "TranslationError",
            Self::SerializationError => "SerializationError",
            Self::UnknownRoute => "UnknownRoute",
            Self::MethodNotAllowed => "MethodNotAllowed",
        }
    }

    /// Returns the default HTTP status code for this error.
    ///
    /// Missing identifiers are reported as 404, matching how the API has
    /// always answered requests whose path names no resource.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::MissingIdentifier
            | Self::MissingDisambiguator
            | Self::NotFound
            | Self::UnknownRoute => http::StatusCode::NOT_FOUND,
            Self::ValidationFailed | Self::ContentUnavailable | Self::SerializationError => {
                http::StatusCode::BAD_REQUEST
            }
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::ExecutorError | Self::TranslationError => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ReviewsErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ReviewStack error response.
#[derive(Debug)]
pub struct ReviewsError {
    /// The error code.
    pub code: ReviewsErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// Schema failure details, set only for `ValidationFailed`.
    pub schema: Option<SchemaError>,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ReviewsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReviewsError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ReviewsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl ReviewsError {
    /// Create a new `ReviewsError` from an error code.
    #[must_use]
    pub fn new(code: ReviewsErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.as_str().to_owned(),
            code,
            schema: None,
            source: None,
        }
    }

    /// Create a new `ReviewsError` with a custom message.
    #[must_use]
    pub fn with_message(code: ReviewsErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            schema: None,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Request names no usable movie id.
    #[must_use]
    pub fn missing_identifier() -> Self {
        Self::with_message(ReviewsErrorCode::MissingIdentifier, "Missing movie Id")
    }

    /// Request names no usable reviewer name or year.
    #[must_use]
    pub fn missing_disambiguator(message: impl Into<String>) -> Self {
        Self::with_message(ReviewsErrorCode::MissingDisambiguator, message)
    }

    /// Candidate failed its schema.
    #[must_use]
    pub fn validation(schema: SchemaError) -> Self {
        let mut err = Self::with_message(ReviewsErrorCode::ValidationFailed, schema.to_string());
        err.schema = Some(schema);
        err
    }

    /// Nothing matched.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ReviewsErrorCode::NotFound, message)
    }

    /// The review has nothing to translate.
    #[must_use]
    pub fn content_unavailable() -> Self {
        Self::with_message(
            ReviewsErrorCode::ContentUnavailable,
            "Unable to translate as movie review has no content",
        )
    }

    /// Undecodable request body.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::with_message(ReviewsErrorCode::SerializationError, message)
    }

    /// No route for this path.
    #[must_use]
    pub fn unknown_route(path: &str) -> Self {
        Self::with_message(
            ReviewsErrorCode::UnknownRoute,
            format!("No resource at path: {path}"),
        )
    }

    /// Route exists, method does not.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method, path: &str) -> Self {
        Self::with_message(
            ReviewsErrorCode::MethodNotAllowed,
            format!("Method {method} is not allowed on {path}"),
        )
    }

    /// Whether this error maps to a 5xx response.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code.is_server_error()
    }
}
