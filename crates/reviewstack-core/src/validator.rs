//! Request validation.
//!
//! Each [`RequestKind`] maps to a fixed list of field descriptors. A candidate
//! is a decoded JSON value; query strings are lifted into a JSON object of
//! strings first so both go through the same checks. Numeric fields accept
//! numeric strings, which is what makes query-string values like
//! `minRating=3` validate.

use std::collections::HashMap;

use reviewstack_model::ReviewKey;
use reviewstack_model::request::RequestKind;
use reviewstack_model::review::{CONTENT, MOVIE_ID, RATING, REVIEW_DATE, REVIEWER_NAME};
use reviewstack_model::schema::{FieldDescriptor, FieldType, SchemaError, SchemaViolation};

/// Query-string key for the rating filter.
pub const MIN_RATING: &str = "minRating";
/// Query-string key for the translation target language.
pub const LANGUAGE: &str = "language";

/// Largest magnitude a stored number may have.
const MAX_NUMBER_MAGNITUDE: f64 = 9.999_999_999_999_999e125;
/// Smallest non-zero magnitude a stored number may have.
const MIN_NUMBER_MAGNITUDE: f64 = 1e-130;

const CREATE_REVIEW_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::required(MOVIE_ID, FieldType::Integer),
    FieldDescriptor::required(REVIEWER_NAME, FieldType::String),
    FieldDescriptor::optional(REVIEW_DATE, FieldType::String),
    FieldDescriptor::required(CONTENT, FieldType::String),
    FieldDescriptor::required(RATING, FieldType::Number),
];

const UPDATE_REVIEW_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::optional(MOVIE_ID, FieldType::Integer),
    FieldDescriptor::optional(REVIEWER_NAME, FieldType::String),
    FieldDescriptor::optional(REVIEW_DATE, FieldType::String),
    FieldDescriptor::required(CONTENT, FieldType::String),
    FieldDescriptor::required(RATING, FieldType::Number),
];

const MOVIE_REVIEWS_QUERY_FIELDS: &[FieldDescriptor] =
    &[FieldDescriptor::optional(MIN_RATING, FieldType::Number)];

const TRANSLATION_QUERY_FIELDS: &[FieldDescriptor] =
    &[FieldDescriptor::required(LANGUAGE, FieldType::String)];

/// Outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The candidate matches, or was absent.
    Valid,
    /// The candidate does not match; carries the schema to echo back.
    Invalid(SchemaError),
}

impl ValidationResult {
    /// Convert into a `Result`, for use with `?`.
    pub fn into_result(self) -> Result<(), SchemaError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(e) => Err(e),
        }
    }

    /// Whether the candidate passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// The field descriptors making up a request kind's schema.
#[must_use]
pub fn properties(kind: RequestKind) -> &'static [FieldDescriptor] {
    match kind {
        RequestKind::CreateReview => CREATE_REVIEW_FIELDS,
        RequestKind::UpdateReview => UPDATE_REVIEW_FIELDS,
        RequestKind::MovieReviewsQuery => MOVIE_REVIEWS_QUERY_FIELDS,
        RequestKind::TranslationQuery => TRANSLATION_QUERY_FIELDS,
    }
}

/// Validate a candidate against the schema for `kind`.
///
/// An absent candidate is vacuously valid: callers pass `None` when the
/// request carried no body or no query string.
#[must_use]
pub fn validate(kind: RequestKind, candidate: Option<&serde_json::Value>) -> ValidationResult {
    let Some(candidate) = candidate else {
        return ValidationResult::Valid;
    };

    let violations = check_fields(properties(kind), candidate);
    into_validation_result(kind, violations)
}

/// Validate an update body against the key named by the request path.
///
/// Key fields are optional in the body, but when present they must agree
/// with the path.
#[must_use]
pub fn validate_update_key(body: &serde_json::Value, key: &ReviewKey) -> ValidationResult {
    let mut violations = Vec::new();
    if let Some(movie_id) = body.get(MOVIE_ID).and_then(as_integer) {
        if movie_id != key.movie_id {
            violations.push(SchemaViolation::new(
                MOVIE_ID,
                format!("must match the movie id in the path ({})", key.movie_id),
            ));
        }
    }
    if let Some(name) = body.get(REVIEWER_NAME).and_then(serde_json::Value::as_str) {
        if name != key.reviewer_name {
            violations.push(SchemaViolation::new(
                REVIEWER_NAME,
                format!(
                    "must match the reviewer name in the path ({})",
                    key.reviewer_name
                ),
            ));
        }
    }
    into_validation_result(RequestKind::UpdateReview, violations)
}

/// Lift a query-string map into a JSON object of strings.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn query_to_value(query: &HashMap<String, String>) -> serde_json::Value {
    serde_json::Value::Object(
        query
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
    )
}

/// Read a JSON value as an integer, accepting integral numbers and
/// integer strings.
#[must_use]
pub fn as_integer(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let i = f as i64;
            #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
            let integral = f.is_finite() && f.fract() == 0.0 && i as f64 == f;
            integral.then_some(i)
        }),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Read a JSON value as a finite number, accepting numeric strings.
#[must_use]
pub fn as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn into_validation_result(kind: RequestKind, violations: Vec<SchemaViolation>) -> ValidationResult {
    if violations.is_empty() {
        ValidationResult::Valid
    } else {
        tracing::debug!(
            schema = kind.schema_name(),
            violations = violations.len(),
            "request failed validation"
        );
        ValidationResult::Invalid(SchemaError {
            schema: kind.schema_name(),
            properties: properties(kind).to_vec(),
            violations,
        })
    }
}

fn check_fields(fields: &[FieldDescriptor], candidate: &serde_json::Value) -> Vec<SchemaViolation> {
    let Some(object) = candidate.as_object() else {
        return vec![SchemaViolation::new("", "must be an object")];
    };

    let mut violations = Vec::new();

    for field in fields {
        match object.get(field.name) {
            None => {
                if field.required {
                    violations.push(SchemaViolation::new(field.name, "is required"));
                }
            }
            Some(value) => {
                if let Some(reason) = check_type(field, value) {
                    violations.push(SchemaViolation::new(field.name, reason));
                }
            }
        }
    }

    for name in object.keys() {
        if !fields.iter().any(|f| f.name == name.as_str()) {
            violations.push(SchemaViolation::new(name.as_str(), "is not an allowed property"));
        }
    }

    violations
}

#[allow(clippy::float_cmp)]
fn in_number_range(n: f64) -> bool {
    let magnitude = n.abs();
    magnitude == 0.0 || (MIN_NUMBER_MAGNITUDE..=MAX_NUMBER_MAGNITUDE).contains(&magnitude)
}

fn check_type(field: &FieldDescriptor, value: &serde_json::Value) -> Option<&'static str> {
    match field.field_type {
        FieldType::Integer => as_integer(value).is_none().then_some("must be an integer"),
        FieldType::Number => match as_number(value) {
            None => Some("must be a number"),
            Some(n) if !in_number_range(n) => Some("is out of range"),
            Some(_) => None,
        },
        FieldType::String => match value.as_str() {
            None => Some("must be a string"),
            // Key-like strings must carry a value; free text may be empty.
            Some(s) if s.trim().is_empty() && field.name != CONTENT => {
                Some("must not be empty")
            }
            Some(_) => None,
        },
    }
}
