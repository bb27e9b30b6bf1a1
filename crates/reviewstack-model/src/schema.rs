//! Structured validation errors.
//!
//! A [`SchemaError`] is what a client gets back on a 400: the name of the
//! schema it violated, a description of that schema's fields, and the
//! individual violations found.

use serde::Serialize;

/// JSON type expected for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Whole number (numeric strings are coerced).
    Integer,
    /// Any number (numeric strings are coerced).
    Number,
    /// String.
    String,
}

/// One field of a request schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field name as it appears on the wire.
    pub name: &'static str,
    /// Expected type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field must be present.
    pub required: bool,
}

impl FieldDescriptor {
    /// A required field.
    #[must_use]
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
        }
    }

    /// An optional field.
    #[must_use]
    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
        }
    }
}

/// A single reason a candidate failed its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Offending field, or `""` for the object as a whole.
    pub field: String,
    /// Human-readable reason.
    pub reason: String,
}

impl SchemaViolation {
    /// Create a violation.
    #[must_use]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Validation failure echoed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaError {
    /// Schema name, e.g. `MovieReview`.
    pub schema: &'static str,
    /// The fields the schema accepts.
    pub properties: Vec<FieldDescriptor>,
    /// What was wrong with the candidate. Never empty.
    pub violations: Vec<SchemaViolation>,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "request does not match schema {}", self.schema)?;
        for v in &self.violations {
            if v.field.is_empty() {
                write!(f, "; {}", v.reason)?;
            } else {
                write!(f, "; {}: {}", v.field, v.reason)?;
            }
        }
        Ok(())
    }
}
