//! Response payload types.
//!
//! Successful responses wrap their payload as `{"data": ...}`; not-found and
//! bad-request responses carry `{"Message": ...}`; server errors carry
//! `{"error": ...}`.

use serde::Serialize;

use crate::review::MovieReview;

/// Result of a successful operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReviewsOutput {
    /// Exactly one review.
    One(MovieReview),
    /// A non-empty collection of reviews, in backend order.
    Many(Vec<MovieReview>),
}

impl ReviewsOutput {
    /// Number of reviews carried.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    /// Whether no reviews are carried. Never true for values built by the
    /// result shaper.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `{"data": ...}` success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    /// Payload.
    pub data: T,
}

/// `{"Message": ...}` body used for 404 and non-schema 400 responses.
#[derive(Debug, Clone, Serialize)]
pub struct MessageBody<'a> {
    /// Human-readable message.
    #[serde(rename = "Message")]
    pub message: &'a str,
}

/// `{"error": ...}` body used for 5xx responses.
#[derive(Debug, Clone, Serialize)]
pub struct ServerErrorBody<'a> {
    /// Error description.
    pub error: &'a str,
}
