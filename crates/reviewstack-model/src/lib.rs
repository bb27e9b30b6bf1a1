//! Model types for ReviewStack.
//!
//! This crate holds everything that crosses a crate boundary: the
//! [`MovieReview`] entity, the normalized [`RequestDescriptor`] built by the
//! HTTP layer, the [`ReviewsOperation`] enum, the wire error type and the
//! structured schema errors returned by validation.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod operations;
pub mod output;
pub mod request;
pub mod review;
pub mod schema;

pub use error::{ReviewsError, ReviewsErrorCode};
pub use operations::ReviewsOperation;
pub use request::{LookupRequest, PathParams, RequestDescriptor, RequestKind};
pub use review::{MovieReview, ReviewKey};
pub use schema::{SchemaError, SchemaViolation};
