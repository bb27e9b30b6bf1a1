//! REST HTTP service layer for ReviewStack.
//!
//! This crate turns HTTP requests into review operations:
//!
//! - **Router**: maps method and path onto a [`ReviewsOperation`] and its raw
//!   path segments
//! - **Handler trait**: the boundary between HTTP and business logic
//! - **Service**: hyper `Service` that builds the request descriptor
//! - **Response helpers**: JSON success and error response formatting
//!
//! [`ReviewsOperation`]: reviewstack_model::ReviewsOperation
#![allow(missing_docs)]

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use body::ReviewsResponseBody;
pub use dispatch::ReviewsHandler;
pub use service::ReviewsHttpService;
