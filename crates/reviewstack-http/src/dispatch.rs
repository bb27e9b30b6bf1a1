//! Handler trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use reviewstack_model::error::ReviewsError;
use reviewstack_model::operations::ReviewsOperation;
use reviewstack_model::request::RequestDescriptor;

use crate::body::ReviewsResponseBody;

/// Future returned by [`ReviewsHandler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<ReviewsResponseBody>, ReviewsError>> + Send>>;

/// Trait that the review business logic must implement.
///
/// The handler receives the resolved operation and a normalized request
/// descriptor, and returns a complete HTTP response.
pub trait ReviewsHandler: Send + Sync + 'static {
    /// Handle a review operation and produce an HTTP response.
    fn handle_operation(&self, op: ReviewsOperation, request: RequestDescriptor) -> HandlerFuture;
}

/// Dispatch a review operation to the handler.
pub async fn dispatch_operation<H: ReviewsHandler>(
    handler: &H,
    op: ReviewsOperation,
    request: RequestDescriptor,
) -> Result<http::Response<ReviewsResponseBody>, ReviewsError> {
    tracing::debug!(operation = %op, "dispatching review operation");
    handler.handle_operation(op, request).await
}
