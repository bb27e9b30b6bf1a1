//! Review handler bridging HTTP to the provider.

use std::sync::Arc;

use reviewstack_http::dispatch::{HandlerFuture, ReviewsHandler};
use reviewstack_http::response::data_response;
use reviewstack_model::operations::ReviewsOperation;
use reviewstack_model::request::RequestDescriptor;

use crate::provider::MovieReviewsProvider;

/// Handler that bridges the HTTP layer to the review provider.
#[derive(Debug)]
pub struct MovieReviewsHandler {
    provider: Arc<MovieReviewsProvider>,
}

impl MovieReviewsHandler {
    /// Create a new handler wrapping a provider.
    #[must_use]
    pub fn new(provider: Arc<MovieReviewsProvider>) -> Self {
        Self { provider }
    }
}

impl ReviewsHandler for MovieReviewsHandler {
    fn handle_operation(&self, op: ReviewsOperation, request: RequestDescriptor) -> HandlerFuture {
        let provider = Arc::clone(&self.provider);
        Box::pin(async move {
            let output = provider.handle(op, &request).await?;
            data_response(&output)
        })
    }
}
