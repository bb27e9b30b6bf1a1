//! Review HTTP service implementing the hyper `Service` trait.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;

use reviewstack_model::error::ReviewsError;
use reviewstack_model::request::RequestDescriptor;

use crate::body::ReviewsResponseBody;
use crate::dispatch::{ReviewsHandler, dispatch_operation};
use crate::response::{CONTENT_TYPE, REQUEST_ID_HEADER, error_to_response};
use crate::router::resolve_route;

/// Hyper `Service` implementation for the review API.
///
/// Wraps a [`ReviewsHandler`] implementation, routes incoming requests and
/// hands the handler a normalized [`RequestDescriptor`].
#[derive(Debug)]
pub struct ReviewsHttpService<H: ReviewsHandler> {
    handler: Arc<H>,
}

impl<H: ReviewsHandler> ReviewsHttpService<H> {
    /// Create a new `ReviewsHttpService`.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }
}

impl<H: ReviewsHandler> Clone for ReviewsHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<H: ReviewsHandler> hyper::service::Service<http::Request<Incoming>> for ReviewsHttpService<H> {
    type Response = http::Response<ReviewsResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, handler.as_ref()).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process a single request through route, decode and dispatch.
pub async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
) -> http::Response<ReviewsResponseBody>
where
    H: ReviewsHandler,
    B: http_body::Body<Data = Bytes> + Send,
    B::Error: Display,
{
    let (parts, incoming) = req.into_parts();

    // 1. Route on method and path.
    let route = match resolve_route(&parts.method, parts.uri.path()) {
        Ok(route) => route,
        Err(err) => return error_to_response(&err),
    };

    // 2. Collect and decode the body.
    let body = match collect_body(incoming).await.and_then(|b| decode_body(&b)) {
        Ok(body) => body,
        Err(err) => return error_to_response(&err),
    };

    let request = RequestDescriptor {
        path: route.params,
        query: parts.uri.query().map(parse_query),
        body,
    };

    // 3. Dispatch to handler.
    match dispatch_operation(handler, route.operation, request).await {
        Ok(response) => response,
        Err(err) => error_to_response(&err),
    }
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body<B>(incoming: B) -> Result<Bytes, ReviewsError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Display,
{
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| ReviewsError::serialization(format!("Failed to read request body: {e}")))
}

/// Decode a JSON body; an empty body is no body.
fn decode_body(body: &[u8]) -> Result<Option<serde_json::Value>, ReviewsError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ReviewsError::serialization(format!("Failed to parse request body: {e}")))
}

/// Parse a query string into a map. Later duplicates win.
fn parse_query(query: &str) -> HashMap<String, String> {
    form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<ReviewsResponseBody>,
    request_id: &str,
) -> http::Response<ReviewsResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry(REQUEST_ID_HEADER).or_insert(hv);
    }

    headers
        .entry(http::header::CONTENT_TYPE)
        .or_insert(http::HeaderValue::from_static(CONTENT_TYPE));

    headers.insert("server", http::HeaderValue::from_static("ReviewStack"));

    headers.insert(
        "access-control-allow-origin",
        http::HeaderValue::from_static("*"),
    );

    response
}
