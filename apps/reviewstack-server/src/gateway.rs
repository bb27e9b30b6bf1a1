//! Gateway service in front of the review API.
//!
//! Health-check endpoints (`/_health`, `/health`) are answered here; every
//! other request falls through to the review service.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use hyper::body::Incoming;
use hyper::service::Service;

use reviewstack_http::dispatch::ReviewsHandler;
use reviewstack_http::response::{REQUEST_ID_HEADER, json_response};
use reviewstack_http::{ReviewsHttpService, ReviewsResponseBody};

/// Gateway that answers health checks and forwards everything else.
#[derive(Debug)]
pub struct GatewayService<H: ReviewsHandler> {
    reviews: ReviewsHttpService<H>,
    backend: &'static str,
}

impl<H: ReviewsHandler> GatewayService<H> {
    /// Create a new gateway wrapping the review service.
    pub fn new(reviews: ReviewsHttpService<H>, backend: &'static str) -> Self {
        Self { reviews, backend }
    }
}

impl<H: ReviewsHandler> Clone for GatewayService<H> {
    fn clone(&self) -> Self {
        Self {
            reviews: self.reviews.clone(),
            backend: self.backend,
        }
    }
}

impl<H: ReviewsHandler> Service<http::Request<Incoming>> for GatewayService<H> {
    type Response = http::Response<ReviewsResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        if is_health_check(req.method(), req.uri().path()) {
            let resp = health_check_response(self.backend);
            return Box::pin(async { Ok(resp) });
        }

        self.reviews.call(req)
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_health" || path == "/health")
}

/// Produce the health check response.
fn health_check_response(backend: &str) -> http::Response<ReviewsResponseBody> {
    let body = serde_json::json!({
        "status": "running",
        "storage": backend,
        "version": crate::VERSION,
    });
    let mut resp = json_response(http::StatusCode::OK, body.to_string().into_bytes());
    if let Ok(hv) = http::HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, hv);
    }
    resp
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[test]
    fn test_should_detect_health_check_paths() {
        assert!(is_health_check(&http::Method::GET, "/_health"));
        assert!(is_health_check(&http::Method::GET, "/health"));
        assert!(!is_health_check(&http::Method::POST, "/_health"));
        assert!(!is_health_check(&http::Method::GET, "/movies/1/reviews"));
    }

    #[tokio::test]
    async fn test_should_produce_health_check_response() {
        let resp = health_check_response("memory");
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json"),
        );
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["storage"], "memory");
    }
}
