//! Integration tests for the ReviewStack server.
//!
//! These tests require a running server at `localhost:3000` with the
//! in-memory backend. Translation tests additionally need a reachable
//! translation service. They are marked `#[ignore]` so they don't run
//! during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p reviewstack-integration -- --ignored
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the server under test.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("REVIEWSTACK_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Create an HTTP client for the server under test.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Absolute URL for a path on the server under test.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", endpoint_url())
}

/// A movie id no other test run will use.
#[must_use]
pub fn test_movie_id() -> i64 {
    let bytes = uuid::Uuid::new_v4().as_u64_pair().0;
    // Keep it positive and well inside i64.
    i64::try_from(bytes >> 20).unwrap_or(1)
}

/// A reviewer name no other test run will use.
#[must_use]
pub fn test_reviewer_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_owned();
    format!("{prefix}-{id}")
}

/// Create a review and return the server's response body.
pub async fn create_review(
    client: &reqwest::Client,
    movie_id: i64,
    reviewer_name: &str,
    rating: f64,
    content: &str,
) -> serde_json::Value {
    let resp = client
        .post(url("/movies"))
        .json(&serde_json::json!({
            "movieId": movie_id,
            "reviewerName": reviewer_name,
            "rating": rating,
            "content": content,
        }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create review {movie_id}/{reviewer_name}: {e}"));
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    resp.json().await.unwrap()
}

mod test_errors;
mod test_reviews;
mod test_translation;
