//! Startup seeding from a JSON file of reviews.

use std::path::Path;

use anyhow::Context;
use tracing::info;

use reviewstack_model::MovieReview;

use crate::storage::ReviewStore;

/// Parse a JSON array of reviews.
pub fn parse_seed(bytes: &[u8]) -> anyhow::Result<Vec<MovieReview>> {
    serde_json::from_slice(bytes).context("seed file must be a JSON array of movie reviews")
}

/// Upsert every review in `path` through `store`.
///
/// Returns the number of reviews written. Stops at the first failed write.
pub async fn seed_from_file(store: &dyn ReviewStore, path: &Path) -> anyhow::Result<usize> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let reviews = parse_seed(&bytes)?;
    let count = reviews.len();

    for review in reviews {
        let key = review.key();
        store
            .put_item(review)
            .await
            .with_context(|| format!("failed to seed review {key}"))?;
    }

    info!(path = %path.display(), count, "seeded review table");
    Ok(count)
}
