//! Storage backends for the review table.
//!
//! The table is keyed on `(movieId, reviewerName)` and carries two local
//! secondary indexes sharing the `movieId` partition:
//!
//! ```text
//! primary       movieId / reviewerName
//! reviewDateIx  movieId / reviewDate
//! ratingIx      movieId / rating
//! ```
//!
//! Everything the executor sends to a backend is first described as a
//! [`StoreRequest`], so the access pattern can be logged and asserted on
//! independently of the backend that serves it.

use std::fmt;

use async_trait::async_trait;

use reviewstack_model::{MovieReview, ReviewKey};

use crate::error::ExecutorError;

pub mod dynamodb;
pub mod memory;

pub use dynamodb::DynamoDbReviewTable;
pub use memory::InMemoryReviewTable;

/// Name of the local secondary index sorted by review date.
pub const REVIEW_DATE_INDEX: &str = "reviewDateIx";
/// Name of the local secondary index sorted by rating.
pub const RATING_INDEX: &str = "ratingIx";

/// Which ordering of a partition a query walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableIndex {
    /// The table itself, ordered by reviewer name.
    Primary,
    /// `reviewDateIx`.
    ReviewDate,
    /// `ratingIx`.
    Rating,
}

impl TableIndex {
    /// The index name to send to the backend, `None` for the table itself.
    #[must_use]
    pub fn index_name(&self) -> Option<&'static str> {
        match self {
            Self::Primary => None,
            Self::ReviewDate => Some(REVIEW_DATE_INDEX),
            Self::Rating => Some(RATING_INDEX),
        }
    }

    /// The attribute this index is sorted by.
    #[must_use]
    pub fn sort_attribute(&self) -> &'static str {
        use reviewstack_model::review::{RATING, REVIEW_DATE, REVIEWER_NAME};
        match self {
            Self::Primary => REVIEWER_NAME,
            Self::ReviewDate => REVIEW_DATE,
            Self::Rating => RATING,
        }
    }
}

/// Condition on an index sort key.
#[derive(Debug, Clone, PartialEq)]
pub enum SortCondition {
    /// String sort key starts with the prefix.
    BeginsWith(String),
    /// Numeric sort key is at least the value.
    Ge(f64),
}

/// A single-partition query.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    /// Index to walk.
    pub index: TableIndex,
    /// Partition key value.
    pub movie_id: i64,
    /// Optional narrowing on the index sort key.
    pub sort: Option<SortCondition>,
}

impl KeyCondition {
    /// Every review in a partition, in reviewer-name order.
    #[must_use]
    pub fn partition(movie_id: i64) -> Self {
        Self {
            index: TableIndex::Primary,
            movie_id,
            sort: None,
        }
    }

    /// Reviews in a partition whose date starts with `year`, in date order.
    #[must_use]
    pub fn review_year(movie_id: i64, year: u32) -> Self {
        Self {
            index: TableIndex::ReviewDate,
            movie_id,
            sort: Some(SortCondition::BeginsWith(year.to_string())),
        }
    }

    /// Reviews in a partition rated at least `min_rating`, in rating order.
    #[must_use]
    pub fn min_rating(movie_id: i64, min_rating: f64) -> Self {
        Self {
            index: TableIndex::Rating,
            movie_id,
            sort: Some(SortCondition::Ge(min_rating)),
        }
    }
}

/// Post-filter applied to a full-table scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    /// Keep only items with this reviewer name.
    pub reviewer_name: String,
}

/// A declarative description of one backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    /// Point lookup by primary key.
    Get(ReviewKey),
    /// Single-partition query.
    Query(KeyCondition),
    /// Full scan with a post-filter.
    Scan(ScanFilter),
    /// Upsert by primary key.
    Put(MovieReview),
}

impl fmt::Display for StoreRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get(key) => write!(f, "Get({key})"),
            Self::Query(cond) => {
                write!(
                    f,
                    "Query({} movieId = {}",
                    cond.index.index_name().unwrap_or("table"),
                    cond.movie_id
                )?;
                match &cond.sort {
                    Some(SortCondition::BeginsWith(prefix)) => write!(
                        f,
                        " and begins_with({}, {prefix:?})",
                        cond.index.sort_attribute()
                    )?,
                    Some(SortCondition::Ge(value)) => {
                        write!(f, " and {} >= {value}", cond.index.sort_attribute())?;
                    }
                    None => {}
                }
                f.write_str(")")
            }
            Self::Scan(filter) => write!(f, "Scan(reviewerName = {:?})", filter.reviewer_name),
            Self::Put(review) => write!(f, "Put({})", review.key()),
        }
    }
}

/// A table holding movie reviews.
///
/// Implementations are constructed once by the entry point and shared
/// behind an `Arc`.
#[async_trait]
pub trait ReviewStore: Send + Sync + fmt::Debug {
    /// Fetch one review by primary key.
    async fn get_item(&self, key: &ReviewKey) -> Result<Option<MovieReview>, ExecutorError>;

    /// Run a single-partition query, returning items in index order.
    async fn query(&self, condition: &KeyCondition) -> Result<Vec<MovieReview>, ExecutorError>;

    /// Scan the whole table, keeping items that match the filter.
    async fn scan(&self, filter: &ScanFilter) -> Result<Vec<MovieReview>, ExecutorError>;

    /// Insert or overwrite a review.
    async fn put_item(&self, review: MovieReview) -> Result<(), ExecutorError>;
}
