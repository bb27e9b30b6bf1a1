//! Query execution.
//!
//! The executor owns the only I/O boundary of the read path. A strategy is
//! first described as a [`StoreRequest`] and then issued against the
//! injected [`ReviewStore`]. Backend errors are returned as-is; nothing is
//! retried.

use std::sync::Arc;

use tracing::debug;

use reviewstack_model::{MovieReview, ReviewKey};

use crate::error::ExecutorError;
use crate::planner::Strategy;
use crate::storage::{KeyCondition, ReviewStore, ScanFilter, StoreRequest};

/// How many items a strategy can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one item; shaped as a single object.
    Single,
    /// Any number of items; shaped as a list.
    Multiple,
}

/// Raw executor output, before shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Items in backend order.
    pub items: Vec<MovieReview>,
    /// Shape hint for the result shaper.
    pub cardinality: Cardinality,
}

/// Runs strategies and writes against a review store.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    store: Arc<dyn ReviewStore>,
}

impl QueryExecutor {
    /// Create an executor over a shared store.
    #[must_use]
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }

    /// The backend request a strategy maps to.
    #[must_use]
    pub fn describe(strategy: &Strategy) -> StoreRequest {
        match strategy {
            Strategy::PointLookup {
                movie_id,
                reviewer_name,
            } => StoreRequest::Get(ReviewKey::new(*movie_id, reviewer_name.clone())),
            Strategy::RangeByYear { movie_id, year } => {
                StoreRequest::Query(KeyCondition::review_year(*movie_id, *year))
            }
            Strategy::RangeByMovie {
                movie_id,
                min_rating: None,
            } => StoreRequest::Query(KeyCondition::partition(*movie_id)),
            Strategy::RangeByMovie {
                movie_id,
                min_rating: Some(min_rating),
            } => StoreRequest::Query(KeyCondition::min_rating(*movie_id, *min_rating)),
            Strategy::UnindexedScanByReviewer { reviewer_name } => {
                StoreRequest::Scan(ScanFilter {
                    reviewer_name: reviewer_name.clone(),
                })
            }
        }
    }

    /// Run a read strategy.
    pub async fn execute(&self, strategy: &Strategy) -> Result<Execution, ExecutorError> {
        let cardinality = match strategy {
            Strategy::PointLookup { .. } => Cardinality::Single,
            _ => Cardinality::Multiple,
        };
        let items = self.issue(Self::describe(strategy)).await?;
        debug!(strategy = %strategy, count = items.len(), "strategy executed");
        Ok(Execution { items, cardinality })
    }

    /// Upsert a review by primary key.
    pub async fn put(&self, review: MovieReview) -> Result<(), ExecutorError> {
        self.issue(StoreRequest::Put(review)).await.map(drop)
    }

    /// Hand one described request to the store.
    ///
    /// A put yields the written item.
    pub async fn issue(&self, request: StoreRequest) -> Result<Vec<MovieReview>, ExecutorError> {
        debug!(request = %request, "issuing store request");
        match request {
            StoreRequest::Get(key) => Ok(self.store.get_item(&key).await?.into_iter().collect()),
            StoreRequest::Query(condition) => self.store.query(&condition).await,
            StoreRequest::Scan(filter) => self.store.scan(&filter).await,
            StoreRequest::Put(review) => {
                self.store.put_item(review.clone()).await?;
                Ok(vec![review])
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::storage::InMemoryReviewTable;

    /// A store that records every request it receives and delegates to an
    /// in-memory table.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingStore {
        pub(crate) inner: InMemoryReviewTable,
        pub(crate) calls: Mutex<Vec<StoreRequest>>,
        pub(crate) fail: bool,
    }

    impl RecordingStore {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<StoreRequest> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, request: StoreRequest) -> Result<(), ExecutorError> {
            self.calls.lock().unwrap().push(request);
            if self.fail {
                Err(ExecutorError::Unavailable("connection refused".to_owned()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ReviewStore for RecordingStore {
        async fn get_item(&self, key: &ReviewKey) -> Result<Option<MovieReview>, ExecutorError> {
            self.record(StoreRequest::Get(key.clone()))?;
            self.inner.get_item(key).await
        }

        async fn query(&self, condition: &KeyCondition) -> Result<Vec<MovieReview>, ExecutorError> {
            self.record(StoreRequest::Query(condition.clone()))?;
            self.inner.query(condition).await
        }

        async fn scan(&self, filter: &ScanFilter) -> Result<Vec<MovieReview>, ExecutorError> {
            self.record(StoreRequest::Scan(filter.clone()))?;
            self.inner.scan(filter).await
        }

        async fn put_item(&self, review: MovieReview) -> Result<(), ExecutorError> {
            self.record(StoreRequest::Put(review.clone()))?;
            self.inner.put_item(review).await
        }
    }

    fn review(movie_id: i64, name: &str, date: &str, rating: f64) -> MovieReview {
        MovieReview {
            movie_id,
            reviewer_name: name.to_owned(),
            review_date: date.to_owned(),
            rating,
            content: String::new(),
        }
    }

    #[test]
    fn test_should_describe_each_strategy() {
        assert_eq!(
            QueryExecutor::describe(&Strategy::PointLookup {
                movie_id: 1,
                reviewer_name: "Ann".to_owned()
            }),
            StoreRequest::Get(ReviewKey::new(1, "Ann"))
        );
        assert_eq!(
            QueryExecutor::describe(&Strategy::RangeByYear {
                movie_id: 1,
                year: 2020
            }),
            StoreRequest::Query(KeyCondition::review_year(1, 2020))
        );
        assert_eq!(
            QueryExecutor::describe(&Strategy::RangeByMovie {
                movie_id: 1,
                min_rating: None
            }),
            StoreRequest::Query(KeyCondition::partition(1))
        );
        assert_eq!(
            QueryExecutor::describe(&Strategy::RangeByMovie {
                movie_id: 1,
                min_rating: Some(2.0)
            }),
            StoreRequest::Query(KeyCondition::min_rating(1, 2.0))
        );
        assert_eq!(
            QueryExecutor::describe(&Strategy::UnindexedScanByReviewer {
                reviewer_name: "Ann".to_owned()
            }),
            StoreRequest::Scan(ScanFilter {
                reviewer_name: "Ann".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn test_should_execute_point_lookup_as_single() {
        let store = Arc::new(RecordingStore::default());
        let executor = QueryExecutor::new(store.clone());
        executor
            .put(review(1, "Ann", "2020-01-01", 3.0))
            .await
            .unwrap();

        let hit = executor
            .execute(&Strategy::PointLookup {
                movie_id: 1,
                reviewer_name: "Ann".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(hit.cardinality, Cardinality::Single);
        assert_eq!(hit.items.len(), 1);

        let miss = executor
            .execute(&Strategy::PointLookup {
                movie_id: 1,
                reviewer_name: "Bob".to_owned(),
            })
            .await
            .unwrap();
        assert!(miss.items.is_empty());
        assert_eq!(store.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_should_execute_ranges_as_multiple() {
        let store = Arc::new(RecordingStore::default());
        let executor = QueryExecutor::new(store.clone());
        executor
            .put(review(1, "Ann", "2020-01-01", 3.0))
            .await
            .unwrap();
        executor
            .put(review(1, "Bob", "2021-01-01", 5.0))
            .await
            .unwrap();

        let out = executor
            .execute(&Strategy::RangeByYear {
                movie_id: 1,
                year: 2021,
            })
            .await
            .unwrap();
        assert_eq!(out.cardinality, Cardinality::Multiple);
        assert_eq!(out.items, vec![review(1, "Bob", "2021-01-01", 5.0)]);
    }

    #[tokio::test]
    async fn test_should_surface_backend_errors_unmodified() {
        let executor = QueryExecutor::new(Arc::new(RecordingStore::failing()));
        let err = executor
            .execute(&Strategy::UnindexedScanByReviewer {
                reviewer_name: "Ann".to_owned(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::Unavailable(ref m) if m == "connection refused"));
    }
}
