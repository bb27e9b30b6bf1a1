//! In-memory review table.
//!
//! Each `movieId` partition lives behind one [`DashMap`] entry, so writes to
//! different movies never contend. Inside a partition the table is a
//! [`BTreeMap`] ordered by reviewer name, and each local secondary index is a
//! [`BTreeSet`] of `(sort value, reviewer name)` pointing back into it:
//!
//! ```text
//! DashMap<movieId, Partition {
//!     items:          BTreeMap<reviewerName, MovieReview>,
//!     review_date_ix: BTreeSet<(reviewDate, reviewerName)>,
//!     rating_ix:      BTreeSet<(rating, reviewerName)>,
//! }>
//! ```
//!
//! Index entries are only ever written alongside the item they point at, and
//! an overwrite removes the old item's entries first, so the indexes never
//! disagree with the table.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use reviewstack_model::{MovieReview, ReviewKey};

use super::{KeyCondition, ReviewStore, ScanFilter, SortCondition, TableIndex};
use crate::error::ExecutorError;

/// A value an index is sorted by.
///
/// Strings order by UTF-8 bytes and numbers by [`f64::total_cmp`]. The two
/// never share an index; strings sort first if they ever meet.
#[derive(Debug, Clone)]
enum SortValue {
    S(String),
    N(f64),
}

impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::S(a), Self::S(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Self::N(a), Self::N(b)) => a.total_cmp(b),
            (Self::S(_), Self::N(_)) => Ordering::Less,
            (Self::N(_), Self::S(_)) => Ordering::Greater,
        }
    }
}

/// One index entry. Field order gives `(sort, reviewer_name)` ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct IndexEntry {
    sort: SortValue,
    reviewer_name: String,
}

impl IndexEntry {
    /// The smallest entry with the given sort value.
    fn floor(sort: SortValue) -> Self {
        Self {
            sort,
            reviewer_name: String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Partition {
    items: BTreeMap<String, MovieReview>,
    review_date_ix: BTreeSet<IndexEntry>,
    rating_ix: BTreeSet<IndexEntry>,
}

impl Partition {
    /// Insert or replace a review, keeping both indexes in step.
    fn upsert(&mut self, review: MovieReview) -> Option<MovieReview> {
        let old = self.items.remove(&review.reviewer_name);
        if let Some(old) = &old {
            self.review_date_ix.remove(&date_entry(old));
            self.rating_ix.remove(&rating_entry(old));
        }
        self.review_date_ix.insert(date_entry(&review));
        self.rating_ix.insert(rating_entry(&review));
        self.items.insert(review.reviewer_name.clone(), review);
        old
    }

    fn index(&self, index: TableIndex) -> Option<&BTreeSet<IndexEntry>> {
        match index {
            TableIndex::Primary => None,
            TableIndex::ReviewDate => Some(&self.review_date_ix),
            TableIndex::Rating => Some(&self.rating_ix),
        }
    }

    fn query(&self, index: TableIndex, sort: Option<&SortCondition>) -> Vec<MovieReview> {
        match self.index(index) {
            None => self.items.values().cloned().collect(),
            Some(entries) => collect_index(entries, sort)
                .filter_map(|entry| self.items.get(&entry.reviewer_name))
                .cloned()
                .collect(),
        }
    }
}

fn date_entry(review: &MovieReview) -> IndexEntry {
    IndexEntry {
        sort: SortValue::S(review.review_date.clone()),
        reviewer_name: review.reviewer_name.clone(),
    }
}

fn rating_entry(review: &MovieReview) -> IndexEntry {
    IndexEntry {
        sort: SortValue::N(normalize_zero(review.rating)),
        reviewer_name: review.reviewer_name.clone(),
    }
}

/// Folds `-0.0` into `0.0`, which [`f64::total_cmp`] would otherwise order
/// below it.
#[allow(clippy::float_cmp)]
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Walks an index in ascending order, narrowed by the sort condition.
fn collect_index<'a>(
    entries: &'a BTreeSet<IndexEntry>,
    sort: Option<&'a SortCondition>,
) -> Box<dyn Iterator<Item = &'a IndexEntry> + 'a> {
    match sort {
        None => Box::new(entries.iter()),
        Some(SortCondition::Ge(value)) => Box::new(entries.range((
            Bound::Included(IndexEntry::floor(SortValue::N(normalize_zero(*value)))),
            Bound::Unbounded,
        ))),
        Some(SortCondition::BeginsWith(prefix)) => {
            let lower = Bound::Included(IndexEntry::floor(SortValue::S(prefix.clone())));
            let upper = compute_prefix_upper_bound(prefix).map_or(Bound::Unbounded, |ub| {
                Bound::Excluded(IndexEntry::floor(SortValue::S(ub)))
            });
            Box::new(
                entries
                    .range((lower, upper))
                    .filter(move |e| matches!(&e.sort, SortValue::S(s) if s.starts_with(prefix.as_str()))),
            )
        }
    }
}

/// Computes the exclusive upper bound for a prefix range.
///
/// Increments the last byte of the prefix. Returns `None` if the prefix is
/// empty, all bytes are `0xFF`, or the incremented bytes do not survive
/// UTF-8 repair as a larger string.
fn compute_prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut bytes = prefix.as_bytes().to_vec();
    while bytes.last() == Some(&0xFF) {
        bytes.pop();
    }
    let last = bytes.last_mut()?;
    *last += 1;
    // May not be valid UTF-8 after the increment; only used as a range bound
    // under byte ordering.
    let upper = String::from_utf8_lossy(&bytes).into_owned();
    (upper.as_bytes() > prefix.as_bytes()).then_some(upper)
}

/// An in-memory review table with both local secondary indexes.
#[derive(Debug, Default)]
pub struct InMemoryReviewTable {
    partitions: DashMap<i64, Partition>,
    item_count: AtomicU64,
}

impl InMemoryReviewTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current item count.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.item_count.load(AtomicOrdering::Relaxed)
    }

    fn upsert(&self, review: MovieReview) {
        let movie_id = review.movie_id;
        let replaced = {
            let mut partition = self.partitions.entry(movie_id).or_default();
            partition.upsert(review).is_some()
        };
        if replaced {
            debug!(movie_id, "replaced existing review");
        } else {
            self.item_count.fetch_add(1, AtomicOrdering::Relaxed);
            debug!(movie_id, "inserted new review");
        }
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewTable {
    async fn get_item(&self, key: &ReviewKey) -> Result<Option<MovieReview>, ExecutorError> {
        Ok(self
            .partitions
            .get(&key.movie_id)
            .and_then(|partition| partition.items.get(&key.reviewer_name).cloned()))
    }

    async fn query(&self, condition: &KeyCondition) -> Result<Vec<MovieReview>, ExecutorError> {
        Ok(self
            .partitions
            .get(&condition.movie_id)
            .map(|partition| partition.query(condition.index, condition.sort.as_ref()))
            .unwrap_or_default())
    }

    async fn scan(&self, filter: &ScanFilter) -> Result<Vec<MovieReview>, ExecutorError> {
        // Partition keys first, so no two shard guards are held at once.
        let mut movie_ids: Vec<i64> = self.partitions.iter().map(|entry| *entry.key()).collect();
        movie_ids.sort_unstable();

        let mut matched = Vec::new();
        for movie_id in movie_ids {
            if let Some(partition) = self.partitions.get(&movie_id) {
                matched.extend(
                    partition
                        .items
                        .values()
                        .filter(|review| review.reviewer_name == filter.reviewer_name)
                        .cloned(),
                );
            }
        }
        Ok(matched)
    }

    async fn put_item(&self, review: MovieReview) -> Result<(), ExecutorError> {
        self.upsert(review);
        Ok(())
    }
}
