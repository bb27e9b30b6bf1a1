//! Amazon DynamoDB review table.
//!
//! Wraps a single [`Client`] built once at startup. Queries and scans follow
//! `LastEvaluatedKey` until the backend reports no more pages, so callers
//! always see one complete result.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use reviewstack_model::review::{CONTENT, MOVIE_ID, RATING, REVIEW_DATE, REVIEWER_NAME};
use reviewstack_model::{MovieReview, ReviewKey};

use super::{KeyCondition, ReviewStore, ScanFilter, SortCondition};
use crate::config::ReviewsConfig;
use crate::error::ExecutorError;

type Item = HashMap<String, AttributeValue>;

/// A review table stored in DynamoDB.
#[derive(Debug, Clone)]
pub struct DynamoDbReviewTable {
    client: Client,
    table_name: String,
}

impl DynamoDbReviewTable {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build a client from the ambient AWS configuration, the configured
    /// region and the optional endpoint override.
    pub async fn from_config(config: &ReviewsConfig) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(
            Client::from_conf(builder.build()),
            config.table_name.clone(),
        )
    }
}

#[async_trait]
impl ReviewStore for DynamoDbReviewTable {
    async fn get_item(&self, key: &ReviewKey) -> Result<Option<MovieReview>, ExecutorError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(MOVIE_ID, AttributeValue::N(key.movie_id.to_string()))
            .key(REVIEWER_NAME, AttributeValue::S(key.reviewer_name.clone()))
            .send()
            .await
            .map_err(|e| ExecutorError::Unavailable(DisplayErrorContext(&e).to_string()))?;

        output.item().map(item_to_review).transpose()
    }

    async fn query(&self, condition: &KeyCondition) -> Result<Vec<MovieReview>, ExecutorError> {
        let (expression, sort_value) = key_condition_expression(condition);

        let mut reviews = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0_usize;
        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table_name)
                .set_index_name(condition.index.index_name().map(str::to_owned))
                .key_condition_expression(&expression)
                .expression_attribute_values(
                    ":m",
                    AttributeValue::N(condition.movie_id.to_string()),
                )
                .set_exclusive_start_key(start_key.take());
            if let Some(value) = &sort_value {
                request = request.expression_attribute_values(":s", value.clone());
            }

            let output = request
                .send()
                .await
                .map_err(|e| ExecutorError::Unavailable(DisplayErrorContext(&e).to_string()))?;
            pages += 1;

            for item in output.items() {
                reviews.push(item_to_review(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(pages, count = reviews.len(), "dynamodb query complete");
        Ok(reviews)
    }

    async fn scan(&self, filter: &ScanFilter) -> Result<Vec<MovieReview>, ExecutorError> {
        let mut reviews = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0_usize;
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression(format!("{REVIEWER_NAME} = :r"))
                .expression_attribute_values(":r", AttributeValue::S(filter.reviewer_name.clone()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| ExecutorError::Unavailable(DisplayErrorContext(&e).to_string()))?;
            pages += 1;

            for item in output.items() {
                reviews.push(item_to_review(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(pages, count = reviews.len(), "dynamodb scan complete");
        Ok(reviews)
    }

    async fn put_item(&self, review: MovieReview) -> Result<(), ExecutorError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(review_to_item(&review)))
            .send()
            .await
            .map_err(|e| ExecutorError::Unavailable(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

/// Build the key condition expression and the value bound to `:s`, if any.
fn key_condition_expression(condition: &KeyCondition) -> (String, Option<AttributeValue>) {
    let sort_attr = condition.index.sort_attribute();
    match &condition.sort {
        None => (format!("{MOVIE_ID} = :m"), None),
        Some(SortCondition::BeginsWith(prefix)) => (
            format!("{MOVIE_ID} = :m and begins_with({sort_attr}, :s)"),
            Some(AttributeValue::S(prefix.clone())),
        ),
        Some(SortCondition::Ge(value)) => (
            format!("{MOVIE_ID} = :m and {sort_attr} >= :s"),
            Some(AttributeValue::N(value.to_string())),
        ),
    }
}

/// Marshal a review into a DynamoDB item.
#[must_use]
pub fn review_to_item(review: &MovieReview) -> Item {
    HashMap::from([
        (
            MOVIE_ID.to_owned(),
            AttributeValue::N(review.movie_id.to_string()),
        ),
        (
            REVIEWER_NAME.to_owned(),
            AttributeValue::S(review.reviewer_name.clone()),
        ),
        (
            REVIEW_DATE.to_owned(),
            AttributeValue::S(review.review_date.clone()),
        ),
        (
            RATING.to_owned(),
            AttributeValue::N(review.rating.to_string()),
        ),
        (CONTENT.to_owned(), AttributeValue::S(review.content.clone())),
    ])
}

/// Unmarshal a DynamoDB item into a review.
///
/// A missing `content` attribute reads as empty text; every other attribute
/// is required.
#[allow(clippy::implicit_hasher)]
pub fn item_to_review(item: &Item) -> Result<MovieReview, ExecutorError> {
    Ok(MovieReview {
        movie_id: number_attr(item, MOVIE_ID)?
            .parse()
            .map_err(|_| malformed(MOVIE_ID, "not an integer"))?,
        reviewer_name: string_attr(item, REVIEWER_NAME)?.to_owned(),
        review_date: string_attr(item, REVIEW_DATE)?.to_owned(),
        rating: number_attr(item, RATING)?
            .parse()
            .map_err(|_| malformed(RATING, "not a number"))?,
        content: match item.get(CONTENT) {
            None => String::new(),
            Some(_) => string_attr(item, CONTENT)?.to_owned(),
        },
    })
}

fn string_attr<'a>(item: &'a Item, name: &str) -> Result<&'a str, ExecutorError> {
    match item.get(name) {
        Some(AttributeValue::S(s)) => Ok(s),
        Some(_) => Err(malformed(name, "expected a string")),
        None => Err(malformed(name, "missing")),
    }
}

fn number_attr<'a>(item: &'a Item, name: &str) -> Result<&'a str, ExecutorError> {
    match item.get(name) {
        Some(AttributeValue::N(n)) => Ok(n),
        Some(_) => Err(malformed(name, "expected a number")),
        None => Err(malformed(name, "missing")),
    }
}

fn malformed(attr: &str, reason: &str) -> ExecutorError {
    ExecutorError::MalformedItem(format!("{attr}: {reason}"))
}
