//! Movie review provider implementing every review operation.

use std::sync::Arc;

use tracing::{debug, info};

use reviewstack_model::error::ReviewsError;
use reviewstack_model::output::ReviewsOutput;
use reviewstack_model::request::{LookupRequest, PathParams, RequestDescriptor, RequestKind};
use reviewstack_model::review::{CONTENT, MOVIE_ID, RATING, REVIEWER_NAME};
use reviewstack_model::{MovieReview, ReviewKey, ReviewsOperation};

use crate::error::{
    PlanError, executor_error_to_reviews, plan_error_to_reviews, translation_error_to_reviews,
};
use crate::executor::QueryExecutor;
use crate::planner::{self, MISSING_REVIEWER_NAME, Strategy};
use crate::shaper::{self, Shaped};
use crate::storage::ReviewStore;
use crate::translate::{Translator, translate_review};
use crate::validator::{
    self, LANGUAGE, MIN_RATING, ValidationResult, as_integer, as_number, query_to_value,
};

/// Not-found message for the translation lookup.
const TRANSLATION_NOT_FOUND: &str = "No movie review found for the specified movie id/ reviewer name";

/// Movie review provider.
///
/// Holds the executor over the injected store and the injected translator.
/// Each call is independent; nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct MovieReviewsProvider {
    executor: QueryExecutor,
    translator: Arc<dyn Translator>,
}

impl MovieReviewsProvider {
    /// Create a provider over a shared store and translator.
    #[must_use]
    pub fn new(store: Arc<dyn ReviewStore>, translator: Arc<dyn Translator>) -> Self {
        Self {
            executor: QueryExecutor::new(store),
            translator,
        }
    }

    /// Run any operation.
    pub async fn handle(
        &self,
        op: ReviewsOperation,
        request: &RequestDescriptor,
    ) -> Result<ReviewsOutput, ReviewsError> {
        match op {
            ReviewsOperation::CreateReview => {
                self.handle_create_review(request).await.map(ReviewsOutput::One)
            }
            ReviewsOperation::UpdateReview => {
                self.handle_update_review(request).await.map(ReviewsOutput::One)
            }
            ReviewsOperation::GetMovieReviews => self.handle_get_movie_reviews(request).await,
            ReviewsOperation::GetMovieReviewsByToken => {
                self.handle_get_movie_reviews_by_token(request).await
            }
            ReviewsOperation::GetReviewerReviews => {
                self.handle_get_reviewer_reviews(request).await
            }
            ReviewsOperation::GetTranslation => {
                self.handle_get_translation(request).await.map(ReviewsOutput::One)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

impl MovieReviewsProvider {
    /// Handle `CreateReview`: upsert the review named by the body.
    pub async fn handle_create_review(
        &self,
        request: &RequestDescriptor,
    ) -> Result<MovieReview, ReviewsError> {
        check(validator::validate(
            RequestKind::CreateReview,
            request.body.as_ref(),
        ))?;
        let body = require_body(request)?;

        let key = ReviewKey::new(
            body.get(MOVIE_ID)
                .and_then(as_integer)
                .ok_or(PlanError::MissingIdentifier)
                .map_err(plan_error_to_reviews)?,
            body.get(REVIEWER_NAME)
                .and_then(serde_json::Value::as_str)
                .ok_or(PlanError::MissingDisambiguator(MISSING_REVIEWER_NAME))
                .map_err(plan_error_to_reviews)?,
        );

        self.write(review_from_body(key, body)?).await
    }

    /// Handle `UpdateReview`: overwrite the review named by the path.
    pub async fn handle_update_review(
        &self,
        request: &RequestDescriptor,
    ) -> Result<MovieReview, ReviewsError> {
        let key = update_key(&request.path).map_err(plan_error_to_reviews)?;

        check(validator::validate(
            RequestKind::UpdateReview,
            request.body.as_ref(),
        ))?;
        let body = require_body(request)?;
        check(validator::validate_update_key(body, &key))?;

        self.write(review_from_body(key, body)?).await
    }

    async fn write(&self, review: MovieReview) -> Result<MovieReview, ReviewsError> {
        let key = review.key();
        self.executor
            .put(review.clone())
            .await
            .map_err(executor_error_to_reviews)?;
        info!(key = %key, "review written");
        Ok(review)
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

impl MovieReviewsProvider {
    /// Handle `GetMovieReviews`.
    pub async fn handle_get_movie_reviews(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ReviewsOutput, ReviewsError> {
        planner::parse_movie_id(request.path.movie_id.as_deref())
            .map_err(plan_error_to_reviews)?;

        let query = request.query.as_ref().map(query_to_value);
        check(validator::validate(
            RequestKind::MovieReviewsQuery,
            query.as_ref(),
        ))?;

        let min_rating = query
            .as_ref()
            .and_then(|q| q.get(MIN_RATING))
            .and_then(as_number);

        self.read(&LookupRequest::MovieReviews {
            movie_id: request.path.movie_id.clone(),
            min_rating,
        })
        .await
    }

    /// Handle `GetMovieReviewsByToken`.
    pub async fn handle_get_movie_reviews_by_token(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ReviewsOutput, ReviewsError> {
        self.read(&LookupRequest::MovieReviewsByToken {
            movie_id: request.path.movie_id.clone(),
            token: request.path.reviewer_name_or_year.clone(),
        })
        .await
    }

    /// Handle `GetReviewerReviews`.
    pub async fn handle_get_reviewer_reviews(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ReviewsOutput, ReviewsError> {
        self.read(&LookupRequest::ReviewerReviews {
            reviewer_name: request.path.reviewer_name.clone(),
        })
        .await
    }

    /// Handle `GetTranslation`.
    pub async fn handle_get_translation(
        &self,
        request: &RequestDescriptor,
    ) -> Result<MovieReview, ReviewsError> {
        let strategy = planner::plan(&LookupRequest::MovieReviewByReviewer {
            movie_id: request.path.movie_id.clone(),
            reviewer_name: request.path.reviewer_name.clone(),
        })
        .map_err(plan_error_to_reviews)?;

        // The language is required, so a missing query string is an empty one.
        let query = query_to_value(&request.query.clone().unwrap_or_default());
        check(validator::validate(
            RequestKind::TranslationQuery,
            Some(&query),
        ))?;
        let language = query
            .get(LANGUAGE)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();

        let review = self
            .execute(&strategy)
            .await?
            .into_single()
            .ok_or_else(|| ReviewsError::not_found(TRANSLATION_NOT_FOUND))?;

        if !review.has_content() {
            return Err(ReviewsError::content_unavailable());
        }

        let translated = translate_review(self.translator.as_ref(), review, &language)
            .await
            .map_err(translation_error_to_reviews)?;
        debug!(key = %translated.key(), language = %language, "review translated");
        Ok(translated)
    }

    /// Plan, execute and shape a lookup.
    async fn read(&self, lookup: &LookupRequest) -> Result<ReviewsOutput, ReviewsError> {
        let strategy = planner::plan(lookup).map_err(plan_error_to_reviews)?;
        match self.execute(&strategy).await? {
            Shaped::Found(output) => Ok(output),
            Shaped::NotFound => Err(ReviewsError::not_found(strategy.not_found_message())),
        }
    }

    async fn execute(&self, strategy: &Strategy) -> Result<Shaped, ReviewsError> {
        let execution = self
            .executor
            .execute(strategy)
            .await
            .map_err(executor_error_to_reviews)?;
        let count = execution.items.len();
        let shaped = shaper::shape(execution);
        debug!(strategy = %strategy, count, "lookup complete");
        Ok(shaped)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check(result: ValidationResult) -> Result<(), ReviewsError> {
    result.into_result().map_err(ReviewsError::validation)
}

fn require_body(request: &RequestDescriptor) -> Result<&serde_json::Value, ReviewsError> {
    request
        .body
        .as_ref()
        .ok_or_else(|| ReviewsError::serialization("Request body is required"))
}

fn update_key(path: &PathParams) -> Result<ReviewKey, PlanError> {
    let movie_id = planner::parse_movie_id(path.movie_id.as_deref())?;
    let reviewer_name = path
        .reviewer_name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(PlanError::MissingDisambiguator(MISSING_REVIEWER_NAME))?;
    Ok(ReviewKey::new(movie_id, reviewer_name))
}

/// Build the review to store. The key comes from the caller and the date is
/// stamped here.
fn review_from_body(key: ReviewKey, body: &serde_json::Value) -> Result<MovieReview, ReviewsError> {
    let rating = body
        .get(RATING)
        .and_then(as_number)
        .ok_or_else(|| ReviewsError::serialization("rating must be a number"))?;
    let content = body
        .get(CONTENT)
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_owned();

    Ok(MovieReview {
        movie_id: key.movie_id,
        reviewer_name: key.reviewer_name,
        review_date: today(),
        rating,
        content,
    })
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
