//! REST request router.
//!
//! ```text
//! POST /movies                                         CreateReview
//! GET  /movies/{movieId}/reviews                       GetMovieReviews
//! GET  /movies/{movieId}/reviews/{reviewerNameOrYear}  GetMovieReviewsByToken
//! PUT  /movies/{movieId}/reviews/{reviewerName}        UpdateReview
//! GET  /reviews/{reviewerName}                         GetReviewerReviews
//! GET  /reviews/{reviewerName}/{movieId}/translation   GetTranslation
//! ```
//!
//! Segments are percent-decoded and otherwise passed through untouched;
//! interpreting them is the planner's job.

use percent_encoding::percent_decode_str;

use reviewstack_model::error::ReviewsError;
use reviewstack_model::operations::ReviewsOperation;
use reviewstack_model::request::PathParams;

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Operation to dispatch.
    pub operation: ReviewsOperation,
    /// Captured path segments.
    pub params: PathParams,
}

/// Resolve the operation for a method and path.
///
/// Returns `UnknownRoute` when no pattern matches the path and
/// `MethodNotAllowed` when one does but not for this method.
pub fn resolve_route(method: &http::Method, path: &str) -> Result<Route, ReviewsError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let segments: Vec<String> = trimmed
        .split('/')
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    let candidates: Vec<(http::Method, ReviewsOperation, PathParams)> = match segments.as_slice() {
        ["movies"] => vec![(
            http::Method::POST,
            ReviewsOperation::CreateReview,
            PathParams::default(),
        )],
        ["movies", movie_id, "reviews"] => vec![(
            http::Method::GET,
            ReviewsOperation::GetMovieReviews,
            PathParams {
                movie_id: Some((*movie_id).to_owned()),
                ..PathParams::default()
            },
        )],
        ["movies", movie_id, "reviews", token] => vec![
            (
                http::Method::GET,
                ReviewsOperation::GetMovieReviewsByToken,
                PathParams {
                    movie_id: Some((*movie_id).to_owned()),
                    reviewer_name_or_year: Some((*token).to_owned()),
                    reviewer_name: None,
                },
            ),
            (
                http::Method::PUT,
                ReviewsOperation::UpdateReview,
                PathParams {
                    movie_id: Some((*movie_id).to_owned()),
                    reviewer_name_or_year: None,
                    reviewer_name: Some((*token).to_owned()),
                },
            ),
        ],
        ["reviews", reviewer_name] => vec![(
            http::Method::GET,
            ReviewsOperation::GetReviewerReviews,
            PathParams {
                reviewer_name: Some((*reviewer_name).to_owned()),
                ..PathParams::default()
            },
        )],
        ["reviews", reviewer_name, movie_id, "translation"] => vec![(
            http::Method::GET,
            ReviewsOperation::GetTranslation,
            PathParams {
                movie_id: Some((*movie_id).to_owned()),
                reviewer_name_or_year: None,
                reviewer_name: Some((*reviewer_name).to_owned()),
            },
        )],
        _ => return Err(ReviewsError::unknown_route(path)),
    };

    candidates
        .into_iter()
        .find(|(m, _, _)| m == method)
        .map(|(_, operation, params)| Route { operation, params })
        .ok_or_else(|| ReviewsError::method_not_allowed(method, path))
}
