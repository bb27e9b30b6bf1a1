//! Normalized inbound request shapes.
//!
//! The HTTP layer reduces every request to a [`RequestDescriptor`]: raw path
//! segments, an optional query-string map and an optional decoded body. All
//! interpretation of those loosely-typed values happens downstream.

use std::collections::HashMap;

/// Raw path segments captured by the router. Values are percent-decoded but
/// otherwise uninterpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    /// `{movieId}` segment.
    pub movie_id: Option<String>,
    /// `{reviewerNameOrYear}` segment.
    pub reviewer_name_or_year: Option<String>,
    /// `{reviewerName}` segment.
    pub reviewer_name: Option<String>,
}

/// A request as handed to the review provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestDescriptor {
    /// Path segments.
    pub path: PathParams,
    /// Query string, `None` when the request had no query string at all.
    pub query: Option<HashMap<String, String>>,
    /// Decoded JSON body, `None` when the request had no body.
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    /// Set the `{movieId}` segment.
    #[must_use]
    pub fn with_movie_id(mut self, movie_id: impl Into<String>) -> Self {
        self.path.movie_id = Some(movie_id.into());
        self
    }

    /// Set the `{reviewerNameOrYear}` segment.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.path.reviewer_name_or_year = Some(token.into());
        self
    }

    /// Set the `{reviewerName}` segment.
    #[must_use]
    pub fn with_reviewer_name(mut self, name: impl Into<String>) -> Self {
        self.path.reviewer_name = Some(name.into());
        self
    }

    /// Add a query-string parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the decoded body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The closed set of request shapes the validator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Body of `POST /movies`.
    CreateReview,
    /// Body of `PUT /movies/{movieId}/reviews/{reviewerName}`.
    UpdateReview,
    /// Query string of `GET /movies/{movieId}/reviews`.
    MovieReviewsQuery,
    /// Query string of the translation endpoint.
    TranslationQuery,
}

impl RequestKind {
    /// Schema name echoed back to clients on validation failure.
    #[must_use]
    pub fn schema_name(&self) -> &'static str {
        match self {
            Self::CreateReview => "MovieReview",
            Self::UpdateReview => "MovieReviewUpdate",
            Self::MovieReviewsQuery => "MovieReviewsQueryParams",
            Self::TranslationQuery => "TranslationQueryParams",
        }
    }
}

/// Identifying parameters of a read, before any interpretation.
///
/// The planner turns one of these into exactly one access strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupRequest {
    /// All reviews for a movie.
    MovieReviews {
        /// Raw movie id.
        movie_id: Option<String>,
        /// Minimum rating, already validated.
        min_rating: Option<f64>,
    },
    /// Reviews for a movie selected by an ambiguous name-or-year token.
    MovieReviewsByToken {
        /// Raw movie id.
        movie_id: Option<String>,
        /// Raw disambiguator.
        token: Option<String>,
    },
    /// The single review for a movie by an explicitly named reviewer.
    MovieReviewByReviewer {
        /// Raw movie id.
        movie_id: Option<String>,
        /// Reviewer name.
        reviewer_name: Option<String>,
    },
    /// Every review by one reviewer.
    ReviewerReviews {
        /// Reviewer name.
        reviewer_name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_descriptor() {
        let req = RequestDescriptor::default()
            .with_movie_id("1")
            .with_token("2020")
            .with_query("minRating", "3");
        assert_eq!(req.path.movie_id.as_deref(), Some("1"));
        assert_eq!(req.path.reviewer_name_or_year.as_deref(), Some("2020"));
        assert_eq!(
            req.query.as_ref().and_then(|q| q.get("minRating")),
            Some(&"3".to_owned())
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn test_should_name_schemas() {
        assert_eq!(RequestKind::CreateReview.schema_name(), "MovieReview");
        assert_eq!(
            RequestKind::TranslationQuery.schema_name(),
            "TranslationQueryParams"
        );
    }
}
