//! ReviewStack operation enum.

use std::fmt;

/// All supported review operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewsOperation {
    // Writes
    /// Create (upsert) a review from a request body.
    CreateReview,
    /// Overwrite the review addressed by the path key.
    UpdateReview,

    // Reads
    /// All reviews of a movie, optionally filtered by minimum rating.
    GetMovieReviews,
    /// Reviews of a movie by reviewer name or by year.
    GetMovieReviewsByToken,
    /// Every review written by one reviewer, across all movies.
    GetReviewerReviews,
    /// One review with its content translated.
    GetTranslation,
}

impl ReviewsOperation {
    /// Returns the operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateReview => "CreateReview",
            Self::UpdateReview => "UpdateReview",
            Self::GetMovieReviews => "GetMovieReviews",
            Self::GetMovieReviewsByToken => "GetMovieReviewsByToken",
            Self::GetReviewerReviews => "GetReviewerReviews",
            Self::GetTranslation => "GetTranslation",
        }
    }
}

impl fmt::Display for ReviewsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
