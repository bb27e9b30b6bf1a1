//! The `MovieReview` entity and its primary key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute name of the partition key.
pub const MOVIE_ID: &str = "movieId";
/// Attribute name of the table sort key.
pub const REVIEWER_NAME: &str = "reviewerName";
/// Attribute name of the `reviewDateIx` sort key.
pub const REVIEW_DATE: &str = "reviewDate";
/// Attribute name of the `ratingIx` sort key.
pub const RATING: &str = "rating";
/// Attribute name of the free-text review body.
pub const CONTENT: &str = "content";

/// A single review of a movie by a named reviewer.
///
/// `(movie_id, reviewer_name)` is the primary key. `review_date` is always
/// `YYYY-MM-DD`; its first four characters are the year used by year-prefix
/// queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieReview {
    /// Partition key.
    pub movie_id: i64,
    /// Sort key.
    pub reviewer_name: String,
    /// Server-stamped write date, `YYYY-MM-DD`.
    pub review_date: String,
    /// Numeric score.
    pub rating: f64,
    /// Review text, may be empty.
    #[serde(default)]
    pub content: String,
}

impl MovieReview {
    /// The primary key of this review.
    #[must_use]
    pub fn key(&self) -> ReviewKey {
        ReviewKey {
            movie_id: self.movie_id,
            reviewer_name: self.reviewer_name.clone(),
        }
    }

    /// The year prefix of `review_date`, if the date is long enough to have one.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.review_date.get(..4)
    }

    /// Whether the review has any text to translate. Whitespace counts.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// Primary key of a [`MovieReview`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewKey {
    /// Partition key value.
    pub movie_id: i64,
    /// Sort key value.
    pub reviewer_name: String,
}

impl ReviewKey {
    /// Create a key from its parts.
    #[must_use]
    pub fn new(movie_id: i64, reviewer_name: impl Into<String>) -> Self {
        Self {
            movie_id,
            reviewer_name: reviewer_name.into(),
        }
    }
}

impl fmt::Display for ReviewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.movie_id, self.reviewer_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review() -> MovieReview {
        MovieReview {
            movie_id: 1234,
            reviewer_name: "Alice".to_owned(),
            review_date: "2023-10-20".to_owned(),
            rating: 4.0,
            content: "Great film".to_owned(),
        }
    }

    #[test]
    fn test_should_serialize_with_camel_case_names() {
        let json = serde_json::to_value(review()).unwrap();
        assert_eq!(json["movieId"], 1234);
        assert_eq!(json["reviewerName"], "Alice");
        assert_eq!(json["reviewDate"], "2023-10-20");
        assert_eq!(json["rating"], 4.0);
    }

    #[test]
    fn test_should_default_missing_content_to_empty() {
        let parsed: MovieReview = serde_json::from_value(serde_json::json!({
            "movieId": 1,
            "reviewerName": "Bob",
            "reviewDate": "2022-01-01",
            "rating": 2
        }))
        .unwrap();
        assert_eq!(parsed.content, "");
        assert!(!parsed.has_content());

        let blank = MovieReview {
            content: "  ".to_owned(),
            ..parsed
        };
        assert!(blank.has_content());
    }

    #[test]
    fn test_should_extract_year_prefix() {
        assert_eq!(review().year(), Some("2023"));
        let mut short = review();
        short.review_date = "20".to_owned();
        assert_eq!(short.year(), None);
    }

    #[test]
    fn test_should_build_key() {
        assert_eq!(review().key(), ReviewKey::new(1234, "Alice"));
        assert_eq!(review().key().to_string(), "1234/Alice");
    }
}
