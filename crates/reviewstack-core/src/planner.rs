//! Query planning.
//!
//! Turns loosely-typed identifying parameters into exactly one access
//! strategy. Pure decision logic: nothing here touches storage.

use std::fmt;

use reviewstack_model::LookupRequest;

use crate::error::PlanError;

/// Message when the `{reviewerNameOrYear}` segment is unusable.
pub const MISSING_NAME_OR_YEAR: &str = "You have not provided a valid reviewer name or year";
/// Message when a reviewer name is required but absent.
pub const MISSING_REVIEWER_NAME: &str = "Missing reviewer name";
/// Message when the reviewer named in a translation path is absent.
pub const MISSING_VALID_REVIEWER_NAME: &str = "You have not provided a valid reviewer name";

/// The second path segment of a by-token lookup, interpreted once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disambiguator {
    /// The token parsed as an unsigned integer.
    Year(u32),
    /// Anything else.
    Name(String),
}

/// Interpret a name-or-year token.
///
/// A token that parses as an unsigned integer is a year, so a reviewer
/// literally named `"2020"` cannot be looked up through this path.
#[must_use]
pub fn parse_disambiguator(token: &str) -> Disambiguator {
    match token.parse::<u32>() {
        Ok(year) => Disambiguator::Year(year),
        Err(_) => Disambiguator::Name(token.to_owned()),
    }
}

/// A physical access pattern against the review table.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Get by full primary key.
    PointLookup {
        movie_id: i64,
        reviewer_name: String,
    },
    /// `reviewDateIx` query with a year prefix on the sort key.
    RangeByYear { movie_id: i64, year: u32 },
    /// Partition query, optionally narrowed on `ratingIx`.
    RangeByMovie {
        movie_id: i64,
        min_rating: Option<f64>,
    },
    /// Full table scan filtered on reviewer name.
    UnindexedScanByReviewer { reviewer_name: String },
}

impl Strategy {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointLookup { .. } => "PointLookup",
            Self::RangeByYear { .. } => "RangeByYear",
            Self::RangeByMovie {
                min_rating: Some(_),
                ..
            } => "RangeByMovie+RatingFilter",
            Self::RangeByMovie { .. } => "RangeByMovie",
            Self::UnindexedScanByReviewer { .. } => "UnindexedScanByReviewer",
        }
    }

    /// The message clients see when this strategy finds nothing.
    #[must_use]
    pub fn not_found_message(&self) -> &'static str {
        match self {
            Self::PointLookup { .. } => "No movie reviews by specified reviewer found for the movie",
            Self::RangeByYear { .. } => "No movie reviews for specified year found for the movie",
            Self::RangeByMovie { .. } => "Invalid movie Id",
            Self::UnindexedScanByReviewer { .. } => "No movie reviews found for reviewer",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Select the strategy for a lookup.
///
/// # Errors
///
/// `MissingIdentifier` when a movie id is required but absent or not an
/// integer; `MissingDisambiguator` when the name-or-year token or the
/// reviewer name is absent or blank.
pub fn plan(request: &LookupRequest) -> Result<Strategy, PlanError> {
    match request {
        LookupRequest::MovieReviews {
            movie_id,
            min_rating,
        } => Ok(Strategy::RangeByMovie {
            movie_id: parse_movie_id(movie_id.as_deref())?,
            min_rating: *min_rating,
        }),
        LookupRequest::MovieReviewsByToken { movie_id, token } => {
            let movie_id = parse_movie_id(movie_id.as_deref())?;
            let token = non_blank(token.as_deref())
                .ok_or(PlanError::MissingDisambiguator(MISSING_NAME_OR_YEAR))?;
            Ok(match parse_disambiguator(token) {
                Disambiguator::Year(year) => Strategy::RangeByYear { movie_id, year },
                Disambiguator::Name(reviewer_name) => Strategy::PointLookup {
                    movie_id,
                    reviewer_name,
                },
            })
        }
        LookupRequest::MovieReviewByReviewer {
            movie_id,
            reviewer_name,
        } => {
            let reviewer_name = non_blank(reviewer_name.as_deref())
                .ok_or(PlanError::MissingDisambiguator(MISSING_VALID_REVIEWER_NAME))?;
            Ok(Strategy::PointLookup {
                movie_id: parse_movie_id(movie_id.as_deref())?,
                reviewer_name: reviewer_name.to_owned(),
            })
        }
        LookupRequest::ReviewerReviews { reviewer_name } => {
            let reviewer_name = non_blank(reviewer_name.as_deref())
                .ok_or(PlanError::MissingDisambiguator(MISSING_REVIEWER_NAME))?;
            Ok(Strategy::UnindexedScanByReviewer {
                reviewer_name: reviewer_name.to_owned(),
            })
        }
    }
}

/// Parse a raw movie id segment.
pub fn parse_movie_id(raw: Option<&str>) -> Result<i64, PlanError> {
    non_blank(raw)
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(PlanError::MissingIdentifier)
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}
