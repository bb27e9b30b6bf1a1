//! Result shaping.

use reviewstack_model::MovieReview;
use reviewstack_model::output::ReviewsOutput;

use crate::executor::{Cardinality, Execution};

/// The outward contract of every read.
#[derive(Debug, Clone, PartialEq)]
pub enum Shaped {
    /// At least one review was found.
    Found(ReviewsOutput),
    /// Nothing matched.
    NotFound,
}

/// Normalize executor output.
///
/// Empty output is always `NotFound`. Anything else is returned in backend
/// order, as a single object for [`Cardinality::Single`] and as a list
/// otherwise.
#[must_use]
pub fn shape(execution: Execution) -> Shaped {
    let Execution {
        mut items,
        cardinality,
    } = execution;

    if items.is_empty() {
        return Shaped::NotFound;
    }

    match cardinality {
        Cardinality::Single if items.len() == 1 => items
            .pop()
            .map_or(Shaped::NotFound, |item| Shaped::Found(ReviewsOutput::One(item))),
        _ => Shaped::Found(ReviewsOutput::Many(items)),
    }
}

impl Shaped {
    /// The single review, if this is a single-item result.
    #[must_use]
    pub fn into_single(self) -> Option<MovieReview> {
        match self {
            Self::Found(ReviewsOutput::One(review)) => Some(review),
            _ => None,
        }
    }
}
