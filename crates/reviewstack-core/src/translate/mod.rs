//! Review translation.
//!
//! Translation is an optional last stage of the read path. It only runs for
//! a found review with non-empty content.

use std::fmt;

use async_trait::async_trait;

use reviewstack_model::MovieReview;

use crate::error::TranslationError;

pub mod http;

pub use self::http::HttpTranslator;

/// Language every stored review is written in.
pub const SOURCE_LANGUAGE: &str = "en";

/// A text translation service.
#[async_trait]
pub trait Translator: Send + Sync + fmt::Debug {
    /// Translate `text` from `source` to `target`.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError>;
}

/// Replace a review's content with its translation into `target`.
///
/// Makes exactly one call to the translator.
pub async fn translate_review(
    translator: &dyn Translator,
    mut review: MovieReview,
    target: &str,
) -> Result<MovieReview, TranslationError> {
    review.content = translator
        .translate(&review.content, SOURCE_LANGUAGE, target)
        .await?;
    Ok(review)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Uppercases text and records each call.
    #[derive(Debug, Default)]
    pub(crate) struct FakeTranslator {
        pub(crate) calls: Mutex<Vec<(String, String, String)>>,
        pub(crate) fail: bool,
    }

    impl FakeTranslator {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(
            &self,
            text: &str,
            source: &str,
            target: &str,
        ) -> Result<String, TranslationError> {
            self.calls.lock().unwrap().push((
                text.to_owned(),
                source.to_owned(),
                target.to_owned(),
            ));
            if self.fail {
                return Err(TranslationError::Service {
                    status: 503,
                    body: "unavailable".to_owned(),
                });
            }
            Ok(format!("[{target}] {}", text.to_uppercase()))
        }
    }

    #[tokio::test]
    async fn test_should_replace_content_with_translation() {
        let translator = FakeTranslator::default();
        let review = MovieReview {
            movie_id: 1,
            reviewer_name: "Ann".to_owned(),
            review_date: "2020-01-01".to_owned(),
            rating: 4.0,
            content: "great".to_owned(),
        };

        let translated = translate_review(&translator, review.clone(), "fr")
            .await
            .unwrap();
        assert_eq!(translated.content, "[fr] GREAT");
        assert_eq!(translated.reviewer_name, review.reviewer_name);

        let calls = translator.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![("great".to_owned(), "en".to_owned(), "fr".to_owned())]
        );
    }
}
