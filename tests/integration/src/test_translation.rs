//! Translation integration tests.
//!
//! The happy path needs the server's translation service to be reachable.

#[cfg(test)]
mod tests {
    use crate::{client, create_review, test_movie_id, test_reviewer_name, url};

    #[tokio::test]
    #[ignore = "requires running server and translation service"]
    async fn test_should_translate_review_content() {
        let client = client();
        let movie_id = test_movie_id();
        let name = test_reviewer_name("tr");
        create_review(&client, movie_id, &name, 4.0, "A wonderful film").await;

        let resp = client
            .get(url(&format!(
                "/reviews/{name}/{movie_id}/translation?language=fr"
            )))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["data"]["reviewerName"], name.as_str());
        assert_ne!(json["data"]["content"], "A wonderful film");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_refuse_to_translate_empty_content() {
        let client = client();
        let movie_id = test_movie_id();
        let name = test_reviewer_name("empty");
        create_review(&client, movie_id, &name, 2.0, "").await;

        let resp = client
            .get(url(&format!(
                "/reviews/{name}/{movie_id}/translation?language=de"
            )))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(
            json["Message"],
            "Unable to translate as movie review has no content"
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_require_language_parameter() {
        let client = client();
        let resp = client
            .get(url(&format!(
                "/reviews/anyone/{}/translation",
                test_movie_id()
            )))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["schema"], "TranslationQueryParams");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_missing_review_for_translation() {
        let client = client();
        let resp = client
            .get(url(&format!(
                "/reviews/{}/{}/translation?language=fr",
                test_reviewer_name("ghost"),
                test_movie_id()
            )))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(
            json["Message"],
            "No movie review found for the specified movie id/ reviewer name"
        );
    }
}
