//! Error response integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, test_movie_id, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_message_for_unknown_movie() {
        let client = client();
        let resp = client
            .get(url(&format!("/movies/{}/reviews", test_movie_id())))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
        assert!(resp.headers().contains_key("x-request-id"));
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json, serde_json::json!({"Message": "Invalid movie Id"}));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_missing_identifier_for_non_numeric_movie() {
        let client = client();
        let resp = client
            .get(url("/movies/abc/reviews/ann"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["Message"], "Missing movie Id");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_schema_error_for_invalid_body() {
        let client = client();
        let resp = client
            .post(url("/movies"))
            .json(&serde_json::json!({"movieId": "one", "rating": 3}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["schema"], "MovieReview");
        assert!(!json["violations"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_schema_error_for_invalid_min_rating() {
        let client = client();
        let resp = client
            .get(url(&format!(
                "/movies/{}/reviews?minRating=high",
                test_movie_id()
            )))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["schema"], "MovieReviewsQueryParams");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_unparseable_body() {
        let client = client();
        let resp = client
            .post(url("/movies"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert!(json["Message"].is_string());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_unknown_route_and_method() {
        let client = client();
        let resp = client.get(url("/films")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        let resp = client.delete(url("/movies")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }
}
