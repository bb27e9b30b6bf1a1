//! Review read and write integration tests against a running server.

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{client, create_review, test_movie_id, test_reviewer_name, url};

    async fn get_json(client: &reqwest::Client, path: &str) -> (reqwest::StatusCode, Value) {
        let resp = client.get(url(path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_fetch_review_by_reviewer() {
        let client = client();
        let movie_id = test_movie_id();
        let name = test_reviewer_name("ann");

        let created = create_review(&client, movie_id, &name, 4.5, "Sharp and funny").await;
        assert_eq!(created["data"]["reviewerName"], name.as_str());
        let date = created["data"]["reviewDate"].as_str().unwrap().to_owned();
        assert_eq!(date.len(), 10);

        let (status, json) = get_json(&client, &format!("/movies/{movie_id}/reviews/{name}")).await;
        assert_eq!(status, reqwest::StatusCode::OK);
        assert!(json["data"].is_object());
        assert_eq!(json["data"]["content"], "Sharp and funny");
        assert_eq!(json["data"]["rating"], 4.5);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_and_filter_movie_reviews() {
        let client = client();
        let movie_id = test_movie_id();
        create_review(&client, movie_id, &test_reviewer_name("a"), 2.0, "Slow").await;
        create_review(&client, movie_id, &test_reviewer_name("b"), 4.0, "Good").await;
        create_review(&client, movie_id, &test_reviewer_name("c"), 5.0, "Great").await;

        let (status, json) = get_json(&client, &format!("/movies/{movie_id}/reviews")).await;
        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(3));

        let (status, json) =
            get_json(&client, &format!("/movies/{movie_id}/reviews?minRating=4")).await;
        assert_eq!(status, reqwest::StatusCode::OK);
        let items = json["data"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|r| r["rating"].as_f64().unwrap() >= 4.0));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fetch_reviews_by_year() {
        let client = client();
        let movie_id = test_movie_id();
        let created = create_review(&client, movie_id, &test_reviewer_name("y"), 3.0, "Ok").await;
        let year = created["data"]["reviewDate"].as_str().unwrap()[..4].to_owned();

        let (status, json) = get_json(&client, &format!("/movies/{movie_id}/reviews/{year}")).await;
        assert_eq!(status, reqwest::StatusCode::OK);
        assert!(json["data"].is_array());

        let (status, json) = get_json(&client, &format!("/movies/{movie_id}/reviews/1900")).await;
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
        assert_eq!(
            json["Message"],
            "No movie reviews for specified year found for the movie"
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_update_review_in_place() {
        let client = client();
        let movie_id = test_movie_id();
        let name = test_reviewer_name("upd");
        create_review(&client, movie_id, &name, 1.0, "Hated it").await;

        let resp = client
            .put(url(&format!("/movies/{movie_id}/reviews/{name}")))
            .json(&serde_json::json!({"content": "Grew on me", "rating": 3}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let (_, json) = get_json(&client, &format!("/movies/{movie_id}/reviews")).await;
        let items = json["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["content"], "Grew on me");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_all_reviews_by_reviewer() {
        let client = client();
        let name = test_reviewer_name("scan");
        let first = test_movie_id();
        let second = test_movie_id();
        create_review(&client, first, &name, 3.0, "One").await;
        create_review(&client, second, &name, 4.0, "Two").await;

        let (status, json) = get_json(&client, &format!("/reviews/{name}")).await;
        assert_eq!(status, reqwest::StatusCode::OK);
        let items = json["data"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|r| r["reviewerName"] == name.as_str()));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_health_check() {
        let client = client();
        let (status, json) = get_json(&client, "/health").await;
        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(json["status"], "running");
    }
}
