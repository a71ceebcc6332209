use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use shared_types::{SearchError, SearchQuery, SearchResponse, SearchResult, ToQueryPairs};
use tracing::debug;

use crate::config::ApiConfig;
use crate::search::SearchExecutor;

/// Client for the Reed job search API.
pub struct ReedClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReedClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> Result<Url, SearchError> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Url::parse(&base)
            .and_then(|url| url.join("search"))
            .map_err(|e| SearchError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }
}

#[async_trait]
impl SearchExecutor for ReedClient {
    async fn execute(&self, query: SearchQuery) -> Result<SearchResult, SearchError> {
        let url = self.search_url()?;
        let pairs = query.to_query_pairs();
        debug!("GET {} with {} query parameters", url, pairs.len());

        let mut request = self.client.get(url).query(&pairs);
        if let Some(api_key) = &self.api_key {
            request = request.basic_auth(api_key, Some(""));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        let response: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Decode(e.to_string()))?;

        debug!(
            "Received {} of {} listings",
            response.results.len(),
            response.total_results
        );

        Ok(SearchResult { query, response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn listing_json(job_id: i64, date: &str) -> serde_json::Value {
        json!({
            "jobId": job_id,
            "employerId": 629,
            "employerName": "Acme Recruitment",
            "jobTitle": "iOS Developer",
            "locationName": "London",
            "minimumSalary": 30000.0,
            "maximumSalary": 45000.0,
            "currency": "GBP",
            "expirationDate": "30/09/2021",
            "date": date,
            "jobDescription": "Build apps",
            "applications": 4,
            "jobUrl": "https://www.reed.co.uk/jobs/43554321"
        })
    }

    #[tokio::test]
    async fn test_search_sends_query_and_auth() {
        let mut server = Server::new_async().await;
        let body = json!({
            "results": [listing_json(43554321, "12/08/2021")],
            "totalResults": 1
        });

        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("keywords".into(), "iOS Developer".into()),
                Matcher::UrlEncoded("locationName".into(), "London".into()),
                Matcher::UrlEncoded("resultsToTake".into(), "25".into()),
                Matcher::UrlEncoded("resultsToSkip".into(), "0".into()),
            ]))
            .match_header("authorization", "Basic c2VjcmV0Og==")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = ReedClient::new(server.url(), Some("secret".to_string()));
        let query = SearchQuery {
            location_name: Some("London".to_string()),
            ..SearchQuery::default()
        }
        .for_page("iOS Developer", 0);

        let result = client.execute(query.clone()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.query, query);
        assert_eq!(result.response.total_results, 1);
        assert_eq!(result.response.results[0].job_id, 43554321);
        assert_eq!(result.response.results[0].currency.as_deref(), Some("GBP"));
    }

    #[tokio::test]
    async fn test_base_url_with_path_keeps_prefix() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/1.0/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"results": [], "totalResults": 0}).to_string())
            .create_async()
            .await;

        let client = ReedClient::new(format!("{}/api/1.0", server.url()), None);
        assert!(client.base_url().ends_with("/api/1.0"));
        let result = client.execute(SearchQuery::new().for_page("rust", 0)).await.unwrap();

        mock.assert_async().await;
        assert!(result.response.results.is_empty());
    }

    #[tokio::test]
    async fn test_non_ok_status_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = ReedClient::new(server.url(), None);
        let error = client
            .execute(SearchQuery::new().for_page("rust", 0))
            .await
            .unwrap_err();

        assert_eq!(error, SearchError::Status(500));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"results\": [")
            .create_async()
            .await;

        let client = ReedClient::new(server.url(), None);
        let error = client
            .execute(SearchQuery::new().for_page("rust", 0))
            .await
            .unwrap_err();

        assert!(matches!(error, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unexpected_date_format_is_decode_error() {
        let mut server = Server::new_async().await;
        let body = json!({
            "results": [listing_json(1, "2021-08-12")],
            "totalResults": 1
        });
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = ReedClient::new(server.url(), None);
        let error = client
            .execute(SearchQuery::new().for_page("rust", 0))
            .await
            .unwrap_err();

        assert!(matches!(error, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let client = ReedClient::new("not a url", None);
        let error = client
            .execute(SearchQuery::new().for_page("rust", 0))
            .await
            .unwrap_err();

        assert!(matches!(error, SearchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // port 9 (discard) is not expected to be listening
        let client = ReedClient::new("http://127.0.0.1:9/", None);
        let error = client
            .execute(SearchQuery::new().for_page("rust", 0))
            .await
            .unwrap_err();

        assert!(matches!(error, SearchError::Transport(_)));
    }
}
