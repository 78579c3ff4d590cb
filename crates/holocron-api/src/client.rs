//! The fetch seam and its HTTP implementation.
//!
//! [`GalaxyApi`] is the single abstraction over the archive: implementors
//! supply raw JSON fetching, the trait supplies the typed collection, lookup
//! and reference-resolution operations on top of it. [`GalaxyClient`] is the
//! reqwest-backed implementation; tests substitute recording fakes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{Kind, Page, ResourceUrl};

/// Access to the galaxy archive.
///
/// Every operation issues exactly one request, with no retry or fallback.
/// Reference tokens are resolved directly ([`GalaxyApi::resolve`]), bypassing
/// the paginated collection path.
#[async_trait]
pub trait GalaxyApi: Send + Sync {
    /// Base URL without a trailing slash.
    fn base_url(&self) -> &str;

    /// Fetch a URL and decode the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, ApiError>;

    /// One page of a collection: `GET <base>/<kind>/?page=<n>`.
    async fn list<T>(&self, kind: Kind, page: u32) -> Result<Page<T>, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let url = format!("{}/{}/?page={}", self.base_url(), kind.path(), page);
        let value = self
            .fetch_json(&url)
            .await
            .map_err(|e| e.in_collection(kind))?;
        serde_json::from_value(value).map_err(|e| ApiError::Collection {
            kind: kind.plural(),
            message: e.to_string(),
        })
    }

    /// A single entity by id: `GET <base>/<kind>/<id>/`.
    async fn get<T>(&self, kind: Kind, id: u64) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let url = format!("{}/{}/{}/", self.base_url(), kind.path(), id);
        let value = self
            .fetch_json(&url)
            .await
            .map_err(|e| e.for_resource(kind, id))?;
        serde_json::from_value(value).map_err(|e| ApiError::Resource {
            kind: kind.singular(),
            id,
            message: e.to_string(),
        })
    }

    /// Resolve a reference token as a fetch target.
    async fn resolve<T>(&self, token: &ResourceUrl) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let value = self
            .fetch_json(token.as_str())
            .await
            .map_err(|e| e.for_reference(token))?;
        serde_json::from_value(value).map_err(|e| ApiError::Reference {
            url: token.as_str().to_string(),
            message: e.to_string(),
        })
    }
}

/// HTTP client for the archive.
pub struct GalaxyClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl GalaxyClient {
    pub fn new(config: ApiConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to create HTTP client");

        Self { http, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait]
impl GalaxyApi for GalaxyClient {
    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, ApiError> {
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        response.json().await.map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Character, Film};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned-response fake that records every requested URL.
    struct FakeArchive {
        responses: HashMap<String, serde_json::Value>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeArchive {
        fn new(responses: Vec<(&str, serde_json::Value)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(url, value)| (url.to_string(), value))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GalaxyApi for FakeArchive {
        fn base_url(&self) -> &str {
            "https://galaxy.test/api"
        }

        async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, ApiError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| ApiError::Status {
                    status: 404,
                    url: url.to_string(),
                    message: "not found".to_string(),
                })
        }
    }

    fn people_page() -> serde_json::Value {
        serde_json::json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{ "name": "Luke Skywalker" }]
        })
    }

    #[tokio::test]
    async fn list_issues_one_request_to_the_collection_page() {
        let api = FakeArchive::new(vec![("https://galaxy.test/api/people/?page=1", people_page())]);

        let page: Page<Character> = api.list(Kind::People, 1).await.unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].name, "Luke Skywalker");
        assert_eq!(
            api.requested(),
            vec!["https://galaxy.test/api/people/?page=1".to_string()]
        );
    }

    #[tokio::test]
    async fn list_failure_carries_kind_and_cause() {
        let api = FakeArchive::new(vec![]);

        let err = api.list::<Character>(Kind::People, 1).await.unwrap_err();

        let rendered = err.to_string();
        assert!(rendered.contains("Cannot fetch characters"), "{rendered}");
        assert!(rendered.contains("404"), "{rendered}");
    }

    #[tokio::test]
    async fn get_builds_the_item_path_and_wraps_errors() {
        let api = FakeArchive::new(vec![(
            "https://galaxy.test/api/films/1/",
            serde_json::json!({ "title": "A New Hope", "episode_id": 4 }),
        )]);

        let film: Film = api.get(Kind::Films, 1).await.unwrap();
        assert_eq!(film.episode_id, 4);

        let err = api.get::<Film>(Kind::Films, 9).await.unwrap_err();
        assert!(err.to_string().contains("Cannot fetch film 9"));
    }

    #[tokio::test]
    async fn resolve_fetches_the_token_verbatim() {
        let api = FakeArchive::new(vec![(
            "https://elsewhere.test/starships/12/",
            serde_json::json!({ "name": "X-wing" }),
        )]);

        let ship: crate::models::Starship = api
            .resolve(&ResourceUrl::from("https://elsewhere.test/starships/12/"))
            .await
            .unwrap();

        assert_eq!(ship.name, "X-wing");
        assert_eq!(
            api.requested(),
            vec!["https://elsewhere.test/starships/12/".to_string()]
        );
    }

    #[tokio::test]
    async fn decode_mismatch_is_reported_with_context() {
        let api = FakeArchive::new(vec![(
            "https://galaxy.test/api/people/?page=1",
            serde_json::json!({ "unexpected": true }),
        )]);

        let err = api.list::<Character>(Kind::People, 1).await.unwrap_err();
        assert!(err.to_string().contains("Cannot fetch characters"));
    }
}
