//! REST client for the marketplace API.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;
use url::Url;

use super::{ApiError, Envelope, ListPayload, ListQuery, Page};
use crate::config::MarketplaceApiConfig;

/// Header carrying the deployment's fixed API key.
const API_KEY_HEADER: &str = "X-API-Key";

/// Marketplace REST API client.
///
/// The API key is attached to every request as a default header. The
/// admin's bearer token comes from their session and is passed per call;
/// the client itself holds no session state.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &MarketplaceApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| ApiError::Parse(format!("Invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        // Url::join drops the last path segment unless it ends with a slash
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Check that the API answers at all. Any HTTP status counts.
    ///
    /// # Errors
    ///
    /// Returns `Http` if the API cannot be reached.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.inner.client.get(self.inner.base_url.clone()).send().await?;
        Ok(())
    }

    /// Resolve an endpoint path such as `/customer/list`.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the path does not form a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Parse(format!("Invalid endpoint {path}: {e}")))
    }

    /// Fetch one page from a list endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a list.
    #[instrument(skip(self, token), fields(page = query.page, per_page = query.per_page))]
    pub async fn list<T: DeserializeOwned>(
        &self,
        token: Option<&str>,
        path: &str,
        query: &ListQuery,
    ) -> Result<Page<T>, ApiError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());

        let payload: ListPayload<T> = self.get_url(token, url).await?;
        Ok(payload.into_page(query))
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        token: Option<&str>,
        path: &str,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.get_url(token, url).await
    }

    async fn get_url<T: DeserializeOwned>(
        &self,
        token: Option<&str>,
        url: Url,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.get(url);
        let response = with_bearer(request, token).send().await?;
        self.handle_response(response).await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        token: Option<&str>,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.post(self.endpoint(path)?).json(body);
        let response = with_bearer(request, token).send().await?;
        self.handle_response(response).await
    }

    /// Execute a PUT request with a JSON body.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        token: Option<&str>,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.put(self.endpoint(path)?).json(body);
        let response = with_bearer(request, token).send().await?;
        self.handle_response(response).await
    }

    /// Execute a DELETE request. The envelope's `data` is ignored.
    pub(crate) async fn delete(&self, token: Option<&str>, path: &str) -> Result<(), ApiError> {
        let request = self.inner.client.delete(self.endpoint(path)?);
        let response = with_bearer(request, token).send().await?;

        let status = response.status();
        if status.as_u16() == 204 {
            return Ok(());
        }
        if !status.is_success() {
            return Err(self.parse_error(response).await);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(());
        }
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")))?;
        if envelope.status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "The request was rejected".to_string()),
            ))
        }
    }

    /// Handle API response: check the HTTP status, then unwrap the envelope.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let envelope: Envelope<T> = response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")))?;
            return envelope.into_data();
        }

        Err(self.parse_error(response).await)
    }

    /// Parse error response from the API.
    async fn parse_error(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return ApiError::RateLimited(retry_after);
        }

        if status == 401 || status == 403 {
            return ApiError::Unauthorized;
        }

        if status == 404 {
            return ApiError::NotFound(response.url().path().to_string());
        }

        // Prefer the envelope's message over the raw body
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    body
                }
            });

        tracing::warn!(status, message = %message, "Marketplace API error");
        ApiError::Api { status, message }
    }
}

fn with_bearer(request: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
    match token {
        Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
        None => request,
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: String,
    }

    fn client_for(server: &MockServer) -> ApiClient {
        let config = MarketplaceApiConfig {
            base_url: Url::parse(&format!("{}/v1", server.uri())).unwrap(),
            api_key: SecretString::from("mk_test_7Hq2pLx9Zr4vB1nT"),
            timeout: Duration::from_secs(5),
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = MarketplaceApiConfig {
            base_url: Url::parse("https://api.marketplace.test/v1").unwrap(),
            api_key: SecretString::from("mk_test_7Hq2pLx9Zr4vB1nT"),
            timeout: Duration::from_secs(5),
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("/customer/list").unwrap().as_str(),
            "https://api.marketplace.test/v1/customer/list"
        );
    }

    #[tokio::test]
    async fn test_ping_accepts_any_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_sends_api_key_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/customer/c1"))
            .and(header("X-API-Key", "mk_test_7Hq2pLx9Zr4vB1nT"))
            .and(header("Authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "data": {"id": "c1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let thing: Thing = client_for(&server)
            .get(Some("tok-123"), "/customer/c1")
            .await
            .unwrap();
        assert_eq!(thing, Thing { id: "c1".into() });
    }

    #[tokio::test]
    async fn test_list_sends_query_and_normalizes_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/rider/list"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "1"))
            .and(query_param("search", "ada"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": true,
                "data": {"data": [{"id": "r2"}], "total": 3, "page": 2, "limit": 1}
            })))
            .mount(&server)
            .await;

        let query = ListQuery {
            page: 2,
            per_page: 1,
            search: Some("ada".into()),
            status: None,
        };
        let page: Page<Thing> = client_for(&server)
            .list(Some("tok"), "/rider/list", &query)
            .await
            .unwrap();
        assert_eq!(page.items, vec![Thing { id: "r2".into() }]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/banners/"))
            .and(body_json(serde_json::json!({"title": "Summer"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "status": "success",
                "data": {"id": "b9"}
            })))
            .mount(&server)
            .await;

        let created: Thing = client_for(&server)
            .post(Some("tok"), "/banners/", &serde_json::json!({"title": "Summer"}))
            .await
            .unwrap();
        assert_eq!(created.id, "b9");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/expired"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(path("/v1/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(path("/v1/busy"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;
        Mock::given(path("/v1/broken"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "status": false,
                "message": "Email already registered"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get::<Thing>(None, "/expired").await.unwrap_err();
        assert!(err.is_unauthorized());

        let err = client.get::<Thing>(None, "/missing").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = client.get::<Thing>(None, "/busy").await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited(7)));

        let err = client.get::<Thing>(None, "/broken").await.unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Email already registered");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejected_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/promotions/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "data": null,
                "message": "Promotion already expired"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .put::<Thing, _>(Some("tok"), "/promotions/p1", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref m) if m == "Promotion already expired"));
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_and_enveloped_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/recipe/r1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/recipe/r2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "data": null,
                "message": "Deleted"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete(Some("tok"), "/recipe/r1").await.unwrap();
        client.delete(Some("tok"), "/recipe/r2").await.unwrap();
    }
}
