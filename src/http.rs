//! HTTP request core.
//!
//! Every backend call goes through [`HttpClient`]: it joins the configured
//! base URL with an endpoint path, injects the bearer token from the
//! session store, negotiates JSON vs multipart encoding and maps non-2xx
//! responses onto [`ApiError`]. The cookie store is enabled so the bearer
//! token travels alongside same-origin cookies, matching backends that
//! accept either credential.
//!
//! This layer is deliberately free of navigation side effects; reacting to
//! 401/403 belongs to [`crate::routes::ErrorBoundary`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::session::SessionStore;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, store: Arc<SessionStore>) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.execute(self.builder(Method::GET, endpoint)).await
    }

    pub async fn get_query<T, Q>(&self, endpoint: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(self.builder(Method::GET, endpoint).query(query))
            .await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.builder(Method::POST, endpoint).json(body))
            .await
    }

    /// POST with no payload (restore, return, logout).
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.execute(self.builder(Method::POST, endpoint)).await
    }

    /// POST with no payload, tolerating an empty 2xx body (204 logout).
    pub async fn post_no_content(&self, endpoint: &str) -> ApiResult<()> {
        self.execute_no_content(self.builder(Method::POST, endpoint))
            .await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.builder(Method::PUT, endpoint).json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.execute(self.builder(Method::DELETE, endpoint)).await
    }

    /// Multipart POST. Content-type is left to reqwest so the form
    /// boundary is set correctly.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
    ) -> ApiResult<T> {
        self.execute(self.builder(Method::POST, endpoint).multipart(form))
            .await
    }

    /// Multipart PUT, same encoding rules as [`Self::post_multipart`].
    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
    ) -> ApiResult<T> {
        self.execute(self.builder(Method::PUT, endpoint).multipart(form))
            .await
    }

    /// Lightweight reachability probe. True on any 2xx from the endpoint;
    /// never raises.
    pub async fn probe(&self, endpoint: &str) -> bool {
        match self.client.get(self.url(endpoint)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn builder(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(endpoint));
        // The Authorization header is omitted entirely when no token is
        // stored; an empty bearer value is never sent.
        match self.store.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        let bytes = response.bytes().await.map_err(ApiError::from)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn execute_no_content(&self, builder: RequestBuilder) -> ApiResult<()> {
        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        Ok(())
    }
}
