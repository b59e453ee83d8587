//! Shared request plumbing for the marketplace API

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use giglink_core::config::schema::ApiConfig;
use giglink_core::session::AuthSession;
use giglink_core::utils::truncate;

use crate::conversations::ConversationsApi;
use crate::error::{ApiError, ApiResult};
use crate::favorites::FavoritesApi;
use crate::orders::OrdersApi;
use crate::profiles::ProfilesApi;
use crate::proposals::ProposalsApi;
use crate::stats::StatsApi;

/// Client for the marketplace REST API
///
/// Cheap to clone via the per-resource accessors; holds the auth session
/// it was created with for the lifetime of the login.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<AuthSession>,
}

impl ApiClient {
    /// Create a new API client for one authenticated session
    pub fn new(config: &ApiConfig, session: Arc<AuthSession>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// The session this client authenticates as
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn conversations(&self) -> ConversationsApi<'_> {
        ConversationsApi::new(self)
    }

    pub fn orders(&self) -> OrdersApi<'_> {
        OrdersApi::new(self)
    }

    pub fn proposals(&self) -> ProposalsApi<'_> {
        ProposalsApi::new(self)
    }

    pub fn profiles(&self) -> ProfilesApi<'_> {
        ProfilesApi::new(self)
    }

    pub fn favorites(&self) -> FavoritesApi<'_> {
        FavoritesApi::new(self)
    }

    pub fn stats(&self) -> StatsApi<'_> {
        StatsApi::new(self)
    }

    /// Unauthenticated reachability probe
    pub async fn health(&self) -> ApiResult<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.http.get(&url).send().await?;
        self.expect_ok(response, "/health").await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.get_with_query(path, &[]).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .header(reqwest::header::AUTHORIZATION, self.session.bearer())
            .query(query)
            .send()
            .await?;
        self.decode(response, path).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .header(reqwest::header::AUTHORIZATION, self.session.bearer())
            .json(body)
            .send()
            .await?;
        self.decode(response, path).await
    }

    /// POST without a response body, for actions like mark-read
    pub(crate) async fn post_action(&self, path: &str) -> ApiResult<()> {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .header(reqwest::header::AUTHORIZATION, self.session.bearer())
            .send()
            .await?;
        self.expect_ok(response, path).await
    }

    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        debug!(path, "DELETE");
        let response = self
            .http
            .delete(self.url(path))
            .header(reqwest::header::AUTHORIZATION, self.session.bearer())
            .send()
            .await?;
        self.expect_ok(response, path).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response, path: &str) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }
        Err(self.status_error(status, response, path).await)
    }

    async fn expect_ok(&self, response: Response, path: &str) -> ApiResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.status_error(status, response, path).await)
    }

    async fn status_error(&self, status: StatusCode, response: Response, path: &str) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => ApiError::Unauthorized(status.as_u16()),
            404 => ApiError::NotFound(path.to_string()),
            429 => ApiError::RateLimited,
            s if status.is_server_error() => ApiError::Server(s),
            s => ApiError::Unexpected {
                status: s,
                body: truncate(&body, 200),
            },
        }
    }
}
