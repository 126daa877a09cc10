//! HTTP client for the upstream API.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sharedesk_shared::{AccessToken, UpstreamConfig};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::wire::ErrorBody;

/// Upstream API client.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<AccessToken>,
}

impl ApiClient {
    /// Creates an anonymous client from the upstream configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Returns a copy of this client that sends `token` as a bearer token.
    #[must_use]
    pub fn authorized(&self, token: AccessToken) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn with_token(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    /// Sends a JSON `POST` and decodes the JSON answer.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST upstream");
        let request = self.with_token(self.http.post(self.url(path)).json(body));
        decode(path, request.send().await?).await
    }

    /// Sends a bodiless `POST` and decodes the JSON answer.
    pub(crate) async fn post_empty<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        debug!(path, "POST upstream");
        let request = self.with_token(self.http.post(self.url(path)));
        decode(path, request.send().await?).await
    }

    /// Sends a JSON `POST` and ignores the answer body.
    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        debug!(path, "POST upstream");
        let request = self.with_token(self.http.post(self.url(path)).json(body));
        check_status(path, request.send().await?).await.map(drop)
    }

    /// Sends a `GET` with query parameters and decodes the JSON answer.
    pub(crate) async fn get<Q, T>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "GET upstream");
        let request = self.with_token(self.http.get(self.url(path)).query(query));
        decode(path, request.send().await?).await
    }
}

async fn check_status(path: &str, response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        warn!(path, status = status.as_u16(), "Upstream refused the session");
        return Err(ClientError::Unauthorized);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Upstream error")
                .to_string()
        });
    warn!(path, status = status.as_u16(), message = %message, "Upstream returned an error");
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ClientError> {
    let response = check_status(path, response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(format!("{path}: {e}")))
}
