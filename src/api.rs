//! HTTP client for the backend contract.
//!
//! Thin wrapper over `reqwest` with a cookie store — the backend scopes
//! the profile and the signed-in user to a session cookie. Domain modules
//! own their endpoint payloads; this module owns transport and the shared
//! error-body convention (`{error}`, optionally `{errors: {field: msg}}`).

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Client for one backend session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET returning the raw response. Transport failures only.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        Ok(self.http.get(self.url(path)).send().await?)
    }

    /// GET with `Cache-Control: no-store` — used for the static content
    /// documents so a fresh load is always requested.
    pub async fn get_no_store(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        Ok(self
            .http
            .get(self.url(path))
            .header("Cache-Control", "no-store")
            .send()
            .await?)
    }

    /// GET decoding a JSON body; non-success statuses become
    /// [`ApiError::Status`] with the server's `error` message when present.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.get(path).await?;
        Self::decode(resp).await
    }

    /// POST a JSON body returning the raw response. Callers that assign
    /// meaning to specific statuses (save, generate) use this.
    pub async fn post(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<reqwest::Response, ApiError> {
        Ok(self.http.post(self.url(path)).json(body).send().await?)
    }

    /// POST with URL query parameters, returning the raw response.
    pub async fn post_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &impl Serialize,
    ) -> Result<reqwest::Response, ApiError> {
        Ok(self
            .http
            .post(self.url(path))
            .query(query)
            .json(body)
            .send()
            .await?)
    }

    /// POST a JSON body and decode a JSON response, mapping non-success
    /// statuses to [`ApiError::Status`].
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let resp = self.post(path, body).await?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::status_error(status.as_u16(), resp).await);
        }
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::InvalidBody(e.to_string()))
    }

    /// Build a status error, pulling the `error` field out of a JSON body
    /// when the server sent one.
    pub async fn status_error(status: u16, resp: reqwest::Response) -> ApiError {
        let body = resp.text().await.unwrap_or_default();
        ApiError::Status {
            status,
            message: error_message(&body, status),
        }
    }
}

/// Extract the server's `error` message from a response body, falling back
/// to a generic HTTP-status text.
pub fn error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| format!("HTTP {status}"))
}
