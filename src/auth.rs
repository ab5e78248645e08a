//! Authentication and the user/entitlement snapshot.
//!
//! The snapshot is refreshed from the server after state-changing
//! requests rather than mutated locally, so cached entitlement state
//! cannot drift. The one exception is the post-subscription optimistic
//! paid flag set by `entitlement::paywall`.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::api::{ApiClient, error_message};
use crate::error::AuthError;

/// Identity and entitlement state for the signed-in user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSnapshot {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub free_sample_used: bool,
}

#[derive(serde::Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Fetch the current user, or `None` when unauthenticated.
pub async fn current_user(api: &ApiClient) -> Result<Option<UserSnapshot>, AuthError> {
    let resp = api.get("/api/current_user").await?;
    if !resp.status().is_success() {
        return Ok(None);
    }
    // An anonymous session answers with an empty object.
    let value: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| crate::error::ApiError::InvalidBody(e.to_string()))?;
    if value.get("id").and_then(|v| v.as_str()).is_none() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| crate::error::ApiError::InvalidBody(e.to_string()).into())
}

pub async fn login(
    api: &ApiClient,
    email: &str,
    password: &SecretString,
) -> Result<UserSnapshot, AuthError> {
    credentials_request(api, "/api/login", email, password).await
}

pub async fn signup(
    api: &ApiClient,
    email: &str,
    password: &SecretString,
) -> Result<UserSnapshot, AuthError> {
    credentials_request(api, "/api/signup", email, password).await
}

async fn credentials_request(
    api: &ApiClient,
    path: &str,
    email: &str,
    password: &SecretString,
) -> Result<UserSnapshot, AuthError> {
    let body = Credentials {
        email,
        password: password.expose_secret(),
    };
    let resp = api.post(path, &body).await?;
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(AuthError::Rejected(error_message(&text, status.as_u16())));
    }
    // The user object may be the body itself or nested under `user`.
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| crate::error::ApiError::InvalidBody(e.to_string()))?;
    let user = value.get("user").cloned().unwrap_or(value);
    serde_json::from_value(user).map_err(|e| crate::error::ApiError::InvalidBody(e.to_string()).into())
}

/// Request a password reset. The dev backend returns the token directly.
pub async fn request_password_reset(
    api: &ApiClient,
    email: &str,
) -> Result<Option<String>, AuthError> {
    let resp = api
        .post("/api/request-password-reset", &serde_json::json!({"email": email}))
        .await?;
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(AuthError::Rejected(error_message(&text, status.as_u16())));
    }
    #[derive(Deserialize)]
    struct Ack {
        #[serde(default)]
        token: Option<String>,
    }
    let ack: Ack = serde_json::from_str(&text)
        .map_err(|e| crate::error::ApiError::InvalidBody(e.to_string()))?;
    Ok(ack.token)
}

pub async fn confirm_password_reset(
    api: &ApiClient,
    token: &str,
    password: &SecretString,
) -> Result<(), AuthError> {
    let body = serde_json::json!({
        "token": token,
        "password": password.expose_secret(),
    });
    let resp = api.post("/api/confirm-password-reset", &body).await?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(AuthError::Rejected(error_message(&text, status.as_u16())));
    }
    Ok(())
}
