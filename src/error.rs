//! Error types for the Togetherly client.

use std::collections::BTreeMap;

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),
}

/// Configuration-load errors. Fatal to initialization — reported once.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not load config.json: {0}")]
    WizardConfig(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Transport and HTTP-contract errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    /// HTTP status of the failed request, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidBody(_) => None,
        }
    }
}

/// Profile-save errors. Validation failures are resolved at this boundary
/// and never retried silently.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Local validation rejected a field before any request was issued.
    #[error("{message}")]
    Invalid { field: String, message: String },

    /// The server rejected the draft, with optional per-field messages.
    #[error("{message}")]
    Rejected {
        message: String,
        field_errors: BTreeMap<String, String>,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SaveError {
    /// Message to show next to a specific field, if the failure carries one.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        match self {
            Self::Invalid { field: f, message } if f == field => Some(message),
            Self::Rejected { field_errors, .. } => field_errors.get(field).map(String::as_str),
            _ => None,
        }
    }
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Payment/subscription sub-flow errors. Any failure leaves entitlement
/// state unchanged.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment client initialization failed: {0}")]
    Init(String),

    #[error("Could not tokenize card: {0}")]
    Tokenize(String),

    #[error("Subscription was not created: {0}")]
    Subscribe(String),

    #[error("Card confirmation failed: {0}")]
    Confirm(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Generation-request errors, keyed to the tiered HTTP contract.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// 401 — the sign-in affordance should open.
    #[error("Sign in to generate content")]
    AuthRequired,

    /// 403 — the paywall affordance should open with the server's message.
    #[error("{message}")]
    EntitlementDenied { message: String },

    /// The gate blocked the request before any network call.
    #[error("{message}")]
    Gated { message: String },

    /// The draft could not be saved before generating.
    #[error("Profile save failed: {0}")]
    Save(#[from] SaveError),

    #[error("Generation failed (HTTP {status})")]
    Http { status: u16 },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
