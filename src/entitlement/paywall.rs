//! Paywall/subscription sub-flow.
//!
//! The external payment client is an opaque capability behind two traits:
//! a provider that performs the one-time initialization (fetch the
//! publishable key, load the script, mount the card input) and the
//! mounted client that tokenizes and confirms. Initialization is a
//! one-shot guarded acquire — repeated subscribe clicks short-circuit it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::api::{ApiClient, error_message};
use crate::error::PaymentError;

/// A mounted payment client able to tokenize the card input and confirm
/// a payment intent.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Tokenize the card into a payment-method identifier.
    async fn tokenize_card(&self) -> Result<String, PaymentError>;

    /// Confirm a payment intent with the given client secret.
    async fn confirm(&self, client_secret: &str) -> Result<(), PaymentError>;
}

/// Performs the one-time external-client initialization.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn initialize(
        &self,
        publishable_key: &str,
    ) -> Result<Arc<dyn PaymentClient>, PaymentError>;
}

#[derive(Deserialize)]
struct PublishableKey {
    #[serde(alias = "key")]
    publishable_key: String,
}

#[derive(Debug, Deserialize)]
struct SubscriptionAck {
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    subscription_id: Option<String>,
}

/// Result of a completed subscription purchase. The caller marks the user
/// paid optimistically and then refreshes the entitlement snapshot.
#[derive(Debug, Clone)]
pub struct SubscriptionOutcome {
    pub subscription_id: Option<String>,
    /// Whether a server-requested confirmation step ran.
    pub confirmed: bool,
}

/// Orchestrates the subscription purchase.
pub struct PaywallFlow {
    api: ApiClient,
    provider: Arc<dyn PaymentProvider>,
    client: OnceCell<Arc<dyn PaymentClient>>,
}

impl PaywallFlow {
    pub fn new(api: ApiClient, provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            api,
            provider,
            client: OnceCell::new(),
        }
    }

    /// Acquire the payment client, initializing it at most once per
    /// session. Safe to call repeatedly.
    pub async fn ensure_client(&self) -> Result<Arc<dyn PaymentClient>, PaymentError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let key: PublishableKey = self
                    .api
                    .get_json("/api/stripe-publishable-key")
                    .await
                    .map_err(|e| PaymentError::Init(e.to_string()))?;
                self.provider.initialize(&key.publishable_key).await
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Tokenize, create the subscription server-side, and confirm when the
    /// server requests it. Any failure aborts and leaves entitlement state
    /// unchanged.
    pub async fn subscribe(&self, price_id: &str) -> Result<SubscriptionOutcome, PaymentError> {
        let client = self.ensure_client().await?;
        let payment_method = client.tokenize_card().await?;

        let body = serde_json::json!({
            "price_id": price_id,
            "payment_method": payment_method,
        });
        let resp = self.api.post("/api/create-subscription", &body).await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(PaymentError::Subscribe(error_message(
                &text,
                status.as_u16(),
            )));
        }
        let ack: SubscriptionAck =
            serde_json::from_str(&text).map_err(|e| PaymentError::Subscribe(e.to_string()))?;

        let confirmed = match &ack.client_secret {
            Some(secret) => {
                client.confirm(secret).await?;
                true
            }
            None => false,
        };

        Ok(SubscriptionOutcome {
            subscription_id: ack.subscription_id,
            confirmed,
        })
    }

    /// Open a billing-portal session for an existing subscriber.
    pub async fn portal_session(&self) -> Result<String, PaymentError> {
        #[derive(Deserialize)]
        struct Portal {
            url: String,
        }
        let portal: Portal = self
            .api
            .post_json("/api/create-portal-session", &serde_json::json!({}))
            .await?;
        Ok(portal.url)
    }
}
