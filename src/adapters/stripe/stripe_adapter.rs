//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe API using
//! form-encoded requests, and verifies webhook deliveries with the
//! provider's HMAC-SHA256 signing scheme.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::PaymentConfig;
use crate::domain::payment::{ProviderEvent, ProviderEventKind, WebhookError};
use crate::ports::{
    CardDetails, CreateIntentRequest, IntentConfirmation, PaymentError, PaymentErrorCode,
    PaymentIntentRef, PaymentProvider,
};

use super::webhook_types::{
    SignatureHeader, StripePaymentIntent, StripePaymentMethod, StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Timeout applied to every provider call.
    timeout: Duration,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Create configuration from the validated payment section.
    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self {
            api_key: SecretString::new(config.stripe_api_key.clone()),
            webhook_secret: SecretString::new(config.stripe_webhook_secret.clone()),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: Duration::from_secs(config.provider_timeout_secs),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    ///
    /// The HTTP client carries the configured timeout, so a hung provider
    /// call fails instead of wedging the request that made it.
    pub fn new(config: StripeConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
        }
    }

    /// POST a form-encoded request to the Stripe API and parse the response.
    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, PaymentError> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::timeout(format!("Stripe call timed out: {}", e))
                } else {
                    PaymentError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(path, status = %status, error = %error_text, "Stripe API call failed");
            let code = match status.as_u16() {
                401 | 403 => PaymentErrorCode::AuthenticationError,
                402 => PaymentErrorCode::CardDeclined,
                404 => PaymentErrorCode::NotFound,
                429 => PaymentErrorCode::RateLimitExceeded,
                _ => PaymentErrorCode::ProviderError,
            };
            return Err(
                PaymentError::new(code, format!("Stripe API error: {}", error_text))
                    .with_provider_code(status.as_str().to_string()),
            );
        }

        response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }

    /// Verify a webhook signature using HMAC-SHA256.
    ///
    /// # Security
    ///
    /// - Uses constant-time comparison to prevent timing attacks
    /// - Validates the timestamp to prevent replay attacks
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), WebhookError> {
        // 1. Validate timestamp (prevent replay attacks)
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(WebhookError::TimestampOutOfRange);
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Webhook event from future - clock skew or manipulation"
            );
            return Err(WebhookError::InvalidTimestamp);
        }

        // 2. Compute expected signature over "{timestamp}.{payload}"
        let signed_payload = format!("{}.{}", header.timestamp, String::from_utf8_lossy(payload));

        let mut mac =
            HmacSha256::new_from_slice(self.config.webhook_secret.expose_secret().as_bytes())
                .expect("HMAC can take key of any size");
        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();

        // 3. Constant-time comparison
        let expected_bytes: &[u8] = expected.as_slice();
        let provided_bytes: &[u8] = &header.v1_signature;

        if expected_bytes.len() != provided_bytes.len()
            || expected_bytes.ct_eq(provided_bytes).unwrap_u8() != 1
        {
            tracing::warn!("Invalid webhook signature");
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    fn card_params(card: &CardDetails) -> Vec<(String, String)> {
        vec![
            ("type".to_string(), "card".to_string()),
            ("card[number]".to_string(), card.number.clone()),
            ("card[exp_month]".to_string(), card.exp_month.to_string()),
            ("card[exp_year]".to_string(), card.exp_year.to_string()),
            ("card[cvc]".to_string(), card.cvc.clone()),
        ]
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<PaymentIntentRef, PaymentError> {
        let mut params = vec![
            ("amount".to_string(), request.amount_cents.to_string()),
            ("currency".to_string(), request.currency.clone()),
        ];
        for (key, value) in request.metadata.to_map() {
            params.push((format!("metadata[{}]", key), value));
        }

        let intent: StripePaymentIntent = self.post_form("/v1/payment_intents", &params).await?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentError::provider("Stripe intent response carried no client_secret")
        })?;

        tracing::debug!(payment_id = %intent.id, "Stripe payment intent created");

        Ok(PaymentIntentRef {
            provider_id: intent.id,
            client_secret,
        })
    }

    async fn create_payment_method(&self, card: CardDetails) -> Result<String, PaymentError> {
        let method: StripePaymentMethod = self
            .post_form("/v1/payment_methods", &Self::card_params(&card))
            .await?;

        Ok(method.id)
    }

    async fn confirm_intent(
        &self,
        provider_id: &str,
        method_token: &str,
    ) -> Result<IntentConfirmation, PaymentError> {
        let params = vec![("payment_method".to_string(), method_token.to_string())];

        let intent: StripePaymentIntent = self
            .post_form(
                &format!("/v1/payment_intents/{}/confirm", provider_id),
                &params,
            )
            .await?;

        Ok(IntentConfirmation {
            provider_id: intent.id,
            status: intent.status,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<ProviderEvent, WebhookError> {
        // 1. Parse the signature header
        let header = SignatureHeader::parse(signature)
            .map_err(|e| match e {
                super::webhook_types::SignatureParseError::MissingHeader => {
                    WebhookError::InvalidSignature
                }
                other => WebhookError::ParseError(other.to_string()),
            })?;

        // 2. Verify before touching the payload contents
        self.verify_signature(payload, &header)?;

        // 3. Parse the event envelope
        let event: StripeWebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::ParseError(format!("Invalid JSON: {}", e)))?;

        let kind = ProviderEventKind::parse(&event.event_type);

        // Payment events carry a PaymentIntent as their object; other kinds
        // pass through with whatever identifying fields they have.
        let (payment_id, metadata) = match kind {
            ProviderEventKind::PaymentSucceeded | ProviderEventKind::PaymentFailed => {
                let intent: StripePaymentIntent =
                    serde_json::from_value(event.data.object.clone()).map_err(|e| {
                        WebhookError::ParseError(format!("Invalid payment intent object: {}", e))
                    })?;
                (Some(intent.id), intent.metadata)
            }
            ProviderEventKind::Other(_) => (
                event.data.object["id"].as_str().map(String::from),
                HashMap::new(),
            ),
        };

        Ok(ProviderEvent {
            id: event.id,
            kind,
            payment_id,
            metadata,
            created: event.created,
        })
    }
}

/// Computes a valid signature header for test fixtures.
#[cfg(test)]
pub fn sign_test_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(signed_payload.as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
