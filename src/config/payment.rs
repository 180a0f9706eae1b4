//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Currencies the provider is allowed to settle in.
const SUPPORTED_CURRENCIES: &[&str] = &["usd", "eur", "gbp", "inr"];

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: String,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,

    /// Settlement currency for payment intents (ISO 4217, lowercase)
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Timeout for provider API calls, in seconds
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Verify key prefixes for safety
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if !SUPPORTED_CURRENCIES.contains(&self.currency.as_str()) {
            return Err(ValidationError::UnsupportedCurrency(self.currency.clone()));
        }

        if self.provider_timeout_secs == 0 {
            return Err(ValidationError::InvalidProviderTimeout);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            stripe_webhook_secret: String::new(),
            currency: default_currency(),
            provider_timeout_secs: default_provider_timeout(),
        }
    }
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_provider_timeout() -> u64 {
    15
}
