//! Mock payment provider for development and tests.
//!
//! A scripted implementation of `PaymentProvider` that needs no network:
//! - Issues sequentially numbered intents (pi_1, pi_2, ...)
//! - Confirms according to the supplied token: "tok_success*" and "pm_*"
//!   succeed, everything else resolves "requires_payment_method"
//! - Returns a preconfigured webhook event; the literal signature
//!   "invalid" fails verification
//! - Records calls for assertions

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::payment::{ProviderEvent, WebhookError};
use crate::ports::{
    CardDetails, CreateIntentRequest, IntentConfirmation, PaymentError, PaymentErrorCode,
    PaymentIntentRef, PaymentProvider,
};

/// Scripted payment provider.
pub struct MockPaymentProvider {
    intent_counter: AtomicU32,
    fail_create: bool,
    fail_confirm: bool,
    webhook_event: Mutex<Option<ProviderEvent>>,
    created_requests: Mutex<Vec<CreateIntentRequest>>,
    confirmed: Mutex<Vec<(String, String)>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self {
            intent_counter: AtomicU32::new(0),
            fail_create: false,
            fail_confirm: false,
            webhook_event: Mutex::new(None),
            created_requests: Mutex::new(Vec::new()),
            confirmed: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose intent creation times out.
    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::new()
        }
    }

    /// A provider whose confirmation calls fail.
    pub fn failing_confirm() -> Self {
        Self {
            fail_confirm: true,
            ..Self::new()
        }
    }

    /// A provider that yields the given event on webhook verification.
    pub fn with_event(event: ProviderEvent) -> Self {
        let provider = Self::new();
        provider.set_event(event);
        provider
    }

    /// Replace the event returned by webhook verification.
    pub fn set_event(&self, event: ProviderEvent) {
        *self.webhook_event.lock().unwrap() = Some(event);
    }

    /// Intent creation requests seen so far.
    pub fn created_requests(&self) -> Vec<CreateIntentRequest> {
        self.created_requests.lock().unwrap().clone()
    }

    /// (provider_id, method_token) pairs confirmed so far.
    pub fn confirmed_calls(&self) -> Vec<(String, String)> {
        self.confirmed.lock().unwrap().clone()
    }
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<PaymentIntentRef, PaymentError> {
        if self.fail_create {
            return Err(PaymentError::timeout("Provider call timed out"));
        }
        let n = self.intent_counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.created_requests.lock().unwrap().push(request);
        Ok(PaymentIntentRef {
            provider_id: format!("pi_{}", n),
            client_secret: format!("pi_{}_secret", n),
        })
    }

    async fn create_payment_method(&self, card: CardDetails) -> Result<String, PaymentError> {
        if card.number.len() < 4 {
            return Err(PaymentError::new(
                PaymentErrorCode::InvalidCard,
                "Card number is required",
            ));
        }
        Ok(format!("pm_{}", &card.number[card.number.len() - 4..]))
    }

    async fn confirm_intent(
        &self,
        provider_id: &str,
        method_token: &str,
    ) -> Result<IntentConfirmation, PaymentError> {
        if self.fail_confirm {
            return Err(PaymentError::provider("Provider rejected the confirmation"));
        }
        self.confirmed
            .lock()
            .unwrap()
            .push((provider_id.to_string(), method_token.to_string()));
        let status = if method_token.starts_with("tok_success") || method_token.starts_with("pm_") {
            "succeeded"
        } else {
            "requires_payment_method"
        };
        Ok(IntentConfirmation {
            provider_id: provider_id.to_string(),
            status: status.to_string(),
        })
    }

    async fn verify_webhook(
        &self,
        _payload: &[u8],
        signature: &str,
    ) -> Result<ProviderEvent, WebhookError> {
        if signature == "invalid" {
            return Err(WebhookError::InvalidSignature);
        }
        self.webhook_event
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| WebhookError::ParseError("no event configured".to_string()))
    }
}
