//! Charge intents at the external payment processor.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("processor rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("processor response missing client secret")]
    MissingSecret,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargeIntent {
    pub id: String,
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Reserves `amount` minor units of `currency`.
    async fn create_intent(&self, amount: i64, currency: &str)
        -> Result<ChargeIntent, ProcessorError>;
}

/// Converts a decimal price into minor units, truncating fractions of a cent.
pub fn minor_units(price: f64) -> i64 {
    (price * 100.0).trunc() as i64
}

pub struct StripeProcessor {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeProcessor {
    pub fn new(api_base: &str, secret_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(StripeProcessor {
            client,
            api_base: api_base.trim_end_matches('/').to_owned(),
            secret_key: secret_key.to_owned(),
        })
    }
}

#[derive(Deserialize)]
struct IntentBody {
    id: String,
    client_secret: Option<String>,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<ChargeIntent, ProcessorError> {
        let form = [
            ("amount", amount.to_string()),
            ("currency", currency.to_owned()),
            ("payment_method_types[]", "card".to_owned()),
        ];
        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| status.to_string());
            return Err(ProcessorError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: IntentBody = response.json().await?;
        let client_secret = body.client_secret.ok_or(ProcessorError::MissingSecret)?;
        Ok(ChargeIntent {
            id: body.id,
            client_secret,
        })
    }
}
