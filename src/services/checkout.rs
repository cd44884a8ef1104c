//! Charge intents and payment reconciliation.

use std::sync::Arc;

use chrono::Utc;
use log::{error, info};

use crate::error::ApiError;
use crate::models::{
    new_id, strip, CartItem, IntentResponse, Payment, PaymentInput, PaymentStatus, Reconciliation,
};
use crate::processor::{minor_units, PaymentProcessor};
use crate::services::owner_email;
use crate::store::{set_field, DeleteOutcome, DocumentStore, FieldFilter, UpdateOutcome};
use crate::token::Identity;

#[derive(Clone)]
pub struct Checkout {
    payments: Arc<dyn DocumentStore<Payment>>,
    carts: Arc<dyn DocumentStore<CartItem>>,
    processor: Arc<dyn PaymentProcessor>,
    currency: String,
}

impl Checkout {
    pub fn new(
        payments: Arc<dyn DocumentStore<Payment>>,
        carts: Arc<dyn DocumentStore<CartItem>>,
        processor: Arc<dyn PaymentProcessor>,
        currency: impl Into<String>,
    ) -> Self {
        Checkout {
            payments,
            carts,
            processor,
            currency: currency.into(),
        }
    }

    pub async fn create_intent(&self, price: f64) -> Result<IntentResponse, ApiError> {
        let amount = minor_units(price);
        if amount <= 0 {
            return Err(ApiError::InvalidAmount);
        }
        let intent = self.processor.create_intent(amount, &self.currency).await?;
        info!("created charge intent {} for {} {}", intent.id, amount, self.currency);
        Ok(IntentResponse {
            client_secret: intent.client_secret,
        })
    }

    /// Records the payment, then clears the purchased cart entries.
    ///
    /// The two writes are not transactional: if the second one fails the
    /// payment stays recorded and the cart entries remain.
    pub async fn record(
        &self,
        identity: &Identity,
        input: PaymentInput,
    ) -> Result<Reconciliation, ApiError> {
        let payment = Payment {
            id: new_id(),
            email: owner_email(identity, input.email)?,
            cart_ids: input.cart_ids,
            amount: input.amount,
            status: PaymentStatus::Pending,
            date: Utc::now(),
            extra: strip(input.extra, &["_id", "status", "date"]),
        };

        let payment_result = self.payments.insert(&payment).await?;

        let delete_result = if payment.cart_ids.is_empty() {
            DeleteOutcome::new(0)
        } else {
            self.carts
                .delete_many_by_ids(&payment.cart_ids)
                .await
                .map_err(|e| {
                    error!(
                        "payment {} recorded but cart entries {:?} were not cleared: {}",
                        payment.id, payment.cart_ids, e
                    );
                    ApiError::from(e)
                })?
        };

        info!(
            "payment {} recorded for {}, cleared {} cart entries",
            payment.id, payment.email, delete_result.deleted_count
        );
        Ok(Reconciliation {
            payment_result,
            delete_result,
        })
    }

    pub async fn list(&self, filter: Option<FieldFilter>) -> Result<Vec<Payment>, ApiError> {
        Ok(self.payments.find(filter).await?)
    }

    /// Moves a payment to `paid`. There is no way back to `pending`.
    pub async fn mark_paid(&self, id: &str) -> Result<UpdateOutcome, ApiError> {
        Ok(self
            .payments
            .update_by_id(id, set_field("status", "paid"), false)
            .await?)
    }
}
