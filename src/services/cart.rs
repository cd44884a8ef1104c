//! Cart entries and the quantity stepper.

use std::sync::Arc;

use log::warn;

use crate::error::ApiError;
use crate::models::{new_id, strip, CartAction, CartInput, CartItem, User};
use crate::services::owner_email;
use crate::store::{set_field, DeleteOutcome, DocumentStore, FieldFilter, InsertOutcome};
use crate::token::Identity;

/// The quantity that `action` moves `current` to, if the move is legal.
pub fn next_quantity(current: i64, action: CartAction) -> Option<i64> {
    match action {
        CartAction::Increment => current.checked_add(1),
        CartAction::Decrement if current > 1 => Some(current - 1),
        CartAction::Decrement => None,
    }
}

#[derive(Clone)]
pub struct Carts {
    items: Arc<dyn DocumentStore<CartItem>>,
    users: Arc<dyn DocumentStore<User>>,
}

impl Carts {
    pub fn new(
        items: Arc<dyn DocumentStore<CartItem>>,
        users: Arc<dyn DocumentStore<User>>,
    ) -> Self {
        Carts { items, users }
    }

    pub async fn add(
        &self,
        identity: &Identity,
        input: CartInput,
    ) -> Result<InsertOutcome, ApiError> {
        let email = owner_email(identity, input.email)?;
        let quantity = input.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(ApiError::InvalidQuantity);
        }
        let owner = self
            .users
            .find_one(FieldFilter::eq("email", email.as_str()))
            .await?;
        if owner.is_none() {
            warn!("cart entry refused for unregistered {}", email);
            return Err(ApiError::Forbidden);
        }

        let item = CartItem {
            id: new_id(),
            email,
            medicine_id: input.medicine_id,
            quantity,
            price: input.price,
            extra: strip(input.extra, &["_id"]),
        };
        Ok(self.items.insert(&item).await?)
    }

    pub async fn list_for(&self, email: &str) -> Result<Vec<CartItem>, ApiError> {
        Ok(self.items.find(Some(FieldFilter::eq("email", email))).await?)
    }

    /// Steps the quantity of one entry and returns the entry as stored
    /// afterwards.
    ///
    /// The read and the write are separate store calls, so two concurrent
    /// steps on the same entry can lose one of the updates.
    pub async fn adjust_quantity(
        &self,
        id: &str,
        action: CartAction,
    ) -> Result<CartItem, ApiError> {
        let current = self
            .items
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("cart"))?;
        let quantity = next_quantity(current.quantity, action).ok_or(ApiError::InvalidAction)?;

        let outcome = self
            .items
            .update_by_id(id, set_field("quantity", quantity), false)
            .await?;
        if outcome.matched_count == 0 {
            return Err(ApiError::NotFound("cart"));
        }

        self.items
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("cart"))
    }

    pub async fn remove(&self, id: &str) -> Result<DeleteOutcome, ApiError> {
        Ok(self.items.delete_by_id(id).await?)
    }
}
