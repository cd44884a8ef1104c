//! The user directory: signup, role lookups and admin role changes.

use std::sync::Arc;

use log::{info, warn};

use crate::error::ApiError;
use crate::models::{new_id, strip, DuplicateSignUp, Role, SignUpInput, SignUpOutcome, User};
use crate::store::{set_field, DeleteOutcome, DocumentStore, FieldFilter, StoreError, UpdateOutcome};

const ALREADY_EXISTS: &str = "user already exits";

#[derive(Clone)]
pub struct Directory {
    users: Arc<dyn DocumentStore<User>>,
}

impl Directory {
    pub fn new(users: Arc<dyn DocumentStore<User>>) -> Self {
        Directory { users }
    }

    /// Registers a new user. A second signup for the same email is answered
    /// with a marker carrying a null `insertedId` and leaves the directory
    /// untouched.
    pub async fn sign_up(&self, input: SignUpInput) -> Result<SignUpOutcome, ApiError> {
        if self.find(&input.email).await?.is_some() {
            return Ok(already_exists());
        }

        let role = match input.role {
            Some(Role::Admin) => {
                warn!("signup for {} requested admin role, storing as user", input.email);
                Role::User
            }
            Some(role) => role,
            None => Role::User,
        };
        let user = User {
            id: new_id(),
            email: input.email,
            role: Some(role),
            extra: strip(input.extra, &["_id", "role"]),
        };

        match self.users.insert(&user).await {
            Ok(outcome) => {
                info!("registered {} as {}", user.email, role.as_str());
                Ok(SignUpOutcome::Created(outcome))
            }
            // Lost a race with a concurrent signup for the same email.
            Err(StoreError::Duplicate(_)) => Ok(already_exists()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self.users.find_one(FieldFilter::eq("email", email)).await?)
    }

    pub async fn has_role(&self, email: &str, role: Role) -> Result<bool, ApiError> {
        Ok(self
            .find(email)
            .await?
            .map(|user| user.effective_role() == role)
            .unwrap_or(false))
    }

    /// Allows the request only when `email` has a directory record whose role
    /// is exactly `required`.
    pub async fn authorize(&self, email: &str, required: Role) -> Result<User, ApiError> {
        match self.find(email).await? {
            Some(user) if user.effective_role() == required => Ok(user),
            Some(user) => {
                warn!(
                    "{} with role {} denied {} route",
                    email,
                    user.effective_role().as_str(),
                    required.as_str()
                );
                Err(ApiError::Forbidden)
            }
            None => {
                warn!("{} has no directory record, denied {} route", email, required.as_str());
                Err(ApiError::Forbidden)
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.find(None).await?)
    }

    pub async fn assign_role(&self, id: &str, role: Role) -> Result<UpdateOutcome, ApiError> {
        let outcome = self
            .users
            .update_by_id(id, set_field("role", role.as_str()), false)
            .await?;
        info!("role of user {} set to {}", id, role.as_str());
        Ok(outcome)
    }

    pub async fn remove(&self, id: &str) -> Result<DeleteOutcome, ApiError> {
        Ok(self.users.delete_by_id(id).await?)
    }
}

fn already_exists() -> SignUpOutcome {
    SignUpOutcome::AlreadyExists(DuplicateSignUp {
        message: ALREADY_EXISTS,
        inserted_id: None,
    })
}
