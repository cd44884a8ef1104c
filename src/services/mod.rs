use crate::error::ApiError;
use crate::token::Identity;

pub mod cart;
pub mod checkout;
pub mod directory;

pub use cart::Carts;
pub use checkout::Checkout;
pub use directory::Directory;

/// Resolves the owner of a document written on behalf of `identity`.
///
/// A missing email defaults to the caller; an email naming someone else is
/// refused.
pub fn owner_email(identity: &Identity, claimed: Option<String>) -> Result<String, ApiError> {
    match claimed {
        Some(email) if email != identity.email => Err(ApiError::IdentityMismatch),
        Some(email) => Ok(email),
        None => Ok(identity.email.clone()),
    }
}
