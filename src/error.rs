use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;

use crate::processor::ProcessorError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authorization header missing")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("forbidden access")]
    Forbidden,
    #[error("unauthorize access")]
    IdentityMismatch,
    #[error("invalid action or quantity cannot be less than 1")]
    InvalidAction,
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("charge amount must be positive")]
    InvalidAmount,
    #[error("{0}")]
    MalformedRequest(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("payment processor error: {0}")]
    Upstream(#[from] ProcessorError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to issue token: {0}")]
    TokenIssue(jsonwebtoken::errors::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden | ApiError::IdentityMismatch => StatusCode::FORBIDDEN,
            ApiError::InvalidAction
            | ApiError::InvalidQuantity
            | ApiError::InvalidAmount
            | ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Store(_) | ApiError::TokenIssue(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            ApiError::Upstream(_) => {
                error!("{}", self);
                "Payment processor request failed".to_owned()
            }
            ApiError::Store(_) | ApiError::TokenIssue(_) => {
                error!("{}", self);
                "Internal Server Error".to_owned()
            }
            // Token failure detail stays in the log.
            ApiError::InvalidToken(reason) => {
                warn!("rejected token: {}", reason);
                "Forbidden Access".to_owned()
            }
            other => other.to_string(),
        };
        HttpResponse::build(status).json(ErrorBody { message })
    }
}
