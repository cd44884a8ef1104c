use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::models::{Role, SignUpInput, SignUpOutcome};
use crate::state::AppState;
use crate::token::Identity;

pub async fn sign_up(
    state: web::Data<AppState>,
    input: web::Json<SignUpInput>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.directory.sign_up(input.into_inner()).await?;
    match outcome {
        SignUpOutcome::Created(_) => Ok(HttpResponse::Created().json(outcome)),
        SignUpOutcome::AlreadyExists(_) => Ok(HttpResponse::Ok().json(outcome)),
    }
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.directory.list().await?))
}

pub async fn delete_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.directory.remove(&id).await?))
}

pub async fn make_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.directory.assign_role(&id, Role::User).await?))
}

pub async fn make_seller(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.directory.assign_role(&id, Role::Seller).await?))
}

/// Answers `{ "<role>": bool }` for the caller's own email only.
async fn role_check(
    state: &AppState,
    identity: &Identity,
    email: &str,
    role: Role,
) -> Result<HttpResponse, ApiError> {
    if email != identity.email {
        return Err(ApiError::IdentityMismatch);
    }
    let holds = state.directory.has_role(email, role).await?;
    Ok(HttpResponse::Ok().json(json!({ role.as_str(): holds })))
}

pub async fn is_admin(
    state: web::Data<AppState>,
    identity: Identity,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    role_check(&state, &identity, &email, Role::Admin).await
}

pub async fn is_seller(
    state: web::Data<AppState>,
    identity: Identity,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    role_check(&state, &identity, &email, Role::Seller).await
}

pub async fn is_user(
    state: web::Data<AppState>,
    identity: Identity,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    role_check(&state, &identity, &email, Role::User).await
}
