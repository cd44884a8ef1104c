use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::{CartInput, CartQuery, QuantityUpdate};
use crate::services::owner_email;
use crate::state::AppState;
use crate::token::Identity;

pub async fn add_to_cart(
    state: web::Data<AppState>,
    identity: Identity,
    input: web::Json<CartInput>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.carts.add(&identity, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(outcome))
}

/// Entries for the caller. A `?email=` naming anyone else is refused.
pub async fn list_cart(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<CartQuery>,
) -> Result<HttpResponse, ApiError> {
    let email = owner_email(&identity, query.into_inner().email)?;
    Ok(HttpResponse::Ok().json(state.carts.list_for(&email).await?))
}

pub async fn update_quantity(
    state: web::Data<AppState>,
    id: web::Path<String>,
    update: web::Json<QuantityUpdate>,
) -> Result<HttpResponse, ApiError> {
    let item = state.carts.adjust_quantity(&id, update.action).await?;
    Ok(HttpResponse::Ok().json(item))
}

pub async fn remove_from_cart(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.carts.remove(&id).await?))
}
