use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::{IntentRequest, PaymentInput};
use crate::state::AppState;
use crate::store::FieldFilter;
use crate::token::Identity;

pub async fn create_payment_intent(
    state: web::Data<AppState>,
    request: web::Json<IntentRequest>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.checkout.create_intent(request.price).await?))
}

pub async fn record_payment(
    state: web::Data<AppState>,
    identity: Identity,
    input: web::Json<PaymentInput>,
) -> Result<HttpResponse, ApiError> {
    let reconciliation = state.checkout.record(&identity, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reconciliation))
}

pub async fn list_payments(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.checkout.list(None).await?))
}

pub async fn mark_paid(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.checkout.mark_paid(&id).await?))
}

pub async fn seller_revenue(
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = FieldFilter::eq("seller_email", email.into_inner());
    Ok(HttpResponse::Ok().json(state.checkout.list(Some(filter)).await?))
}

pub async fn payment_history(
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = FieldFilter::eq("email", email.into_inner());
    Ok(HttpResponse::Ok().json(state.checkout.list(Some(filter)).await?))
}
