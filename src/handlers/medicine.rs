use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::{new_id, strip, Medicine, MedicineInput, MedicineQuery};
use crate::services::owner_email;
use crate::state::AppState;
use crate::store::{optional_filter, FieldFilter};
use crate::token::Identity;

pub async fn list_medicine(
    state: web::Data<AppState>,
    query: web::Query<MedicineQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = optional_filter("category", query.into_inner().category);
    Ok(HttpResponse::Ok().json(state.medicines.find(filter).await?))
}

/// Unknown ids answer `null`, not 404.
pub async fn medicine_details(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.medicines.find_by_id(&id).await?))
}

pub async fn seller_medicine(
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = FieldFilter::eq("seller_email", email.into_inner());
    Ok(HttpResponse::Ok().json(state.medicines.find(Some(filter)).await?))
}

pub async fn add_medicine(
    state: web::Data<AppState>,
    identity: Identity,
    input: web::Json<MedicineInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let medicine = Medicine {
        id: new_id(),
        name: input.name,
        category: input.category,
        price: input.price,
        seller_email: owner_email(&identity, input.seller_email)?,
        extra: strip(input.extra, &["_id"]),
    };
    Ok(HttpResponse::Created().json(state.medicines.insert(&medicine).await?))
}
