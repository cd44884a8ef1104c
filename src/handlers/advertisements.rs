use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::{new_id, strip, Advertisement, AdvertisementQuery, AdvertisementStatus, Extra};
use crate::state::AppState;
use crate::store::{set_field, FieldFilter};

/// Any signed-in user may submit a banner; it waits as `pending` until an
/// admin accepts it.
pub async fn add_advertisement(
    state: web::Data<AppState>,
    content: web::Json<Extra>,
) -> Result<HttpResponse, ApiError> {
    let advertisement = Advertisement {
        id: new_id(),
        status: AdvertisementStatus::Pending,
        content: strip(content.into_inner(), &["_id", "status"]),
    };
    Ok(HttpResponse::Created().json(state.advertisements.insert(&advertisement).await?))
}

pub async fn list_advertisements(
    state: web::Data<AppState>,
    query: web::Query<AdvertisementQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.into_inner().status.map(|status| {
        let value = match status {
            AdvertisementStatus::Pending => "pending",
            AdvertisementStatus::Accepted => "accepted",
        };
        FieldFilter::eq("status", value)
    });
    Ok(HttpResponse::Ok().json(state.advertisements.find(filter).await?))
}

pub async fn accept_advertisement(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state
        .advertisements
        .update_by_id(&id, set_field("status", "accepted"), false)
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub async fn delete_advertisement(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.advertisements.delete_by_id(&id).await?))
}
