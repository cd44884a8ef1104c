use actix_web::{web, HttpResponse};
use mongodb::bson::to_document;

use crate::error::ApiError;
use crate::models::{new_id, strip, Category, CategoryInput, CategoryQuery, Extra};
use crate::state::AppState;
use crate::store::{optional_filter, StoreError};

pub async fn category_cards(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.categories.find(None).await?))
}

pub async fn list_categories(
    state: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = optional_filter("name", query.into_inner().name);
    Ok(HttpResponse::Ok().json(state.categories.find(filter).await?))
}

/// Unknown ids answer `null`, not 404.
pub async fn get_category(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.categories.find_by_id(&id).await?))
}

pub async fn add_category(
    state: web::Data<AppState>,
    input: web::Json<CategoryInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let category = Category {
        id: new_id(),
        name: input.name,
        metadata: strip(input.metadata, &["_id"]),
    };
    Ok(HttpResponse::Created().json(state.categories.insert(&category).await?))
}

/// Sets the posted fields, creating the category under this id if absent.
/// A category created without a name is stored with an empty one.
pub async fn update_category(
    state: web::Data<AppState>,
    id: web::Path<String>,
    fields: web::Json<Extra>,
) -> Result<HttpResponse, ApiError> {
    let fields = strip(fields.into_inner(), &["_id"]);
    if fields.get("name").map_or(false, |name| !name.is_string()) {
        return Err(ApiError::MalformedRequest("category name must be a string".into()));
    }
    let set = to_document(&fields).map_err(StoreError::from)?;
    Ok(HttpResponse::Ok().json(state.categories.update_by_id(&id, set, true).await?))
}

pub async fn delete_category(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.categories.delete_by_id(&id).await?))
}
