use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::AuthResponse;
use crate::state::AppState;
use crate::token::Identity;

/// Mints an access token for the posted identity payload.
pub async fn issue_token(
    state: web::Data<AppState>,
    identity: web::Json<Identity>,
) -> Result<HttpResponse, ApiError> {
    let token = state.tokens.issue(identity.into_inner())?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
