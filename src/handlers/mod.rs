use actix_web::{HttpResponse, Responder};

pub mod advertisements;
pub mod auth;
pub mod carts;
pub mod categories;
pub mod medicine;
pub mod payments;
pub mod users;

pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("medistore server is running")
}
