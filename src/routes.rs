//! Route table.
//!
//! Paths that mix access levels across methods are split into one resource
//! per method, each with its own guard chain.

use actix_web::dev::HttpServiceFactory;
use actix_web::{guard, web, Resource};

use crate::error::ApiError;
use crate::handlers::{
    self, advertisements, auth, carts, categories, medicine, payments, users,
};
use crate::middleware::{RequireRole, VerifyToken};
use crate::models::Role;
use crate::token::TokenKeys;

fn verified(resource: Resource, keys: &TokenKeys) -> impl HttpServiceFactory {
    resource.wrap(VerifyToken::new(keys.clone()))
}

// The last `wrap` runs first, so the token is checked before the role.
fn restricted(resource: Resource, keys: &TokenKeys, role: Role) -> impl HttpServiceFactory {
    resource
        .wrap(RequireRole::new(role))
        .wrap(VerifyToken::new(keys.clone()))
}

// Extractor failures answer with the same `{message}` body as handler errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::MalformedRequest(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::MalformedRequest(err.to_string()).into())
}

pub fn configure(cfg: &mut web::ServiceConfig, keys: &TokenKeys) {
    cfg.app_data(json_config()).app_data(query_config());

    cfg.route("/", web::get().to(handlers::health))
        .route("/jwt", web::post().to(auth::issue_token));

    // directory
    cfg.service(
        web::resource("/users")
            .guard(guard::Post())
            .route(web::post().to(users::sign_up)),
    )
    .service(restricted(
        web::resource("/users")
            .guard(guard::Get())
            .route(web::get().to(users::list_users)),
        keys,
        Role::Admin,
    ))
    .service(restricted(
        web::resource("/users/{id}").route(web::delete().to(users::delete_user)),
        keys,
        Role::Admin,
    ))
    .service(verified(
        web::resource("/users/admin/{email}").route(web::get().to(users::is_admin)),
        keys,
    ))
    .service(verified(
        web::resource("/users/seller/{email}")
            .guard(guard::Get())
            .route(web::get().to(users::is_seller)),
        keys,
    ))
    .service(verified(
        web::resource("/users/user/{email}")
            .guard(guard::Get())
            .route(web::get().to(users::is_user)),
        keys,
    ))
    .service(restricted(
        web::resource("/users/seller/{id}")
            .guard(guard::Patch())
            .route(web::patch().to(users::make_seller)),
        keys,
        Role::Admin,
    ))
    .service(restricted(
        web::resource("/users/user/{id}")
            .guard(guard::Patch())
            .route(web::patch().to(users::make_user)),
        keys,
        Role::Admin,
    ));

    // catalog
    cfg.service(
        web::resource("/medicine")
            .guard(guard::Get())
            .route(web::get().to(medicine::list_medicine)),
    )
    .service(restricted(
        web::resource("/medicine")
            .guard(guard::Post())
            .route(web::post().to(medicine::add_medicine)),
        keys,
        Role::Seller,
    ))
    .service(
        web::resource("/medicine/details/{id}").route(web::get().to(medicine::medicine_details)),
    )
    .service(verified(
        web::resource("/medicine/{email}").route(web::get().to(medicine::seller_medicine)),
        keys,
    ));

    // categories
    cfg.route("/categoryCard", web::get().to(categories::category_cards))
        .service(verified(
            web::resource("/category").route(web::get().to(categories::list_categories)),
            keys,
        ))
        .service(
            web::resource("/category/{id}")
                .guard(guard::Get())
                .route(web::get().to(categories::get_category)),
        )
        .service(restricted(
            web::resource("/category/{id}")
                .guard(guard::Delete())
                .route(web::delete().to(categories::delete_category)),
            keys,
            Role::Admin,
        ))
        .service(restricted(
            web::resource("/manage-category").route(web::post().to(categories::add_category)),
            keys,
            Role::Admin,
        ))
        .service(restricted(
            web::resource("/update-category/{id}")
                .route(web::put().to(categories::update_category)),
            keys,
            Role::Admin,
        ));

    // carts
    cfg.service(verified(
        web::resource("/carts")
            .route(web::get().to(carts::list_cart))
            .route(web::post().to(carts::add_to_cart)),
        keys,
    ))
    .service(verified(
        web::resource("/carts/{id}")
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|_err, _req| ApiError::InvalidAction.into()),
            )
            .route(web::put().to(carts::update_quantity))
            .route(web::delete().to(carts::remove_from_cart)),
        keys,
    ));

    // payments
    cfg.service(verified(
        web::resource("/create-payment-intent")
            .route(web::post().to(payments::create_payment_intent)),
        keys,
    ))
    .service(verified(
        web::resource("/payments")
            .route(web::get().to(payments::list_payments))
            .route(web::post().to(payments::record_payment)),
        keys,
    ))
    .service(restricted(
        web::resource("/payments/{id}").route(web::patch().to(payments::mark_paid)),
        keys,
        Role::Admin,
    ))
    .service(verified(
        web::resource("/seller-revenue/{email}").route(web::get().to(payments::seller_revenue)),
        keys,
    ))
    .service(verified(
        web::resource("/user-payment-history/{email}")
            .route(web::get().to(payments::payment_history)),
        keys,
    ));

    // advertisements
    cfg.service(
        web::resource("/advertisement")
            .guard(guard::Get())
            .route(web::get().to(advertisements::list_advertisements)),
    )
    .service(verified(
        web::resource("/advertisement")
            .guard(guard::Post())
            .route(web::post().to(advertisements::add_advertisement)),
        keys,
    ))
    .service(restricted(
        web::resource("/advertisement/{id}")
            .route(web::patch().to(advertisements::accept_advertisement))
            .route(web::delete().to(advertisements::delete_advertisement)),
        keys,
        Role::Admin,
    ));
}
