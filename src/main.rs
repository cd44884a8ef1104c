use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use envconfig::Envconfig;
use log::info;

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod processor;
mod routes;
mod services;
mod state;
mod store;
mod token;

#[cfg(test)]
mod test_support;

use processor::StripeProcessor;
use state::{AppState, Stores};
use token::TokenKeys;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = config::Config::init_from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let database = db::connect(&config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    db::ensure_indexes(&database)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let processor = StripeProcessor::new(
        &config.stripe_api_base,
        &config.stripe_secret_key,
        Duration::from_secs(config.processor_timeout_secs),
    )
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let keys = TokenKeys::new(
        &config.jwt_secret,
        chrono::Duration::seconds(config.token_ttl_secs),
    );
    let state = AppState::new(
        Stores::mongo(&database),
        Arc::new(processor),
        keys.clone(),
        &config.payment_currency,
    );

    info!("listening on {}", config.bind_address);
    HttpServer::new(move || {
        let keys = keys.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(move |cfg| routes::configure(cfg, &keys))
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
