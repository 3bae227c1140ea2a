use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use tasknest::auth::TokenKeys;
use tasknest::config::Config;
use tasknest::error::AppError;
use tasknest::rate_limit::RateLimiter;
use tasknest::routes;
use tasknest::store::{PgStore, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let store = PgStore::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    store
        .init_schema()
        .await
        .expect("Failed to initialize database schema");
    let store: Arc<dyn Store> = Arc::new(store);

    let token_keys = TokenKeys::new(&config.jwt_secret, config.token_expiry_days);
    let rate_limiter = RateLimiter::new(
        config.rate_limit_window_secs,
        config.rate_limit_max_requests,
    );

    log::info!("Starting TaskNest server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::new(token_keys.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(format!("Invalid request body: {}", err)).into()
            }))
            .wrap(rate_limiter.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
            .default_service(web::route().to(routes::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
