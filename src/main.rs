use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Result;

use sportly::database::init_database;
use sportly::middleware::{GlobalRateLimiter, RateLimitStore, RequestIdMiddleware};
use sportly::middleware::rate_limit::cleanup_rate_limits;
use sportly::{AppState, Config};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting Sportly API server...");

    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let state = AppState::new(pool, config.clone())?;

    let rate_limit_store = RateLimitStore::new();
    tokio::spawn(cleanup_rate_limits(rate_limit_store.clone(), 300));
    tokio::spawn(cleanup_rate_limits(state.auth_rate_limits.login.clone(), 300));
    tokio::spawn(cleanup_rate_limits(state.auth_rate_limits.registration.clone(), 300));

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .configure(|cfg| state.configure(cfg))
            .wrap(GlobalRateLimiter::general(rate_limit_store.clone()))
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .expose_headers(vec!["X-Correlation-ID"])
                    .max_age(3600),
            )
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
