//! Fusion Ordering API Server
//!
//! Reseller-facing ordering API: catalog reads, prepaid order placement,
//! and order status lookups over a single action-dispatched endpoint.

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use fusion_api::configure_public_api;
use fusion_core::AppConfig;
use fusion_db::create_pool;
use fusion_services::RateGate;
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_actix_web::TracingLogger;

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "fusion-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .configure(configure_public_api);
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "fusion_server={},fusion_api={},fusion_services={},fusion_db={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting Fusion Ordering API v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().unwrap_or_else(|e| {
        panic!("Failed to load configuration: {e}");
    });

    let pool = create_pool(&config.database.url, Some(config.database.max_connections))
        .await
        .unwrap_or_else(|e| {
            panic!("Failed to connect to database: {e}");
        });

    let rate_gate = web::Data::new(RateGate::new(config.api.service_list_cooldown_minutes));
    let bind_addr = config.server_addr();
    let workers = config.server.workers;

    info!("Listening on {} with {} workers", bind_addr, workers);

    let config_data = web::Data::new(config);
    let pool_data = web::Data::new(pool);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(pool_data.clone())
            .app_data(rate_gate.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
