use actix_files as fs;
use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoicedesk::{
  adapters::http::{
    RequestIdMiddleware, TemplateEngine, WebRouteDependencies, configure_web_routes, health_check,
  },
  application::invoice::{
    CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceUseCase, ListInvoicesUseCase,
    UpdateInvoiceUseCase,
  },
  domain::invoice::{InvoiceService, ViewCache},
  infrastructure::{
    cache::{NoOpViewCache, RedisViewCache},
    config::{CacheConfig, Config},
    persistence::postgres::PostgresInvoiceRepository,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoicedesk=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Invoice Desk");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!("Configuration loaded successfully");

  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
  tracing::info!("Database migrations completed");

  let view_cache = connect_view_cache(&config.cache).await?;

  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));
  let invoice_service = Arc::new(InvoiceService::new(invoice_repo, view_cache.clone()));

  let create_invoice_use_case = Arc::new(CreateInvoiceUseCase::new(invoice_service.clone()));
  let update_invoice_use_case = Arc::new(UpdateInvoiceUseCase::new(invoice_service.clone()));
  let delete_invoice_use_case = Arc::new(DeleteInvoiceUseCase::new(invoice_service.clone()));
  let list_invoices_use_case = Arc::new(ListInvoicesUseCase::new(invoice_service.clone()));
  let get_invoice_use_case = Arc::new(GetInvoiceUseCase::new(invoice_service));

  let templates = TemplateEngine::new().map_err(|e| {
    tracing::error!("Failed to initialize template engine: {}", e);
    std::io::Error::other(format!("Template error: {}", e))
  })?;
  tracing::info!("Template engine initialized");

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let deps = WebRouteDependencies {
      templates: templates.clone(),
      view_cache: view_cache.clone(),
      create_invoice_use_case: create_invoice_use_case.clone(),
      update_invoice_use_case: update_invoice_use_case.clone(),
      delete_invoice_use_case: delete_invoice_use_case.clone(),
      list_invoices_use_case: list_invoices_use_case.clone(),
      get_invoice_use_case: get_invoice_use_case.clone(),
    };

    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .configure(move |cfg| configure_web_routes(cfg, deps))
      .service(fs::Files::new("/static", "./static"))
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host, server_port))?
  .run()
  .await
}

/// Redis-backed view cache, or a no-op one when caching is disabled
async fn connect_view_cache(config: &CacheConfig) -> std::io::Result<Arc<dyn ViewCache>> {
  if !config.enabled {
    tracing::warn!("View cache disabled; listing is rendered on every request");
    return Ok(Arc::new(NoOpViewCache::new()));
  }

  tracing::info!("Connecting to Redis: {}", config.url);

  let redis_client = redis::Client::open(config.url.clone()).map_err(|e| {
    tracing::error!("Failed to create Redis client: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::InvalidInput,
      format!("Invalid Redis URL: {}", e),
    )
  })?;

  let redis_conn = tokio::time::timeout(
    Duration::from_secs(config.connect_timeout_seconds),
    redis_client.get_connection_manager(),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Redis connection timed out after {} seconds. Is Redis running?",
      config.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Redis connection timed out after {} seconds",
        config.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to Redis: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::ConnectionRefused,
      format!("Could not connect to Redis. Is Redis running at {}?", config.url),
    )
  })?;

  tracing::info!("Redis connection established");

  Ok(Arc::new(RedisViewCache::new(redis_conn, config.ttl_seconds)))
}
