use anyhow::Context;
use axum::http::StatusCode;
use sqlx::postgres::PgPoolOptions;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use blogkit::api::axum::{AppState, default_cors, router};
use blogkit::cache::RedisCache;
use blogkit::jwt::JwtService;
use blogkit::postgres::{create_repositories, run_migrations};
use blogkit::session::RedisSessionStore;
use blogkit::tracing_config::init_tracing;
use blogkit::crypto::PasswordHasher;
use blogkit::{Argon2Hasher, BlogConfig, SessionGate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BlogConfig::from_env()?;
    init_tracing()?;

    let jwt = JwtService::new(config.tokens.jwt_config()?);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let redis = deadpool_redis::Config::from_url(config.redis_url.as_str())
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .context("failed to create Redis pool")?;

    // built up front so the first unknown-email login costs the same as the rest
    let hasher = Argon2Hasher::production();
    hasher.dummy_hash()?;

    let (users, categories, articles) = create_repositories(pool);
    let state = AppState::new(
        users,
        articles,
        categories,
        RedisCache::new(redis.clone()),
        config.cache.ttl,
        SessionGate::new(jwt, RedisSessionStore::new(redis)),
        hasher,
    );

    let app = router(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.server.request_timeout,
        ))
        .layer(default_cors(&config.server.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.listen_addr))?;
    tracing::info!(addr = %config.server.listen_addr, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
