use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use rs_car_point::cache::{CacheConfig, RedisClient};
use rs_car_point::config::{DatabaseConfig, EnvironmentConfig};
use rs_car_point::database::{create_pool, run_migrations};
use rs_car_point::services::ensure_admin;
use rs_car_point::services::status_notifier::{MemorySignalStore, SignalStore, StatusNotifier};
use rs_car_point::{build_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🚗 RS Car Point - Back office API");
    info!("================================");
    info!("🌍 Environment: {}", config.environment);

    let database = DatabaseConfig::from_env()?;
    let pool = create_pool(&database).await?;
    run_migrations(&pool).await?;
    ensure_admin(&pool, &config).await?;

    let notifier = StatusNotifier::new(signal_store(&config).await);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Server listening on {}", config.server_url());
    info!("🔍 Endpoints:");
    info!("   GET  /api/health");
    info!("   POST /api/auth/login | /api/auth/register-broker");
    info!("   CRUD /api/users (admin)");
    info!("   CRUD /api/vehicles, GET /api/vehicles/search, POST /api/vehicles/:id/mark-sold");
    info!("   CRUD /api/deals, PUT /api/deals/:id/approve|complete|reject");
    info!("   GET  /api/analytics/sales|vehicle-types|dealer-performance|revenue|report");
    info!("   POST|DELETE /api/data/seed-*|clear-*");

    let app = build_app(AppState::new(pool, config, notifier));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

/// Redis when `REDIS_URL` is set and reachable, memory otherwise
async fn signal_store(config: &EnvironmentConfig) -> Arc<dyn SignalStore> {
    let Some(url) = config.redis_url.as_deref() else {
        info!("💾 REDIS_URL not set, status signals stay in memory");
        return Arc::new(MemorySignalStore::new());
    };

    match RedisClient::new(CacheConfig::new(url)).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("⚠️ Redis unavailable ({}), status signals stay in memory", e);
            Arc::new(MemorySignalStore::new())
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 SIGTERM received, shutting down...");
        },
    }
}
