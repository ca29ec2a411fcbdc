use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower::make::Shared;
use tracing_subscriber::EnvFilter;

use rh_backend::auth::jwt::JwtService;
use rh_backend::config::AppConfig;
use rh_backend::db;
use rh_backend::notify::{ses, LogNotifier, Notifier, SesNotifier};
use rh_backend::routes::create_router;
use rh_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "api",
        database_url = %config.redacted_database_url(),
        pool_size = config.database_max_pool_size,
        server_host = %config.server_host,
        server_port = config.server_port,
        template_dir = %config.template_dir.display(),
        mail_enabled = config.mail_from.is_some(),
        notify_recipients = config.notify_recipients.len(),
        "loaded backend configuration"
    );

    let pool = db::init_pool_with_size(&config.database_url, config.database_max_pool_size)?;
    let applied = db::run_migrations(&pool).context("database migrations failed")?;
    tracing::info!(component = "api", applied, "database migrations complete");

    let notifier: Arc<dyn Notifier> = match config.mail_from.clone() {
        Some(from) => Arc::new(SesNotifier::new(ses::build_client(&config).await, from)),
        None => Arc::new(LogNotifier),
    };
    let jwt = JwtService::from_config(&config)?;

    let state = AppState::new(pool, config, jwt, notifier);
    if let Err(err) = state.exporter.verify_templates() {
        tracing::warn!(
            component = "api",
            error = %err,
            "spreadsheet templates are not usable, exports will fail"
        );
    }

    let listen_addr: SocketAddr =
        format!("{}:{}", state.config.server_host, state.config.server_port).parse()?;
    let router = create_router(state);

    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!("listening on {}", listen_addr);

    axum::serve(listener, Shared::new(router))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
