//! Sethorize server entry point: configuration, database, key material,
//! seed data, then serve until a shutdown signal arrives.

use clap::Parser;
use sethorize_auth::AuthState;
use sethorize_config as config;
use sethorize_crypto::KeyManager;
use sethorize_db::Db;
use sethorize_server::{bootstrap, build_router, logging};
use std::net::SocketAddr;
use tracing::info;

#[derive(Parser)]
#[command(name = "sethorize-server")]
#[command(about = "Sethorize identity provider")]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(config_path) = args.config {
        // Env keeps precedence over the CLI flag.
        if std::env::var("SETHORIZE_CONFIG_FILE").is_err() {
            std::env::set_var("SETHORIZE_CONFIG_FILE", config_path);
        }
    }

    let _ = dotenvy::dotenv();
    let cfg = config::AppConfig::from_env()?;
    logging::init(cfg.log_json);

    std::panic::set_hook(Box::new(|info| {
        let bt = std::backtrace::Backtrace::force_capture();
        tracing::error!(error=%info, backtrace=%bt, "panic captured");
    }));

    // Database and key failures abort startup.
    let db = Db::connect(&cfg.database_url).await?;
    bootstrap::ensure_seed_data(&db, &cfg).await?;
    let keys = KeyManager::load_or_generate(&cfg.private_key_path)?;

    let state = AuthState {
        db,
        cfg: cfg.clone(),
        keys,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((cfg.host.as_str(), cfg.port)).await?;
    info!(host=%cfg.host, port=cfg.port, "sethorize server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
