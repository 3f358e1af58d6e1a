use std::process;
use std::sync::Arc;

use rusty_roster::{
    build_router,
    config::{AppConfig, LogFormat},
    logging, AccountStore, AppState, DirectoryNamespaces, ServerRegistry,
};
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cfg = AppConfig::from_env()?;
    match cfg.log_format {
        LogFormat::Compact => logging::init_logging(),
        LogFormat::Json => logging::init_logging_json(),
    }

    tokio::fs::create_dir_all(&cfg.namespace_root).await?;

    let servers = ServerRegistry::with_servers(cfg.seed_servers.clone());
    let state = AppState::new(
        AccountStore::new(),
        Arc::new(DirectoryNamespaces::new(&cfg.namespace_root)),
        servers,
        cfg.admin.clone(),
    );
    let app = build_router(state, cfg.max_upload_bytes);

    let addr = cfg.bind_addr()?;
    info!(%addr, namespace_root = %cfg.namespace_root.display(), "starting roster server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
