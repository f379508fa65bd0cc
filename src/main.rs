// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! `ghostpir-server`: binds the HTTP boundary layer to the catalog, storage,
//! session, and engine crates and serves the PIR backend.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ghostpir_api::{build_router, AppState};
use ghostpir_catalog::CatalogStore;
use ghostpir_session::SessionStore;
use ghostpir_storage::ChunkCache;
use ghostpir_utils::config::{ADMIN_SECRET_ENV, SESSION_TTL_SECS};
use ghostpir_utils::Config;

#[derive(Parser, Debug)]
#[command(name = "ghostpir-server", about = "Single-server PIR content-delivery backend")]
struct Cli {
    /// Address to bind the HTTP listener on.
    #[arg(long, env = "GHOSTPIR_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Root data directory, holding `catalog.db` and `chunks/`.
    #[arg(long, env = "GHOSTPIR_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Directory retained uploads are written to.
    #[arg(long, env = "GHOSTPIR_UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    /// Name of the environment variable to read the admin shared secret from.
    #[arg(long, env = "GHOSTPIR_ADMIN_SECRET_ENV", default_value_t = ADMIN_SECRET_ENV.to_string())]
    admin_secret_env: String,

    /// Refuse more than one vector per `/kpir` request.
    #[arg(long)]
    strict_single_vector: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        log::error!("fatal error during startup: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    ghostpir_utils::logging::init(None).context("failed to initialize logging")?;

    let config = Config::new_with_admin_secret_env(
        cli.data_dir.clone(),
        cli.upload_dir.clone(),
        &cli.admin_secret_env,
    )
    .with_strict_single_vector(cli.strict_single_vector);

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create data directory {:?}", config.data_dir))?;
    std::fs::create_dir_all(config.chunk_dir())
        .with_context(|| format!("failed to create chunk directory {:?}", config.chunk_dir()))?;
    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("failed to create upload directory {:?}", config.upload_dir))?;

    let catalog = CatalogStore::open(config.catalog_db_path())
        .context("failed to open catalog store")?;

    let cache = ChunkCache::new();
    cache
        .preload(&catalog, &config.chunk_dir())
        .context("failed initial chunk cache preload")?;

    let sessions = SessionStore::new(std::time::Duration::from_secs(SESSION_TTL_SECS));

    let state = Arc::new(AppState {
        catalog,
        cache,
        sessions,
        config,
    });

    let addr: SocketAddr = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {:?}", cli.bind))?;

    log::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(listener, build_router(state))
        .await
        .context("server exited with an error")?;

    Ok(())
}
