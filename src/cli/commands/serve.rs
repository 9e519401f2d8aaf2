//! Implementation of the `swarmtest serve` command.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::cli::commands::open_database;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::database::{
    BatchRepositoryImpl, CallbackRepositoryImpl, SlotRepositoryImpl,
};
use crate::infrastructure::http;
use crate::services::CallbackReconciler;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind host, overrides configuration
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port, overrides configuration
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, _json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = open_database(&config).await?;

    let slots = Arc::new(SlotRepositoryImpl::new(db.pool().clone()));
    let batches = Arc::new(BatchRepositoryImpl::new(db.pool().clone()));
    let callbacks = Arc::new(CallbackRepositoryImpl::new(db.pool().clone()));
    let reconciler = Arc::new(CallbackReconciler::new(slots, batches, callbacks));

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "callback server listening");

    axum::serve(listener, http::router(reconciler))
        .await
        .context("Callback server exited with an error")?;
    Ok(())
}
