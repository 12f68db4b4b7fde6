mod cli;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use hashlink_core::{Shortener, Store};
use hashlink_gateway::{App, AppState};
use hashlink_generator::Sha1Generator;
use hashlink_shortener::ShortenerService;
use hashlink_storage::{FileStore, FileStoreSettings, InMemoryStore};
use tracing::{error, info};

use crate::cli::{StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        "starting gateway server"
    );

    let shortener = match config.storage {
        StorageBackendArg::Memory => build_shortener(InMemoryStore::new()),
        StorageBackendArg::File => {
            let settings = match config.io_timeout_ms {
                Some(ms) => FileStoreSettings::builder()
                    .path(config.store_file.clone())
                    .io_timeout(Duration::from_millis(ms))
                    .build(),
                None => FileStoreSettings::builder()
                    .path(config.store_file.clone())
                    .build(),
            };
            let store = FileStore::open(settings).await.inspect_err(|e| {
                error!(path = %config.store_file.display(), error = %e, "unable to open store file");
            })?;
            info!(path = %store.path().display(), "using file store");
            build_shortener(store)
        }
    };

    let app = App::router(AppState::new(shortener, config.base_url));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("unable to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn build_shortener<S: Store>(store: S) -> Arc<dyn Shortener> {
    Arc::new(ShortenerService::new(store, Sha1Generator::new()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "unable to listen for shutdown signal");
    }
}
