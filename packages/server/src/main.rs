use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::FilesystemBlobStore;
use tracing::{Level, info, warn};

use pdfvault_server::config::AppConfig;
use pdfvault_server::database::init_db;
use pdfvault_server::services::ocr::OcrClient;
use pdfvault_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = match config.database.url.as_deref() {
        Some(url) => match init_db(url).await {
            Ok(db) => {
                info!("Database connected");
                Some(db)
            }
            Err(e) => {
                warn!(error = %e, "Database unavailable, uploads and listings will fail");
                None
            }
        },
        None => {
            warn!("No database configured, uploads and listings will fail");
            None
        }
    };

    let blob_store = FilesystemBlobStore::from_config(&config.storage)
        .await
        .with_context(|| format!("Failed to open blob store at {}", config.storage.path.display()))?;
    info!(path = %blob_store.root().display(), "Blob store ready");

    let ocr = OcrClient::new(&config.ocr).context("Failed to build OCR HTTP client")?;
    info!(endpoint = %ocr.endpoint(), "OCR client ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server host/port")?;

    let state = AppState {
        config,
        db,
        blob_store: Arc::new(blob_store),
        ocr,
    };

    let app = pdfvault_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
