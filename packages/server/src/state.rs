use std::sync::Arc;

use common::storage::BlobStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::ocr::OcrClient;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// `None` when no database is configured or it was unreachable at startup.
    pub db: Option<DatabaseConnection>,
    pub blob_store: Arc<dyn BlobStore>,
    pub ocr: OcrClient,
}

impl AppState {
    /// The metadata store, or `StorageUnavailable` if the service runs without one.
    pub fn db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::StorageUnavailable("Database not configured".into()))
    }
}
