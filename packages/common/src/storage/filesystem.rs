use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::id::BlobId;
use super::traits::{BlobStore, BoxReader};
use crate::config::StorageConfig;

/// Blob store backed by a local directory.
///
/// Layout: `{root}/{first 2 hex chars}/{remaining 62 hex chars}`, with
/// in-flight writes staged under `{root}/.tmp` and renamed into place.
pub struct FilesystemBlobStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    pub async fn new(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self { root, max_size })
    }

    pub async fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::new(config.path.clone(), config.max_blob_size).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, id: &BlobId) -> PathBuf {
        self.root.join(id.relative_path())
    }

    fn staging_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(&self, data: &[u8]) -> Result<BlobId, StorageError> {
        let actual = data.len() as u64;
        if actual > self.max_size {
            return Err(StorageError::TooLarge {
                actual,
                limit: self.max_size,
            });
        }

        let id = BlobId::for_content(data);
        let blob_path = self.blob_path(&id);
        if fs::try_exists(&blob_path).await? {
            return Ok(id);
        }

        let staging = self.staging_path();
        if let Err(e) = fs::write(&staging, data).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }

        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Concurrent writers of the same bytes race harmlessly: both renames
        // land identical content on the same path.
        if let Err(e) = fs::rename(&staging, &blob_path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }

        Ok(id)
    }

    async fn open(&self, id: &BlobId) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.blob_path(id)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(id.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, id: &BlobId) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.blob_path(id)).await?)
    }
}
