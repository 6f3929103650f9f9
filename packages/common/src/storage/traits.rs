use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::id::BlobId;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Write-once store for raw uploaded payloads, addressed by [`BlobId`].
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a payload and return its id. Storing the same bytes twice is a no-op
    /// that returns the same id.
    async fn put(&self, data: &[u8]) -> Result<BlobId, StorageError>;

    /// Open a stored blob for streaming.
    async fn open(&self, id: &BlobId) -> Result<BoxReader, StorageError>;

    /// Read a whole blob into memory.
    async fn read(&self, id: &BlobId) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.open(id).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    async fn exists(&self, id: &BlobId) -> Result<bool, StorageError>;
}
