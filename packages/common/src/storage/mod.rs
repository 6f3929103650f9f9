mod error;
mod id;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use filesystem::FilesystemBlobStore;
pub use id::BlobId;
pub use traits::{BlobStore, BoxReader};
