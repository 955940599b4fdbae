//! Storage module for documentation photos
//!
//! Provides the `StorageBackend` contract, the S3-compatible primary backend,
//! the local filesystem fallback and the dispatcher that chains them.

pub mod backend;
mod dispatcher;
mod local_fs;
mod object_storage;

pub use backend::{Durability, StorageBackend, UploadFile};
pub use dispatcher::{check_upload, UploadDispatcher, UploadError};
pub use local_fs::LocalFsBackend;
pub use object_storage::ObjectStorageBackend;
