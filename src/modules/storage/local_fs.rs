//! Local filesystem backend serving files from the public uploads directory

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::modules::storage::backend::{
    timestamped_name, Durability, StorageBackend, StorageError, StoredFile, UploadFile,
};

const TAG: &str = "local";

/// Attempts made at finding a free name when a timestamp collides
const MAX_NAME_ATTEMPTS: usize = 16;

pub struct LocalFsBackend {
    root: PathBuf,
    url_prefix: String,
}

impl LocalFsBackend {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the uploads directory if it does not exist
    pub async fn ensure_directory(&self) -> Result<(), StorageError> {
        if fs::metadata(&self.root).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Ok(());
        }
        fs::create_dir_all(&self.root).await.map_err(|e| {
            StorageError::new(
                TAG,
                format!("Failed to create directory '{}': {}", self.root.display(), e),
            )
        })?;
        info!("Created uploads directory: {}", self.root.display());
        Ok(())
    }

    fn candidate_name(base: &str, attempt: usize) -> String {
        if attempt == 0 {
            return base.to_string();
        }
        match base.rsplit_once('.') {
            Some((stem, ext)) => format!("{}_{}.{}", stem, attempt, ext),
            None => format!("{}_{}", base, attempt),
        }
    }

    /// Opens a new file without overwriting an existing one
    async fn create_unique(&self, base: &str) -> Result<(String, fs::File), StorageError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = Self::candidate_name(base, attempt);
            let result = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.root.join(&name))
                .await;

            match result {
                Ok(handle) => return Ok((name, handle)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::new(
                        TAG,
                        format!("Failed to create '{}': {}", name, e),
                    ))
                }
            }
        }
        Err(StorageError::new(
            TAG,
            format!("No free file name for '{}'", base),
        ))
    }
}

#[async_trait]
impl StorageBackend for LocalFsBackend {
    fn backend_tag(&self) -> &'static str {
        TAG
    }

    async fn store(&self, file: &UploadFile) -> Result<StoredFile, StorageError> {
        self.ensure_directory().await?;

        let extension = file.extension().ok_or_else(|| {
            StorageError::new(TAG, format!("Unsupported content type '{}'", file.content_type))
        })?;
        let base = timestamped_name(None, extension);
        let (name, mut handle) = self.create_unique(&base).await?;

        let written = async {
            handle.write_all(&file.data).await?;
            handle.flush().await
        }
        .await;

        if let Err(e) = written {
            // Leave no partial file behind
            let _ = fs::remove_file(self.root.join(&name)).await;
            return Err(StorageError::new(
                TAG,
                format!("Failed to write '{}': {}", name, e),
            ));
        }

        debug!("File saved locally: {}", self.root.join(&name).display());

        let url = format!("{}/{}", self.url_prefix, name);
        Ok(StoredFile {
            path: url.clone(),
            url,
            backend: TAG,
            durability: Durability::Reduced,
        })
    }

    async fn is_reachable(&self) -> bool {
        self.ensure_directory().await.is_ok()
    }
}
