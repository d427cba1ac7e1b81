//! Local filesystem blob storage.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context as _, anyhow};
use bytes::Bytes;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::domain::repository::BlobStorage;
use crate::error::AccessServiceError;

/// Stores each upload as `<uuid>.<extension>` directly under `root`.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    root: PathBuf,
}

impl LocalBlobStorage {
    /// Create the root directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }

    /// References are flat names we generated; anything else is refused.
    fn resolve(&self, reference: &str) -> Result<PathBuf, AccessServiceError> {
        let valid = !reference.is_empty()
            && reference
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
            && !reference.starts_with('.');
        if !valid {
            return Err(anyhow!("invalid storage reference {reference:?}").into());
        }
        Ok(self.root.join(reference))
    }
}

impl BlobStorage for LocalBlobStorage {
    type Reader = fs::File;

    async fn write(&self, extension: &str, bytes: Bytes) -> Result<String, AccessServiceError> {
        let reference = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.resolve(&reference)?;
        fs::write(&path, &bytes)
            .await
            .with_context(|| format!("write blob {reference}"))?;
        debug!(storage_ref = %reference, bytes = bytes.len(), "wrote blob");
        Ok(reference)
    }

    async fn open(&self, reference: &str) -> Result<Option<fs::File>, AccessServiceError> {
        let path = self.resolve(reference)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("open blob {reference}"))
                .into()),
        }
    }

    async fn delete(&self, reference: &str) -> Result<(), AccessServiceError> {
        let path = self.resolve(reference)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("delete blob {reference}"))
                .into()),
        }
    }
}
