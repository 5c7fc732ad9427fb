//! File operations

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::errors::PanelError;

/// A file wrapper with path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Create a new file reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Check if the file exists and has an execute bit set.
    ///
    /// Always equal to `exists` on non-Unix platforms.
    pub async fn is_executable(&self) -> bool {
        let Ok(meta) = fs::metadata(&self.path).await else {
            return false;
        };

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            meta.is_file() && meta.permissions().mode() & 0o111 != 0
        }

        #[cfg(not(unix))]
        {
            meta.is_file()
        }
    }

    /// Read file contents as bytes
    pub async fn read_bytes(&self) -> Result<Vec<u8>, PanelError> {
        Ok(fs::read(&self.path).await?)
    }

    /// Read file contents as text, replacing invalid UTF-8
    pub async fn read_lossy(&self) -> Result<String, PanelError> {
        let bytes = self.read_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
