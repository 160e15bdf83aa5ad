use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// A single resource holding the serialized bytes of a document.
///
/// Both async and blocking access are required: configuration is often read
/// once at startup, before any runtime exists.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn exists(&self) -> io::Result<bool>;

    async fn read(&self) -> io::Result<Vec<u8>>;

    async fn write(&self, bytes: &[u8]) -> io::Result<()>;

    fn exists_sync(&self) -> io::Result<bool>;

    fn read_sync(&self) -> io::Result<Vec<u8>>;

    fn write_sync(&self, bytes: &[u8]) -> io::Result<()>;
}

/// Storage backed by one file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn exists(&self) -> io::Result<bool> {
        tokio::fs::try_exists(&self.path).await
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::write(&self.path, bytes).await
    }

    fn exists_sync(&self) -> io::Result<bool> {
        self.path.try_exists()
    }

    fn read_sync(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }

    fn write_sync(&self, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(&self.path, bytes)
    }
}
