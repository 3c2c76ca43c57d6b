//! Where CSV text comes from.
//!
//! A `Source` delivers the complete contents of one file. Reading is the only operation in the
//! crate that suspends; everything after it is synchronous.

use crate::{utils, Result};
use std::path::{Path, PathBuf};
use tracing::trace;

/// A named source of CSV text.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// The file name the text came from, e.g. `sales.2024.csv`. It is used to name the output.
    fn file_name(&self) -> &str;

    /// Reads the complete text.
    async fn read(&self) -> Result<String>;
}

/// Reads CSV text from a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    file_name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Source for FileSource {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    async fn read(&self) -> Result<String> {
        trace!("Reading {}", self.path.display());
        utils::read(&self.path).await
    }
}

/// Holds CSV text that is already in memory, e.g. handed over by an upload form.
#[derive(Debug, Clone, Default)]
pub struct TextSource {
    file_name: String,
    text: String,
}

impl TextSource {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
        }
    }
}

#[async_trait::async_trait]
impl Source for TextSource {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    async fn read(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_file_source() {
        let env = TestEnv::new();
        let path = env.write_csv("sales.2024.csv", "a,b\n1,2\n");
        let source = FileSource::new(&path);
        assert_eq!(source.file_name(), "sales.2024.csv");
        assert_eq!(source.read().await.unwrap(), "a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_file_source_missing() {
        let env = TestEnv::new();
        let source = FileSource::new(env.path().join("nope.csv"));
        let err = source.read().await.unwrap_err();
        assert!(err.to_string().contains("nope.csv"));
    }

    #[tokio::test]
    async fn test_text_source() {
        let source = TextSource::new("upload.csv", "x\n1\n");
        assert_eq!(source.file_name(), "upload.csv");
        assert_eq!(source.read().await.unwrap(), "x\n1\n");
    }
}
