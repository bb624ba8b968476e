// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image sources — the read-only, file-like inputs consumed by every operation.
//
// A source is read once per operation. Reading is asynchronous so that
// filesystem and in-memory inputs can be mixed freely in one batch.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::ImageFormat;
use pagewerk_core::error::Result;
use tracing::debug;

/// A binary, file-like input holding one encoded raster image.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Display name used in logs and for deriving output file names.
    fn name(&self) -> &str;

    /// Declared MIME type, if the source knows it.
    fn mime_type(&self) -> Option<&str> {
        None
    }

    /// Read the full encoded contents.
    async fn read(&self) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: ImageSource + ?Sized> ImageSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn mime_type(&self) -> Option<&str> {
        (**self).mime_type()
    }

    async fn read(&self) -> Result<Vec<u8>> {
        (**self).read().await
    }
}

/// An image already held in memory.
#[derive(Debug, Clone)]
pub struct ImageFile {
    name: String,
    bytes: Vec<u8>,
    mime_type: Option<String>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            mime_type: None,
        }
    }

    /// Attach a declared MIME type (e.g. from an upload's content type).
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[async_trait]
impl ImageSource for ImageFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    async fn read(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// An image file on disk, read lazily with `tokio::fs`.
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
    mime_type: Option<&'static str>,
}

impl PathSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        // Extension-based guess; content sniffing happens at decode time.
        let mime_type = ImageFormat::from_path(&path)
            .ok()
            .map(|format| format.to_mime_type());
        Self {
            path,
            name,
            mime_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type
    }

    async fn read(&self) -> Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Source read");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewerk_core::PagewerkError;

    #[tokio::test]
    async fn image_file_reads_its_bytes() {
        let file = ImageFile::new("a.bin", vec![1, 2, 3]).with_mime_type("image/png");
        assert_eq!(file.name(), "a.bin");
        assert_eq!(file.mime_type(), Some("image/png"));
        assert_eq!(file.read().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn path_source_guesses_mime_from_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"not really a png").expect("write");

        let source = PathSource::new(&path);
        assert_eq!(source.name(), "photo.png");
        assert_eq!(source.mime_type(), Some("image/png"));
        assert_eq!(source.read().await.unwrap(), b"not really a png".to_vec());
    }

    #[tokio::test]
    async fn missing_path_is_io_error() {
        let source = PathSource::new("/nonexistent/photo.jpg");
        let err = source.read().await.unwrap_err();
        assert!(matches!(err, PagewerkError::Io(_)));
    }

    #[tokio::test]
    async fn boxed_sources_forward() {
        let boxed: Box<dyn ImageSource> = Box::new(ImageFile::new("x", vec![9]));
        assert_eq!(boxed.name(), "x");
        assert_eq!(boxed.read().await.unwrap(), vec![9]);
    }
}
