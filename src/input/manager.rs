//! Input manager: turns uploads into raw text

use crate::error::{AssistantError, Result};
use crate::input::file_detector::{mime_for_path, DocumentKind};
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// An uploaded document with its declared MIME type
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk. Without an explicit MIME type one is declared
    /// from the file extension.
    pub async fn from_path(path: &Path, mime_type: Option<&str>) -> Result<Self> {
        if !path.exists() {
            return Err(AssistantError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let mime_type = match mime_type {
            Some(mime) => mime.to_string(),
            None => mime_for_path(path)
                .ok_or_else(|| {
                    AssistantError::UnsupportedFormat(format!(
                        "Cannot infer a document type for {}; pass --resume-type",
                        path.display()
                    ))
                })?
                .to_string(),
        };

        let bytes = fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(file_name, mime_type, bytes))
    }
}

pub struct InputManager {
    cache: HashMap<(PathBuf, String), String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract text from an upload, routed by its declared MIME type
    pub fn extract_upload(&self, upload: &Upload) -> Result<String> {
        let kind = DocumentKind::from_mime(&upload.mime_type);
        info!(
            "Extracting text from {} ({}, {} bytes)",
            upload.file_name,
            upload.mime_type,
            upload.bytes.len()
        );

        match kind {
            DocumentKind::Pdf => PdfExtractor.extract(&upload.bytes),
            DocumentKind::Docx => DocxExtractor.extract(&upload.bytes),
            DocumentKind::Text => PlainTextExtractor.extract(&upload.bytes),
            DocumentKind::Markdown => MarkdownExtractor.extract(&upload.bytes),
            DocumentKind::Unsupported => Err(AssistantError::UnsupportedFormat(format!(
                "{} has unsupported type '{}'; expected PDF or DOCX",
                upload.file_name, upload.mime_type
            ))),
        }
    }

    /// Read and extract a file, caching the text per path and declared type.
    /// A cache hit does not touch the filesystem.
    pub async fn extract_text(&mut self, path: &Path, mime_type: Option<&str>) -> Result<String> {
        let mime_type = match mime_type {
            Some(mime) => mime.to_string(),
            None => mime_for_path(path)
                .ok_or_else(|| {
                    AssistantError::UnsupportedFormat(format!(
                        "Cannot infer a document type for {}; pass --resume-type",
                        path.display()
                    ))
                })?
                .to_string(),
        };
        let key = (path.to_path_buf(), mime_type);

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&key) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        let upload = Upload::from_path(path, Some(&key.1)).await?;
        let text = self.extract_upload(&upload)?;

        if self.enable_cache {
            self.cache.insert(key, text.clone());
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::file_detector::TEXT_MIME;

    #[test]
    fn test_unsupported_mime_is_an_error() {
        let manager = InputManager::new();
        let upload = Upload::new("photo.png", "image/png", vec![1, 2, 3]);

        match manager.extract_upload(&upload) {
            Err(AssistantError::UnsupportedFormat(msg)) => assert!(msg.contains("image/png")),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_declared_type_wins_over_name() {
        let manager = InputManager::new();
        // Named like a PDF but declared as plain text
        let upload = Upload::new("resume.pdf", TEXT_MIME, b"Python and SQL".to_vec());

        assert_eq!(manager.extract_upload(&upload).unwrap(), "Python and SQL");
    }

    #[tokio::test]
    async fn test_cached_text_survives_file_removal() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("resume.txt");
        std::fs::write(&path, "Python and Docker").unwrap();

        let mut manager = InputManager::new();
        let first = manager.extract_text(&path, None).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let second = manager.extract_text(&path, None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(manager.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_cache_is_keyed_by_declared_type() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("resume.md");
        std::fs::write(&path, "# Skills\n\n**SQL**").unwrap();

        let mut manager = InputManager::new();
        let markdown = manager.extract_text(&path, None).await.unwrap();
        let plain = manager.extract_text(&path, Some(TEXT_MIME)).await.unwrap();

        assert_eq!(markdown, "Skills\nSQL");
        assert_eq!(plain, "# Skills\n\n**SQL**");
        assert_eq!(manager.cache_size(), 2);
    }

    #[tokio::test]
    async fn test_disabled_cache_rereads() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("resume.txt");
        std::fs::write(&path, "java").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        assert_eq!(manager.extract_text(&path, None).await.unwrap(), "java");
        std::fs::write(&path, "rust").unwrap();
        assert_eq!(manager.extract_text(&path, None).await.unwrap(), "rust");
        assert_eq!(manager.cache_size(), 0);
    }
}
