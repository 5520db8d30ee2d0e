//! Document type detection from declared MIME types

use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";
pub const MARKDOWN_MIME: &str = "text/markdown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
    Markdown,
    Unsupported,
}

impl DocumentKind {
    /// Resolve the kind from a declared MIME type. Parameters such as
    /// `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            PDF_MIME => DocumentKind::Pdf,
            DOCX_MIME => DocumentKind::Docx,
            TEXT_MIME => DocumentKind::Text,
            MARKDOWN_MIME | "text/x-markdown" => DocumentKind::Markdown,
            _ => DocumentKind::Unsupported,
        }
    }
}

/// MIME type the CLI declares for a file when the user gave none
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "pdf" => Some(PDF_MIME),
        "docx" => Some(DOCX_MIME),
        "txt" => Some(TEXT_MIME),
        "md" | "markdown" => Some(MARKDOWN_MIME),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_resolution() {
        assert_eq!(DocumentKind::from_mime("application/pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_mime(DOCX_MIME), DocumentKind::Docx);
        assert_eq!(
            DocumentKind::from_mime("text/plain; charset=utf-8"),
            DocumentKind::Text
        );
        assert_eq!(DocumentKind::from_mime("image/png"), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::from_mime(""), DocumentKind::Unsupported);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("cv.PDF")), Some(PDF_MIME));
        assert_eq!(mime_for_path(Path::new("cv.docx")), Some(DOCX_MIME));
        assert_eq!(mime_for_path(Path::new("notes.md")), Some(MARKDOWN_MIME));
        assert_eq!(mime_for_path(Path::new("cv.doc")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }
}
