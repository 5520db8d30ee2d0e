//! Text extraction from uploaded document bytes

use crate::error::{AssistantError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::{Cursor, Read};

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Concatenate per-page text. Pages without text contribute nothing and no
/// separator is inserted between pages.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    pages.into_iter().fold(String::new(), |mut text, page| {
        if let Some(page) = page {
            text.push_str(page.as_ref());
        }
        text
    })
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
            AssistantError::DocumentExtraction(format!("Failed to extract text from PDF: {}", e))
        })?;
        Ok(join_pages(pages.into_iter().map(Some)))
    }
}

/// Word-processing (.docx) extractor: body paragraphs joined by newlines
pub struct DocxExtractor;

const DOCUMENT_PART: &str = "word/document.xml";

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            AssistantError::DocumentExtraction(format!("Not a valid .docx archive: {}", e))
        })?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| {
                AssistantError::DocumentExtraction(format!("Missing {}: {}", DOCUMENT_PART, e))
            })?
            .read_to_string(&mut xml)?;

        let paragraphs = Self::paragraphs(&xml)?;
        Ok(paragraphs.join("\n"))
    }
}

impl DocxExtractor {
    /// Collect the text of top-level body paragraphs. Paragraphs inside
    /// tables and text boxes are skipped.
    fn paragraphs(xml: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml);
        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut table_depth = 0usize;
        let mut paragraph_depth = 0usize;
        let mut in_text = false;

        loop {
            let collecting = table_depth == 0 && paragraph_depth == 1;
            match reader.read_event().map_err(xml_err)? {
                XmlEvent::Start(e) => match e.name().as_ref() {
                    b"w:tbl" => table_depth += 1,
                    b"w:p" => {
                        paragraph_depth += 1;
                        if table_depth == 0 && paragraph_depth == 1 {
                            current.clear();
                        }
                    }
                    b"w:t" => in_text = true,
                    _ => {}
                },
                XmlEvent::End(e) => match e.name().as_ref() {
                    b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                    b"w:p" => {
                        if collecting {
                            paragraphs.push(std::mem::take(&mut current));
                        }
                        paragraph_depth = paragraph_depth.saturating_sub(1);
                    }
                    b"w:t" => in_text = false,
                    _ => {}
                },
                XmlEvent::Empty(e) => match e.name().as_ref() {
                    b"w:p" if table_depth == 0 && paragraph_depth == 0 => {
                        paragraphs.push(String::new());
                    }
                    b"w:tab" if collecting => current.push('\t'),
                    b"w:br" | b"w:cr" if collecting => current.push('\n'),
                    _ => {}
                },
                XmlEvent::Text(t) if collecting && in_text => {
                    current.push_str(&t.decode().map_err(xml_err)?);
                }
                XmlEvent::GeneralRef(r) if collecting && in_text => {
                    if let Some(ch) = r.resolve_char_ref().map_err(xml_err)? {
                        current.push(ch);
                    } else {
                        let name = r.decode().map_err(xml_err)?;
                        if let Some(value) = quick_xml::escape::resolve_predefined_entity(&name) {
                            current.push_str(value);
                        }
                    }
                }
                XmlEvent::Eof => break,
                _ => {}
            }
        }

        Ok(paragraphs)
    }
}

fn xml_err(e: impl std::fmt::Display) -> AssistantError {
    AssistantError::DocumentExtraction(format!("Malformed {}: {}", DOCUMENT_PART, e))
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            AssistantError::DocumentExtraction(format!("Text file is not valid UTF-8: {}", e))
        })
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown = PlainTextExtractor.extract(bytes)?;
        Ok(Self::markdown_to_text(&markdown))
    }
}

impl MarkdownExtractor {
    fn markdown_to_text(markdown: &str) -> String {
        let mut text = String::new();
        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_treats_missing_page_as_empty() {
        let pages = vec![Some("Hello "), None, Some("World")];
        assert_eq!(join_pages(pages), "Hello World");
    }

    #[test]
    fn test_join_pages_empty_document() {
        let pages: Vec<Option<String>> = Vec::new();
        assert_eq!(join_pages(pages), "");
    }

    #[test]
    fn test_docx_paragraphs() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Python </w:t></w:r><w:r><w:t>&amp; SQL</w:t></w:r></w:p>
    <w:p/>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>table cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
    <w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>Docker</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let paragraphs = DocxExtractor::paragraphs(xml).unwrap();
        assert_eq!(
            paragraphs,
            vec!["Jane Doe", "Python & SQL", "", "Skills\tDocker"]
        );
    }

    #[test]
    fn test_docx_rejects_non_archive() {
        let result = DocxExtractor.extract(b"definitely not a zip");
        assert!(matches!(result, Err(AssistantError::DocumentExtraction(_))));
    }

    #[test]
    fn test_markdown_strips_formatting() {
        let md = b"# Jane Doe\n\n## Skills\n\n- **Python**\n- `docker`\n\nBuilt a *REST API*.";
        let text = MarkdownExtractor.extract(md).unwrap();

        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Python"));
        assert!(text.contains("docker"));
        assert!(text.contains("Built a REST API."));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
    }

    #[test]
    fn test_plain_text_requires_utf8() {
        assert_eq!(PlainTextExtractor.extract(b"sql").unwrap(), "sql");
        assert!(PlainTextExtractor.extract(&[0xff, 0xfe, 0x00]).is_err());
    }
}
