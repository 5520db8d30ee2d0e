//! Integration tests for the job application assistant

use job_assistant::config::Config;
use job_assistant::error::{AssistantError, Result};
use job_assistant::input::file_detector::{DOCX_MIME, PDF_MIME};
use job_assistant::input::{InputManager, Upload};
use job_assistant::llm::{Generator, FALLBACK_RESPONSE};
use job_assistant::processing::Embedder;
use job_assistant::session::Speaker;
use job_assistant::{resolve_role, AssistantApp, RoleChoice};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use zip::write::SimpleFileOptions;

const JOB_SKILLS: [&str; 8] = [
    "python", "docker", "kubernetes", "aws", "flask", "fastapi", "sql", "mongodb",
];

/// One dimension per job skill, set when the text mentions it
struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let text = text.to_lowercase();
        Ok(JOB_SKILLS
            .iter()
            .map(|skill| if text.contains(skill) { 1.0 } else { 0.0 })
            .chain(std::iter::once(0.01))
            .collect())
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}

struct CannedGenerator(&'static str);

impl Generator for CannedGenerator {
    fn generate(&self, prompt: &str, _max_length: usize) -> Result<String> {
        assert!(prompt.contains("ATS DETAILS:"));
        Ok(self.0.to_string())
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

fn app(reply: &'static str) -> AssistantApp {
    AssistantApp::new(
        &Config::default(),
        Arc::new(KeywordEmbedder),
        Arc::new(CannedGenerator(reply)),
    )
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = manager.extract_text(path, None).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path, None).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("FastAPI"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_text_extraction_from_pdf() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.pdf");

    let text = manager.extract_text(path, None).await.unwrap();
    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Python and Docker"));
    assert!(text.find("Jane Doe") < text.find("Python and Docker"));
}

#[tokio::test]
async fn test_pdf_resume_analysis() {
    let mut app = app("• Add Kubernetes to a project");
    let session = app.new_session();

    let outcome = app
        .analyze_path(
            session,
            Path::new("tests/fixtures/sample_resume.pdf"),
            None,
            "Python, Docker and Kubernetes",
            "Other",
        )
        .await
        .unwrap();

    assert_eq!(outcome.found_skills(), ["python", "docker"]);
    assert_eq!(outcome.missing_skills(), ["kubernetes"]);
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path, None).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path, None).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    assert!(manager.extract_text(path, None).await.is_err());
}

#[tokio::test]
async fn test_declared_type_wins_over_extension() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path, Some(PDF_MIME)).await;
    assert!(matches!(result, Err(AssistantError::DocumentExtraction(_))));
}

#[test]
fn test_docx_upload() {
    let upload = Upload::new(
        "cv.docx",
        DOCX_MIME,
        docx_bytes(&["Jane Doe", "Python and Docker"]),
    );

    let text = InputManager::new().extract_upload(&upload).unwrap();
    assert_eq!(text, "Jane Doe\nPython and Docker");
}

#[test]
fn test_unsupported_type_is_an_error() {
    let upload = Upload::new("cv.rtf", "application/rtf", b"{\\rtf1 python}".to_vec());

    assert!(matches!(
        InputManager::new().extract_upload(&upload),
        Err(AssistantError::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn test_full_session_flow() {
    let resume = Upload::from_path(Path::new("tests/fixtures/sample_resume.txt"), None)
        .await
        .unwrap();
    let job = std::fs::read_to_string("tests/fixtures/sample_job.txt").unwrap();

    let mut app = app("  ");
    let session = app.new_session();
    let role = resolve_role(RoleChoice::BackendDeveloper, None);

    let outcome = app.analyze(session, Some(&resume), &job, &role).unwrap();
    assert_eq!(outcome.jd_skills, JOB_SKILLS);
    assert_eq!(outcome.found_skills(), ["python", "docker", "flask", "sql"]);
    assert_eq!(
        outcome.missing_skills(),
        ["kubernetes", "aws", "fastapi", "mongodb"]
    );
    // 8 JD + 5 role skills; python 1 + docker 1 + flask 2 + sql 2 = 6 points
    assert_eq!(outcome.score.raw, 46);
    assert_eq!(outcome.score.value, 46);

    let answer = app.ask(session, "What should I add?").unwrap();
    assert_eq!(answer, FALLBACK_RESPONSE);

    let history = app.history(session);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].speaker, Speaker::You);
    assert_eq!(history[0].message, "What should I add?");
    assert_eq!(history[1].message, FALLBACK_RESPONSE);
}

#[test]
fn test_docx_resume_analysis() {
    let resume = Upload::new(
        "cv.docx",
        DOCX_MIME,
        docx_bytes(&["Jane Doe", "Kubernetes and AWS operator"]),
    );

    let mut app = app("• Mention Python projects");
    let session = app.new_session();
    let outcome = app
        .analyze(session, Some(&resume), "Python, Kubernetes, AWS", "Other")
        .unwrap();

    assert_eq!(outcome.found_skills(), ["kubernetes", "aws"]);
    assert_eq!(outcome.missing_skills(), ["python"]);
    // 2 of 3 with no role skills -> 66
    assert_eq!(outcome.score.value, 66);

    let answer = app.ask(session, "How to improve?").unwrap();
    assert_eq!(answer, "• Mention Python projects");
}

#[test]
fn test_question_without_analysis() {
    let mut app = app("• tip");
    let session = app.new_session();

    assert!(matches!(
        app.ask(session, "Anything?"),
        Err(AssistantError::NoAnalysis(_))
    ));
    assert!(app.history(session).is_empty());
}
