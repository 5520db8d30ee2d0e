//! Error handling for the job application assistant

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document extraction error: {0}")]
    DocumentExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Text generation error: {0}")]
    Generation(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("No analysis available for session {0}; run an analysis first")]
    NoAnalysis(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;

/// model2vec reports load failures as anyhow errors; keep the whole context chain
impl From<anyhow::Error> for AssistantError {
    fn from(err: anyhow::Error) -> Self {
        AssistantError::ModelLoading(format!("{:#}", err))
    }
}

/// Convert candle core errors to our error type
impl From<candle_core::Error> for AssistantError {
    fn from(err: candle_core::Error) -> Self {
        AssistantError::ModelError(err.to_string())
    }
}

impl AssistantError {
    /// Whether the error came from an external model call
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            AssistantError::Embedding(_)
                | AssistantError::Generation(_)
                | AssistantError::ModelLoading(_)
                | AssistantError::ModelError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_failure_classification() {
        assert!(AssistantError::Embedding("down".into()).is_model_failure());
        assert!(AssistantError::Generation("oom".into()).is_model_failure());
        assert!(!AssistantError::MissingInput("resume".into()).is_model_failure());
    }

    #[test]
    fn test_display_messages() {
        let err = AssistantError::UnsupportedFormat("image/png".into());
        assert_eq!(err.to_string(), "File format not supported: image/png");

        let err = AssistantError::NoAnalysis("abc".into());
        assert!(err.to_string().contains("run an analysis first"));
    }

    #[test]
    fn test_anyhow_context_chain_is_kept() {
        let err: AssistantError = anyhow::anyhow!("config.json not found")
            .context("Failed to load embedding model 'potion'")
            .into();

        assert!(err.is_model_failure());
        match err {
            AssistantError::ModelLoading(msg) => {
                assert_eq!(msg, "Failed to load embedding model 'potion': config.json not found")
            }
            other => panic!("expected ModelLoading, got {:?}", other),
        }
    }
}
