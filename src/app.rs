//! Presentation-facing orchestrator: uploads in, analysis and answers out

use crate::config::Config;
use crate::error::{AssistantError, Result};
use crate::input::{InputManager, Upload};
use crate::llm::{ChatAssistant, Generator};
use crate::processing::vocabulary::OTHER_ROLE;
use crate::processing::{AnalysisEngine, AnalysisOutcome, AnalysisRequest, Embedder};
use crate::session::{ChatTurn, SessionId, SessionStore};
use clap::ValueEnum;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Target role offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum RoleChoice {
    MlEngineer,
    DataScientist,
    DataAnalyst,
    SoftwareEngineer,
    BackendDeveloper,
    Other,
}

impl RoleChoice {
    pub fn label(&self) -> &'static str {
        match self {
            RoleChoice::MlEngineer => "ML Engineer",
            RoleChoice::DataScientist => "Data Scientist",
            RoleChoice::DataAnalyst => "Data Analyst",
            RoleChoice::SoftwareEngineer => "Software Engineer",
            RoleChoice::BackendDeveloper => "Backend Developer",
            RoleChoice::Other => OTHER_ROLE,
        }
    }
}

/// Role label used for scoring and prompts. A custom label only applies to
/// `Other` and only when it has content.
pub fn resolve_role(choice: RoleChoice, custom: Option<&str>) -> String {
    match (choice, custom.map(str::trim)) {
        (RoleChoice::Other, Some(label)) if !label.is_empty() => label.to_string(),
        _ => choice.label().to_string(),
    }
}

fn require_job_description(job_description: &str) -> Result<()> {
    if job_description.trim().is_empty() {
        return Err(AssistantError::MissingInput(
            "paste a job description before analyzing".to_string(),
        ));
    }
    Ok(())
}

pub struct AssistantApp {
    input: InputManager,
    engine: AnalysisEngine,
    assistant: ChatAssistant,
    sessions: SessionStore,
}

impl AssistantApp {
    pub fn new(config: &Config, embedder: Arc<dyn Embedder>, generator: Arc<dyn Generator>) -> Self {
        Self {
            input: InputManager::new(),
            engine: AnalysisEngine::new(config, embedder),
            assistant: ChatAssistant::new(generator, config.generation.max_length),
            sessions: SessionStore::new(),
        }
    }

    pub fn new_session(&mut self) -> SessionId {
        self.sessions.create()
    }

    /// Extract the resume, run the pipeline, and store the result in the
    /// session. A failure leaves any earlier analysis in place.
    pub fn analyze(
        &mut self,
        session: SessionId,
        resume: Option<&Upload>,
        job_description: &str,
        role: &str,
    ) -> Result<&AnalysisOutcome> {
        let resume = resume.ok_or_else(|| {
            AssistantError::MissingInput("upload a resume before analyzing".to_string())
        })?;
        require_job_description(job_description)?;

        let resume_text = self.input.extract_upload(resume)?;
        self.run_analysis(session, &resume.file_name, resume_text, job_description, role)
    }

    /// Same as [`AssistantApp::analyze`] for a resume on disk. Extracted text
    /// is cached per path and declared type for the lifetime of the app.
    pub async fn analyze_path(
        &mut self,
        session: SessionId,
        resume: &Path,
        mime_type: Option<&str>,
        job_description: &str,
        role: &str,
    ) -> Result<&AnalysisOutcome> {
        require_job_description(job_description)?;

        let resume_text = self.input.extract_text(resume, mime_type).await?;
        let source = resume.display().to_string();
        self.run_analysis(session, &source, resume_text, job_description, role)
    }

    fn run_analysis(
        &mut self,
        session: SessionId,
        source: &str,
        resume_text: String,
        job_description: &str,
        role: &str,
    ) -> Result<&AnalysisOutcome> {
        if resume_text.trim().is_empty() {
            warn!("No text could be extracted from {}", source);
        }

        let outcome = self.engine.analyze(&AnalysisRequest {
            resume_text,
            job_description: job_description.to_string(),
            role: role.to_string(),
        })?;
        info!("Session {} analysis stored", session);

        let stored = self.sessions.record_analysis(session, outcome);
        stored.require_analysis()
    }

    /// Answer a question against the session's analysis. History only grows
    /// when generation succeeds.
    pub fn ask(&mut self, session: SessionId, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let outcome = self.sessions.analysis_for(&session)?;
        let answer = self.assistant.answer(outcome, question)?;
        self.sessions.record_exchange(&session, question, &answer)?;

        Ok(answer)
    }

    pub fn analysis(&self, session: SessionId) -> Option<&AnalysisOutcome> {
        self.sessions.get(&session).and_then(|s| s.analysis.as_ref())
    }

    pub fn history(&self, session: SessionId) -> &[ChatTurn] {
        self.sessions.history(&session)
    }

    pub fn generator_name(&self) -> &str {
        self.assistant.model_name()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.engine.vocabulary_size()
    }
}
