//! Analysis engine: skill extraction, semantic matching, and ATS scoring

use crate::config::Config;
use crate::error::{AssistantError, Result};
use crate::processing::embeddings::Embedder;
use crate::processing::matcher::{MatchResult, SemanticMatcher};
use crate::processing::scoring::{AtsScore, BoostPolicy};
use crate::processing::skill_extractor::SkillExtractor;
use crate::processing::vocabulary::role_priority_skills;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Inputs of one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_description: String,
    pub role: String,
}

/// Everything one analysis run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub role: String,
    /// Extracted JD skills after truncation
    pub jd_skills: Vec<String>,
    pub role_skills: Vec<String>,
    pub matches: MatchResult,
    pub score: AtsScore,
    pub similarity_threshold: f32,
    pub embedding_model: String,
    pub processing_time_ms: u64,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisOutcome {
    pub fn found_skills(&self) -> &[String] {
        &self.matches.found
    }

    pub fn missing_skills(&self) -> &[String] {
        &self.matches.missing
    }
}

/// Coordinates the pipeline over an injected embedder
pub struct AnalysisEngine {
    extractor: SkillExtractor,
    embedder: Arc<dyn Embedder>,
    similarity_threshold: f32,
    max_jd_skills: usize,
    boost: BoostPolicy,
}

impl AnalysisEngine {
    pub fn new(config: &Config, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            extractor: SkillExtractor::new(),
            embedder,
            similarity_threshold: config.matching.similarity_threshold,
            max_jd_skills: config.matching.max_jd_skills,
            boost: BoostPolicy::from(&config.scoring),
        }
    }

    pub fn with_extractor(mut self, extractor: SkillExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        let start_time = Instant::now();

        if request.job_description.trim().is_empty() {
            return Err(AssistantError::MissingInput(
                "paste a job description before analyzing".to_string(),
            ));
        }

        let resume_text = request.resume_text.to_lowercase();
        if resume_text.trim().is_empty() {
            warn!("Resume text is empty; every skill will be reported missing");
        }

        let jd_skills = self
            .extractor
            .extract_limited(&request.job_description, self.max_jd_skills);
        info!("Extracted {} JD skills: {}", jd_skills.len(), jd_skills.join(", "));

        let matcher = SemanticMatcher::new(self.embedder.as_ref(), self.similarity_threshold);
        let matches = matcher.match_skills(&resume_text, &jd_skills)?;

        let role_skills = role_priority_skills(&request.role);
        let score = AtsScore::compute(&matches.found, &jd_skills, &role_skills, &self.boost);
        info!(
            "ATS score for '{}': raw {} -> {} ({} found, {} missing)",
            request.role,
            score.raw,
            score.value,
            matches.found.len(),
            matches.missing.len()
        );

        Ok(AnalysisOutcome {
            role: request.role.clone(),
            jd_skills,
            role_skills,
            matches,
            score,
            similarity_threshold: self.similarity_threshold,
            embedding_model: self.embedder.model_name().to_string(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            analyzed_at: Utc::now(),
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.extractor.vocabulary_size()
    }
}
