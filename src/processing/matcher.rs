//! Semantic skill matching against resume text

use crate::error::Result;
use crate::processing::embeddings::{cosine_similarity, Embedder};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub found: Vec<String>,
    pub missing: Vec<String>,
    /// Similarity per JD skill, in JD-skill order
    pub similarities: Vec<SkillSimilarity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSimilarity {
    pub skill: String,
    pub similarity: f32,
}

/// Decides which skills the resume covers by cosine similarity
pub struct SemanticMatcher<'a> {
    embedder: &'a dyn Embedder,
    threshold: f32,
}

impl<'a> SemanticMatcher<'a> {
    pub fn new(embedder: &'a dyn Embedder, threshold: f32) -> Self {
        Self { embedder, threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Split `skills` into found and missing. The resume is embedded once;
    /// any embedder failure aborts the whole match.
    pub fn match_skills(&self, resume_text: &str, skills: &[String]) -> Result<MatchResult> {
        let mut result = MatchResult::default();
        if skills.is_empty() {
            return Ok(result);
        }

        let resume_embedding = self.embedder.embed(resume_text)?;

        for skill in skills {
            let skill_embedding = self.embedder.embed(skill)?;
            let similarity = cosine_similarity(&skill_embedding, &resume_embedding)?;
            debug!("Similarity '{}': {:.3}", skill, similarity);

            if similarity >= self.threshold {
                result.found.push(skill.clone());
            } else {
                result.missing.push(skill.clone());
            }
            result.similarities.push(SkillSimilarity {
                skill: skill.clone(),
                similarity,
            });
        }

        Ok(result)
    }
}
