//! Configuration management for the job application assistant

use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub matching: MatchingConfig,
    pub scoring: ScoringConfig,
    pub generation: GenerationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Model2Vec repo id or local folder
    pub embedding_model: String,
    /// Key into the generator model catalogue
    pub generator_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Cosine similarity at or above which a skill counts as present
    pub similarity_threshold: f32,
    /// How many extracted JD skills take part in matching
    pub max_jd_skills: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Raw scores strictly below this receive the bonus
    pub boost_below: u32,
    pub boost_amount: u32,
    pub max_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".job-assistant")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                embedding_model: "minishlab/potion-base-8M".to_string(),
                generator_model: "flan-t5-base".to_string(),
            },
            matching: MatchingConfig {
                similarity_threshold: 0.25,
                max_jd_skills: 10,
            },
            scoring: ScoringConfig {
                boost_below: 40,
                boost_amount: 20,
                max_score: 100,
            },
            generation: GenerationConfig { max_length: 200 },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                AssistantError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            AssistantError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-assistant")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    fn validate(&self) -> Result<()> {
        let threshold = self.matching.similarity_threshold;
        if !(-1.0..=1.0).contains(&threshold) {
            return Err(AssistantError::Configuration(format!(
                "matching.similarity_threshold must be within [-1, 1], got {}",
                threshold
            )));
        }
        if self.scoring.max_score == 0 {
            return Err(AssistantError::Configuration(
                "scoring.max_score must be positive".to_string(),
            ));
        }
        if self.scoring.boost_amount > self.scoring.max_score {
            return Err(AssistantError::Configuration(format!(
                "scoring.boost_amount must not exceed scoring.max_score ({}), got {}",
                self.scoring.max_score, self.scoring.boost_amount
            )));
        }
        if self.generation.max_length == 0 {
            return Err(AssistantError::Configuration(
                "generation.max_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
