//! Generator model management: catalogue, download, and local inventory

use crate::error::{AssistantError, Result};
use hf_hub::api::tokio::Api;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files a text2text model folder must hold
pub const REQUIRED_FILES: [&str; 3] = ["config.json", "tokenizer.json", "model.safetensors"];

/// Information about an available generator model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub capabilities: Vec<String>,
}

/// Manager for generator models - handles download, caching, and selection
pub struct ModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, ModelInfo>,
    downloaded_models: HashSet<String>,
}

impl ModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                AssistantError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: Self::catalogue(),
            downloaded_models: HashSet::new(),
        };
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    fn catalogue() -> BTreeMap<String, ModelInfo> {
        let capabilities = || {
            vec![
                "instruction-following".to_string(),
                "text2text-generation".to_string(),
            ]
        };

        let mut models = BTreeMap::new();
        models.insert(
            "flan-t5-small".to_string(),
            ModelInfo {
                name: "FLAN-T5 Small".to_string(),
                repo_id: "google/flan-t5-small".to_string(),
                size_mb: 310,
                description: "Smallest instruction-tuned T5, fast on any CPU".to_string(),
                capabilities: capabilities(),
            },
        );
        models.insert(
            "flan-t5-base".to_string(),
            ModelInfo {
                name: "FLAN-T5 Base".to_string(),
                repo_id: "google/flan-t5-base".to_string(),
                size_mb: 990,
                description: "Default assistant model, good balance of size and quality"
                    .to_string(),
                capabilities: capabilities(),
            },
        );
        models.insert(
            "flan-t5-large".to_string(),
            ModelInfo {
                name: "FLAN-T5 Large".to_string(),
                repo_id: "google/flan-t5-large".to_string(),
                size_mb: 3130,
                description: "Higher quality answers, needs more memory".to_string(),
                capabilities: capabilities(),
            },
        );
        models
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            AssistantError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && Self::is_complete(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_complete(path: &Path) -> bool {
        for file in REQUIRED_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download a catalogue model into `models_dir/<model_id>`
    pub async fn download_model(&mut self, model_id: &str, force: bool) -> Result<PathBuf> {
        let model_info = self
            .available_models
            .get(model_id)
            .ok_or_else(|| AssistantError::ModelNotFound(model_id.to_string()))?
            .clone();

        let model_dir = self.models_dir.join(model_id);
        if !force && self.downloaded_models.contains(model_id) {
            return Ok(model_dir);
        }

        info!(
            "Downloading model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new().map_err(|e| {
            AssistantError::Network(format!("Failed to initialize HF API: {}", e))
        })?;
        let repo = api.model(model_info.repo_id.clone());

        for file in REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                AssistantError::Network(format!(
                    "Failed to download {} from {}: {}",
                    file, model_info.repo_id, e
                ))
            })?;
            fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                AssistantError::ModelError(format!("Failed to copy {}: {}", file, e))
            })?;
            info!("  downloaded {}", file);
        }

        self.downloaded_models.insert(model_id.to_string());
        Ok(model_dir)
    }

    /// Local folder of a model, downloading it first when missing
    pub async fn ensure_model(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id, false).await,
        }
    }

    pub async fn remove_model(&mut self, model_id: &str) -> Result<bool> {
        if !self.downloaded_models.remove(model_id) {
            return Ok(false);
        }
        fs::remove_dir_all(self.models_dir.join(model_id))
            .await
            .map_err(|e| AssistantError::ModelError(format!("Failed to remove model: {}", e)))?;
        Ok(true)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub fn list_available_models(&self) -> Vec<(&String, &ModelInfo)> {
        self.available_models.iter().collect()
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&ModelInfo> {
        self.available_models.get(model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }
}
