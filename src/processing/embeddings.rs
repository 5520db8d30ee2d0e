//! Sentence embeddings behind the `Embedder` capability

use crate::error::{AssistantError, Result};
use anyhow::Context;
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// Turns text into a fixed-dimension vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Human-readable model identifier
    fn model_name(&self) -> &str;
}

/// Model2Vec static embeddings, loaded once per process
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEmbedder {
    /// Load from a local folder or a Hugging Face repo id
    pub fn load(repo_or_path: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model: {}", repo_or_path);

        let model = StaticModel::from_pretrained(Path::new(repo_or_path), None, None, None)
            .with_context(|| format!("Failed to load embedding model '{}'", repo_or_path))?;

        info!("Embedding model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: repo_or_path.to_string(),
        })
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.model.encode_single(text);
        if embedding.is_empty() {
            return Err(AssistantError::Embedding(format!(
                "Model '{}' returned an empty embedding",
                self.model_name
            )));
        }
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Memoizes another embedder by input text.
///
/// Hits come from repeated analyses in one long-lived `AssistantApp` (a
/// re-analysis in the same session embeds the same skills again); a single
/// CLI run embeds each phrase once.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self.cache.lock().ok().and_then(|c| c.get(text).cloned()) {
            debug!("Embedding cache hit ({} chars)", text.len());
            return Ok(hit);
        }

        let embedding = self.inner.embed(text)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(text.to_string(), embedding.clone());
        }
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

/// Cosine similarity in [-1, 1]. Zero vectors give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(AssistantError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    impl Embedder for CountingEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, 1.0])
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap() + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(AssistantError::Embedding(_))
        ));
    }

    #[test]
    fn test_cached_embedder_reuses_vectors() {
        let cached = CachedEmbedder::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });

        let first = cached.embed("python").unwrap();
        let second = cached.embed("python").unwrap();
        cached.embed("sql").unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cache_size(), 2);
        assert_eq!(cached.model_name(), "counting");

        cached.clear_cache();
        assert_eq!(cached.cache_size(), 0);
    }
}
