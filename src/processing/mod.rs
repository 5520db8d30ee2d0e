//! Skill extraction, semantic matching, and ATS scoring

pub mod analyzer;
pub mod embeddings;
pub mod matcher;
pub mod scoring;
pub mod skill_extractor;
pub mod vocabulary;

pub use analyzer::{AnalysisEngine, AnalysisOutcome, AnalysisRequest};
pub use embeddings::{CachedEmbedder, Embedder, Model2VecEmbedder};
