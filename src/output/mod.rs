//! Rendering of analyses and chat transcripts

pub mod formatter;

pub use formatter::{AnalysisReport, OutputFormatter, ReportGenerator};
