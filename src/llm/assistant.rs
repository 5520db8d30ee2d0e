//! Conversational assistant answering questions about one analysis

use crate::error::Result;
use crate::llm::generator::Generator;
use crate::llm::prompts::ChatPrompt;
use crate::processing::AnalysisOutcome;
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

/// Answer used when the model returns nothing usable
pub const FALLBACK_RESPONSE: &str = "• Add missing skills explicitly in your resume projects\n\
• Align project descriptions with job role requirements\n\
• Mention tools and technologies used for each project";

pub struct ChatAssistant {
    generator: Arc<dyn Generator>,
    max_length: usize,
}

impl ChatAssistant {
    pub fn new(generator: Arc<dyn Generator>, max_length: usize) -> Self {
        Self {
            generator,
            max_length,
        }
    }

    /// Generate advice for `question` grounded in `outcome`.
    ///
    /// Whitespace-only output becomes [`FALLBACK_RESPONSE`]; generator
    /// errors are returned unchanged.
    pub fn answer(&self, outcome: &AnalysisOutcome, question: &str) -> Result<String> {
        let start_time = Instant::now();
        let prompt = ChatPrompt::from_outcome(outcome, question).to_prompt()?;
        debug!("Chat prompt is {} characters", prompt.len());

        let response = self.generator.generate(&prompt, self.max_length)?;
        let response = response.trim();

        info!(
            "{} answered in {}ms",
            self.generator.model_name(),
            start_time.elapsed().as_millis()
        );

        if response.is_empty() {
            debug!("Empty generation, using fallback advice");
            return Ok(FALLBACK_RESPONSE.to_string());
        }
        Ok(response.to_string())
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }
}
