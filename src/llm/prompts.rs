//! Chat prompt grounded in the current analysis

use crate::error::{AssistantError, Result};
use crate::processing::AnalysisOutcome;
use askama::Template;

/// Instruction prompt for the ATS assistant. The model only sees the
/// analysis summary, never the full resume.
#[derive(Template, Debug, Clone)]
#[template(
    source = r#"You are an ATS resume expert.

STRICT RULES:
- Give ONLY ATS-related resume advice
- NO generic suggestions (do NOT say apply for jobs, gain experience, learn skills)
- Use the missing skills ONLY
- Give 3–4 bullet points
- Be practical and specific

ATS DETAILS:
Role: {{ role }}
ATS Score: {{ score }}
Matched Skills: {{ matched_skills }}
Missing Skills: {{ missing_skills }}

User Question:
{{ question }}

Answer (bullet points only):
"#,
    ext = "txt"
)]
pub struct ChatPrompt {
    pub role: String,
    pub score: u32,
    pub matched_skills: String,
    pub missing_skills: String,
    pub question: String,
}

impl ChatPrompt {
    pub fn from_outcome(outcome: &AnalysisOutcome, question: &str) -> Self {
        Self {
            role: outcome.role.clone(),
            score: outcome.score.value,
            matched_skills: outcome.found_skills().join(", "),
            missing_skills: outcome.missing_skills().join(", "),
            question: question.to_string(),
        }
    }

    pub fn to_prompt(&self) -> Result<String> {
        self.render()
            .map_err(|e| AssistantError::Generation(format!("Failed to render prompt: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> ChatPrompt {
        ChatPrompt {
            role: "Data Analyst".to_string(),
            score: 62,
            matched_skills: "sql, excel".to_string(),
            missing_skills: "power bi".to_string(),
            question: "How do I improve?".to_string(),
        }
    }

    #[test]
    fn test_prompt_carries_analysis_details() {
        let text = prompt().to_prompt().unwrap();

        assert!(text.starts_with("You are an ATS resume expert."));
        assert!(text.contains("Role: Data Analyst\n"));
        assert!(text.contains("ATS Score: 62\n"));
        assert!(text.contains("Matched Skills: sql, excel\n"));
        assert!(text.contains("Missing Skills: power bi\n"));
        assert!(text.contains("User Question:\nHow do I improve?\n"));
        assert!(text.trim_end().ends_with("Answer (bullet points only):"));
    }

    #[test]
    fn test_text_is_not_html_escaped() {
        let mut chat = prompt();
        chat.question = "C++ & <Rust>?".to_string();

        let text = chat.to_prompt().unwrap();
        assert!(text.contains("C++ & <Rust>?"));
    }

    #[test]
    fn test_empty_skill_lists_render_blank() {
        let mut chat = prompt();
        chat.matched_skills.clear();

        let text = chat.to_prompt().unwrap();
        assert!(text.contains("Matched Skills: \n"));
    }
}
