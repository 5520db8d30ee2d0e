//! Job description skill extraction by word-boundary regex

use crate::processing::vocabulary::COMMON_TECH_SKILLS;
use regex::Regex;

/// Scans text for vocabulary skills. Patterns are compiled once.
pub struct SkillExtractor {
    patterns: Vec<(String, Regex)>,
}

impl Default for SkillExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillExtractor {
    /// Extractor over the built-in vocabulary
    pub fn new() -> Self {
        Self::with_vocabulary(COMMON_TECH_SKILLS.iter().copied())
    }

    pub fn with_vocabulary<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = vocabulary
            .into_iter()
            .map(|skill| {
                let skill = skill.as_ref().to_lowercase();
                let regex = Regex::new(&Self::boundary_pattern(&skill))
                    .expect("escaped skill pattern is valid");
                (skill, regex)
            })
            .collect();

        Self { patterns }
    }

    /// Whole-token pattern for a skill. `\b` only holds next to a word
    /// character, so edges such as the `++` of `c++` instead require a
    /// non-word neighbour or the end of the text.
    fn boundary_pattern(skill: &str) -> String {
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let leading = match skill.chars().next() {
            Some(c) if !is_word(c) => r"(?:^|\W)",
            _ => r"\b",
        };
        let trailing = match skill.chars().last() {
            Some(c) if !is_word(c) => r"(?:\W|$)",
            _ => r"\b",
        };
        format!("{}{}{}", leading, regex::escape(skill), trailing)
    }

    /// Skills present in `text`, in vocabulary order
    pub fn extract(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        self.patterns
            .iter()
            .filter(|(_, regex)| regex.is_match(&text))
            .map(|(skill, _)| skill.clone())
            .collect()
    }

    /// Skills present in `text`, keeping at most `limit`
    pub fn extract_limited(&self, text: &str, limit: usize) -> Vec<String> {
        let mut skills = self.extract(text);
        skills.truncate(limit);
        skills
    }

    pub fn vocabulary_size(&self) -> usize {
        self.patterns.len()
    }
}
