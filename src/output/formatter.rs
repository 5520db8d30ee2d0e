//! Output formatters for analysis results and chat transcripts

use crate::config::OutputFormat;
use crate::error::{AssistantError, Result};
use crate::processing::AnalysisOutcome;
use crate::session::{ChatTurn, Speaker};
use colored::{Color, Colorize};
use serde::Serialize;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

/// What gets rendered: one analysis plus the conversation about it
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport<'a> {
    pub resume_file: &'a str,
    pub outcome: &'a AnalysisOutcome,
    pub transcript: &'a [ChatTurn],
    pub generator_model: &'a str,
    pub version: &'static str,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(
        resume_file: &'a str,
        outcome: &'a AnalysisOutcome,
        transcript: &'a [ChatTurn],
        generator_model: &'a str,
    ) -> Self {
        Self {
            resume_file,
            outcome,
            transcript,
            generator_model,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport<'_>) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u32) -> String {
        let (badge, color) = match score {
            80..=100 => ("STRONG", Color::Green),
            60..=79 => ("GOOD", Color::Yellow),
            40..=59 => ("FAIR", Color::BrightYellow),
            _ => ("WEAK", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_skill_list(&self, skills: &[String], color: Color) -> String {
        if skills.is_empty() {
            return format!("  {}\n", self.colorize("(none)", Color::BrightBlack));
        }
        skills
            .iter()
            .map(|skill| format!("  • {}\n", self.colorize(skill, color)))
            .collect()
    }

    fn format_similarities(&self, outcome: &AnalysisOutcome) -> String {
        let width = outcome
            .matches
            .similarities
            .iter()
            .map(|s| s.skill.graphemes(true).count())
            .max()
            .unwrap_or(0);

        let mut output = String::new();
        for entry in &outcome.matches.similarities {
            let padding = width - entry.skill.graphemes(true).count();
            let color = if entry.similarity >= outcome.similarity_threshold {
                Color::Green
            } else {
                Color::Red
            };
            output.push_str(&format!(
                "  {}{}  {}\n",
                entry.skill,
                " ".repeat(padding),
                self.colorize(&format!("{:.3}", entry.similarity), color)
            ));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport<'_>) -> Result<String> {
        let outcome = report.outcome;
        let mut output = String::new();

        output.push_str(&self.format_header("📊 ATS ANALYSIS", 1));
        output.push_str(&format!(
            "Resume: {} | Role: {}\n",
            report.resume_file, outcome.role
        ));

        output.push_str(&self.format_header("ATS Score", 2));
        output.push_str(&format!(
            "  {}/100 {}\n",
            self.colorize(&outcome.score.value.to_string(), Color::Cyan),
            self.format_score_badge(outcome.score.value)
        ));
        if self.detailed && outcome.score.boosted {
            output.push_str(&format!("  raw score {} before boost\n", outcome.score.raw));
        }

        output.push_str(&self.format_header("✅ Matched Skills", 2));
        output.push_str(&self.format_skill_list(outcome.found_skills(), Color::Green));

        output.push_str(&self.format_header("❌ Missing Skills", 2));
        output.push_str(&self.format_skill_list(outcome.missing_skills(), Color::Red));

        if self.detailed {
            if !outcome.matches.similarities.is_empty() {
                output.push_str(&self.format_header(
                    &format!("Similarities (threshold {:.2})", outcome.similarity_threshold),
                    3,
                ));
                output.push_str(&self.format_similarities(outcome));
            }

            if !outcome.role_skills.is_empty() {
                output.push_str(&self.format_header("Role Priority Skills", 3));
                output.push_str(&format!("  {}\n", outcome.role_skills.join(", ")));
            }
        }

        if !report.transcript.is_empty() {
            output.push_str(&self.format_header("💬 Chat", 2));
            for turn in report.transcript {
                output.push_str(&format_turn_console(self, turn));
            }
        }

        if self.detailed {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize(
                    &format!(
                        "Models: {} + {} | Processing time: {}ms | v{}",
                        outcome.embedding_model,
                        report.generator_model,
                        outcome.processing_time_ms,
                        report.version
                    ),
                    Color::BrightBlack
                )
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

fn format_turn_console(formatter: &ConsoleFormatter, turn: &ChatTurn) -> String {
    match turn.speaker {
        Speaker::You => format!(
            "{} {}\n",
            formatter.colorize("🧑 You:", Color::Cyan),
            turn.message
        ),
        Speaker::Assistant => format!(
            "{}\n{}\n",
            formatter.colorize("🤖 Assistant:", Color::Magenta),
            turn.message
        ),
    }
}

/// Render a single chat turn for interactive use
pub fn render_turn(turn: &ChatTurn, use_colors: bool) -> String {
    format_turn_console(&ConsoleFormatter::new(use_colors, false), turn)
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport<'_>) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn skill_lines(skills: &[String]) -> String {
        if skills.is_empty() {
            return "_None_\n".to_string();
        }
        skills.iter().map(|s| format!("- {}\n", s)).collect()
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport<'_>) -> Result<String> {
        let outcome = report.outcome;
        let mut output = String::new();

        output.push_str("# ATS Analysis\n\n");
        output.push_str(&format!("**Resume:** {}  \n", report.resume_file));
        output.push_str(&format!("**Role:** {}  \n", outcome.role));
        output.push_str(&format!("**ATS Score:** {}/100\n\n", outcome.score.value));

        output.push_str("## Matched Skills\n\n");
        output.push_str(&Self::skill_lines(outcome.found_skills()));
        output.push_str("\n## Missing Skills\n\n");
        output.push_str(&Self::skill_lines(outcome.missing_skills()));

        if !report.transcript.is_empty() {
            output.push_str("\n## Chat\n\n");
            for turn in report.transcript {
                match turn.speaker {
                    Speaker::You => output.push_str(&format!("**🧑 You:** {}\n\n", turn.message)),
                    Speaker::Assistant => {
                        output.push_str(&format!("**🤖 Assistant:**\n{}\n\n", turn.message))
                    }
                }
            }
        }

        if self.include_metadata {
            output.push_str("\n---\n\n");
            output.push_str(&format!(
                "_Generated {} by job-assistant v{} using {} and {}; raw score {}, threshold {:.2}._\n",
                outcome.analyzed_at.format("%Y-%m-%d %H:%M UTC"),
                report.version,
                outcome.embedding_model,
                report.generator_model,
                outcome.score.raw,
                outcome.similarity_threshold
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

/// Picks the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(detailed),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport<'_>, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content).map_err(|e| {
        AssistantError::OutputFormatting(format!(
            "Failed to write {}: {}",
            file_path.display(),
            e
        ))
    })
}
