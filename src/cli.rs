//! CLI interface for the job application assistant

use crate::app::RoleChoice;
use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "job-assistant")]
#[command(about = "Score a resume against a job description and get ATS advice")]
#[command(long_about = "Extract skills from a job description, match them semantically against your resume, compute a role-weighted ATS score, and ask a local model how to close the gaps")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Declared MIME type of the resume (derived from the extension when omitted)
        #[arg(long)]
        resume_type: Option<String>,

        /// Path to job description file
        #[arg(short, long, conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description text
        #[arg(long)]
        job_text: Option<String>,

        /// Target role
        #[arg(long, value_enum, default_value_t = RoleChoice::SoftwareEngineer)]
        role: RoleChoice,

        /// Role label used with `--role other`
        #[arg(long)]
        custom_role: Option<String>,

        /// Question for the assistant (repeatable)
        #[arg(short, long)]
        ask: Vec<String>,

        /// Keep chatting interactively after the analysis
        #[arg(long)]
        chat: bool,

        /// Output format: console, json, markdown
        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,

        /// Show similarities, role skills, and timing
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show the skill vocabulary or a role's priority skills
    Skills {
        /// Role label, e.g. "Data Analyst"
        #[arg(long)]
        role: Option<String>,
    },

    /// Model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available generator models
    List,

    /// Download a model
    Download {
        /// Model id from the catalogue
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a downloaded model
    Remove {
        model: String,
    },

    /// Show model information
    Info {
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}
