//! job-assistant: ATS resume analysis with semantic skill matching and local model advice

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use job_assistant::cli::{Cli, Commands, ConfigAction, ModelAction};
use job_assistant::config::{Config, OutputFormat};
use job_assistant::error::{AssistantError, Result};
use job_assistant::llm::{Generator, ModelManager, T5Generator};
use job_assistant::output::formatter::{render_turn, save_report_to_file};
use job_assistant::output::{AnalysisReport, ReportGenerator};
use job_assistant::processing::vocabulary::{known_roles, role_priority_skills, COMMON_TECH_SKILLS};
use job_assistant::processing::{CachedEmbedder, Embedder, Model2VecEmbedder};
use job_assistant::session::{ChatTurn, SessionId, Speaker};
use job_assistant::{resolve_role, AssistantApp, RoleChoice};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

struct AnalyzeArgs {
    resume: PathBuf,
    resume_type: Option<String>,
    job: Option<PathBuf>,
    job_text: Option<String>,
    role: RoleChoice,
    custom_role: Option<String>,
    questions: Vec<String>,
    chat: bool,
    output: OutputFormat,
    detailed: bool,
    save: Option<PathBuf>,
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            resume_type,
            job,
            job_text,
            role,
            custom_role,
            ask,
            chat,
            output,
            detailed,
            save,
        } => {
            let output = output.unwrap_or(config.output.format);
            let args = AnalyzeArgs {
                resume,
                resume_type,
                job,
                job_text,
                role,
                custom_role,
                questions: ask,
                chat,
                output,
                detailed,
                save,
            };
            run_analyze(args, &config).await
        }

        Commands::Skills { role } => {
            match role {
                Some(role) => {
                    let skills = role_priority_skills(&role);
                    if skills.is_empty() {
                        println!("⚠️  No priority skills for '{}'", role);
                        println!("Known roles: {}", known_roles().collect::<Vec<_>>().join(", "));
                    } else {
                        println!("🎯 Priority skills for {}:", role);
                        for skill in skills {
                            println!("  • {}", skill);
                        }
                    }
                }
                None => {
                    println!("📚 Skill vocabulary ({} skills):", COMMON_TECH_SKILLS.len());
                    for skill in COMMON_TECH_SKILLS {
                        println!("  • {}", skill);
                    }
                }
            }
            Ok(())
        }

        Commands::Models { action } => run_models(action, &config).await,

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        AssistantError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("⚙️  Current Configuration ({})\n", config_path.display());
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(config_path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
            Ok(())
        }
    }
}

async fn run_analyze(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let job_description = match (&args.job, &args.job_text) {
        (Some(path), _) => tokio::fs::read_to_string(path).await.map_err(|e| {
            AssistantError::InvalidInput(format!(
                "Cannot read job description {}: {}",
                path.display(),
                e
            ))
        })?,
        (None, Some(text)) => text.clone(),
        (None, None) => {
            return Err(AssistantError::MissingInput(
                "provide a job description with --job or --job-text".to_string(),
            ))
        }
    };

    let role = resolve_role(args.role, args.custom_role.as_deref());
    let resume_name = args
        .resume
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.resume.display().to_string());
    info!("Analyzing {} for role '{}'", resume_name, role);

    let spinner = spinner("Loading embedding model...")?;
    let wants_chat = args.chat || !args.questions.is_empty();
    let (embedder, generator) =
        finish_on_error(&spinner, load_models(config, wants_chat, &spinner).await)?;

    let mut app = AssistantApp::new(config, embedder, generator);
    let session = app.new_session();

    spinner.set_message("Analyzing resume...");
    let result = app
        .analyze_path(
            session,
            &args.resume,
            args.resume_type.as_deref(),
            &job_description,
            &role,
        )
        .await
        .map(|_| ());
    spinner.finish_and_clear();
    result?;

    let use_colors = config.output.color_output;
    let reports = ReportGenerator::new(use_colors, args.detailed);
    let interactive_console = args.output == OutputFormat::Console;

    if interactive_console {
        let rendered = render(&app, session, &resume_name, &reports, OutputFormat::Console, &[])?;
        println!("{}", rendered);
    }

    for question in &args.questions {
        let answer = ask_with_spinner(&mut app, session, question)?;
        if interactive_console {
            print_exchange(question, &answer, use_colors);
        }
    }

    if args.chat {
        chat_loop(&mut app, session, use_colors, interactive_console).await?;
    }

    let transcript = app.history(session).to_vec();
    let final_report = render(&app, session, &resume_name, &reports, args.output, &transcript)?;

    if !interactive_console {
        println!("{}", final_report);
    }

    if let Some(path) = &args.save {
        save_report_to_file(&final_report, path)?;
        println!("💾 Report saved to {}", path.display());
    }

    Ok(())
}

fn render(
    app: &AssistantApp,
    session: SessionId,
    resume_file: &str,
    reports: &ReportGenerator,
    format: OutputFormat,
    transcript: &[ChatTurn],
) -> Result<String> {
    let outcome = app
        .analysis(session)
        .ok_or_else(|| AssistantError::NoAnalysis(session.to_string()))?;
    let report = AnalysisReport::new(resume_file, outcome, transcript, app.generator_name());
    reports.generate_report(&report, format)
}

async fn load_models(
    config: &Config,
    wants_chat: bool,
    spinner: &ProgressBar,
) -> Result<(Arc<dyn Embedder>, Arc<dyn Generator>)> {
    let embedder: Arc<dyn Embedder> = Arc::new(CachedEmbedder::new(Model2VecEmbedder::load(
        &config.models.embedding_model,
    )?));

    let model_id = &config.models.generator_model;
    let model_dir = if wants_chat {
        spinner.set_message(format!("Preparing generator model {}...", model_id));
        let mut manager = ModelManager::new(config.models_dir().clone()).await?;
        manager.ensure_model(model_id).await?
    } else {
        config.models_dir().join(model_id)
    };

    let generator: Arc<dyn Generator> = Arc::new(T5Generator::new(model_dir, model_id.clone()));
    Ok((embedder, generator))
}

/// Stop the spinner before an error reaches the logger
fn finish_on_error<T>(spinner: &ProgressBar, result: Result<T>) -> Result<T> {
    if result.is_err() {
        spinner.finish_and_clear();
    }
    result
}

fn ask_with_spinner(app: &mut AssistantApp, session: SessionId, question: &str) -> Result<String> {
    let spinner = spinner("Thinking...")?;
    let answer = app.ask(session, question);
    spinner.finish_and_clear();
    answer
}

fn print_exchange(question: &str, answer: &str, use_colors: bool) {
    let history = [
        ChatTurn {
            speaker: Speaker::You,
            message: question.to_string(),
            at: chrono::Utc::now(),
        },
        ChatTurn {
            speaker: Speaker::Assistant,
            message: answer.to_string(),
            at: chrono::Utc::now(),
        },
    ];
    for turn in &history {
        print!("{}", render_turn(turn, use_colors));
    }
    println!();
}

/// Read questions from stdin until an empty line, `exit`, or EOF
async fn chat_loop(
    app: &mut AssistantApp,
    session: SessionId,
    use_colors: bool,
    echo: bool,
) -> Result<()> {
    println!("💬 Ask about your resume (empty line or 'exit' to finish)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() || question.eq_ignore_ascii_case("exit") {
            break;
        }

        match ask_with_spinner(app, session, question) {
            Ok(answer) => {
                if echo {
                    print_exchange(question, &answer, use_colors);
                }
            }
            Err(e) => error!("Could not answer: {}", e),
        }
    }

    Ok(())
}

async fn run_models(action: ModelAction, config: &Config) -> Result<()> {
    let mut manager = ModelManager::new(config.models_dir().clone()).await?;

    match action {
        ModelAction::List => {
            println!("🤖 Generator Models\n");
            for (id, info) in manager.list_available_models() {
                let status = if manager.is_model_downloaded(id) {
                    "✅ Downloaded"
                } else {
                    "⬇️  Available"
                };
                let marker = if *id == config.models.generator_model {
                    " (default)"
                } else {
                    ""
                };
                println!(
                    "  • {}{} ({}) - {} MB [{}]",
                    id, marker, info.repo_id, info.size_mb, status
                );
                println!("    {}", info.description);
            }
            println!("\n🧠 Embedding model: {}", config.models.embedding_model);
        }

        ModelAction::Download { model, force } => {
            println!("⬇️  Downloading model: {}", model);
            if !force && manager.is_model_downloaded(&model) {
                println!("✅ Model '{}' is already downloaded!", model);
                println!("💡 Use --force to re-download");
                return Ok(());
            }
            let path = manager.download_model(&model, force).await?;
            println!("✅ Model '{}' downloaded successfully!", model);
            println!("📁 Location: {}", path.display());
        }

        ModelAction::Remove { model } => {
            if manager.remove_model(&model).await? {
                println!("✅ Model '{}' removed", model);
            } else {
                println!("⚠️  Model '{}' is not downloaded", model);
            }
        }

        ModelAction::Info { model } => {
            let info = manager
                .get_model_info(&model)
                .ok_or_else(|| AssistantError::ModelNotFound(model.clone()))?;

            println!("📋 Model Information for '{}'\n", model);
            println!("Name: {}", info.name);
            println!("Repository: {}", info.repo_id);
            println!("Size: {} MB", info.size_mb);
            println!("Description: {}", info.description);
            match manager.get_model_path(&model) {
                Some(path) => println!("Status: ✅ Downloaded ({})", path.display()),
                None => {
                    println!("Status: ⬇️  Available for download");
                    println!("\n💡 To download this model, run:");
                    println!("   job-assistant models download {}", model);
                }
            }
            if !info.capabilities.is_empty() {
                println!("\nCapabilities: {}", info.capabilities.join(", "));
            }
        }
    }

    Ok(())
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .map_err(|e| AssistantError::OutputFormatting(format!("Invalid spinner template: {}", e)))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
