use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use pension_cli::answers_file::AnswersFile;
use pension_cli::config::AppConfig;
use pension_cli::{app, csv_loader, logging, session};
use pension_core::backend::check_health;
use pension_core::{AnswerUpdate, ChatMessage, DEFAULT_PAGE_SIZE, ExportFormat, PensionBackend};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Pension forecast client.
///
/// Walks the forecast wizard from an answers file and submits it to the
/// pension service, or queries the service directly.
#[derive(Debug, Parser)]
#[command(name = "pension", version)]
struct Cli {
    /// Configuration file. Missing file means built-in defaults.
    #[arg(long, global = true, default_value = "pension.toml")]
    config: PathBuf,

    /// Backend kind to use (overrides the config file).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Service base URL (overrides config and PENSION_API_BASE_URL).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log filter, e.g. `debug` or `pension_core=trace,info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Suppress log output on stderr.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the wizard with answers from a TOML file and submit it.
    Simulate {
        /// Answers file.
        answers: PathBuf,

        /// Job history CSV, replacing any jobs in the answers file.
        #[arg(long)]
        jobs: Option<PathBuf>,

        /// Submission timeout in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Ask the service for a written analysis of the scenario in an answers file.
    Analyze {
        answers: PathBuf,

        #[arg(long)]
        jobs: Option<PathBuf>,
    },

    /// Show current macroeconomic parameters.
    Statistics,

    /// List stored calculations, one page at a time.
    Calculations {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
    },

    /// Show a stored calculation, optionally saving its PDF report.
    Calculation {
        id: String,

        /// Save the PDF report. Without a path, `calculation-<id>.pdf` is used.
        #[arg(long, num_args = 0..=1)]
        download: Option<Option<PathBuf>>,
    },

    /// Export all stored calculations as a spreadsheet.
    Export {
        #[arg(long, default_value = "pl-PL")]
        lang: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask the assistant a question.
    Chat {
        #[arg(required_unless_present = "info")]
        message: Option<String>,

        /// Show who the assistant is instead of asking.
        #[arg(long, conflicts_with = "message")]
        info: bool,
    },

    /// Check whether the service is reachable.
    Health,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;
    config.apply_env(|name| std::env::var(name).ok())?;
    if let Some(kind) = cli.backend {
        config.backend.kind = kind;
    }
    if let Some(url) = cli.base_url {
        config.backend.base_url = url;
    }

    logging::init_logging(cli.log_level.as_deref().unwrap_or(&config.logging.level));
    if cli.quiet {
        logging::set_stderr_enabled(false)?;
    }
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }

    let backend_config = config.backend_config();
    debug!(kind = %backend_config.kind, url = %backend_config.base_url, "creating backend");
    let backend = app::build_registry().create(&backend_config).await?;

    match cli.command {
        Command::Simulate {
            answers,
            jobs,
            timeout_ms,
        } => {
            let update = load_answers(&answers, jobs.as_deref())?;
            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(backend_config.timeout);
            let report = session::run_session(update, &*backend, timeout, Utc::now()).await?;
            if report.results.is_demo {
                warn!("service did not answer; results are demo figures");
            }
            println!("{report}");
        }
        Command::Analyze { answers, jobs } => {
            let update = load_answers(&answers, jobs.as_deref())?;
            let request = session::prepare_request(update, Utc::now())?;
            let report = backend.analyze_calculation(&request).await?;
            print!("{}", app::render_analysis(&report));
        }
        Command::Statistics => {
            let stats = backend.get_statistics().await?;
            print!("{}", app::render_statistics(&stats));
        }
        Command::Calculations { page, limit } => {
            let listing = backend.list_calculations(page, limit).await?;
            print!("{}", app::render_calculation_page(&listing));
        }
        Command::Calculation { id, download } => {
            let detail = backend.get_calculation(&id).await?;
            print!("{}", app::render_detail(&detail));
            if let Some(path) = download {
                let path = path.unwrap_or_else(|| {
                    app::default_output_path(&format!("calculation-{id}"), ExportFormat::Pdf)
                });
                let bytes = backend.download_calculation(&id).await?;
                app::write_document(&path, &bytes)?;
            }
        }
        Command::Export { lang, output } => {
            let path =
                output.unwrap_or_else(|| app::default_output_path("calculations", ExportFormat::Xls));
            let bytes = backend.export_calculations(&lang).await?;
            app::write_document(&path, &bytes)?;
        }
        Command::Chat { info: true, .. } => {
            let profile = backend.assistant_profile().await?;
            print!("{}", app::render_profile(&profile));
        }
        Command::Chat { message, .. } => {
            let message = message.unwrap_or_default();
            let reply = backend.chat(&ChatMessage { message }).await?;
            println!("{}", reply.response);
            if let Some(action) = reply.action_executed {
                info!(%action, result = ?reply.action_result, "assistant ran an action");
            }
        }
        Command::Health => {
            if !check_health(&*backend, backend_config.health_timeout).await {
                bail!("service at {} is not healthy", backend_config.base_url);
            }
            println!("healthy");
        }
    }

    Ok(())
}

/// Answers file plus an optional CSV that replaces its job list.
fn load_answers(path: &Path, jobs_csv: Option<&Path>) -> anyhow::Result<AnswerUpdate> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut update = AnswersFile::load(path)?.into_update(base_dir)?;
    if let Some(csv) = jobs_csv {
        let jobs = csv_loader::load_from_file(csv)
            .with_context(|| format!("while importing '{}'", csv.display()))?;
        update.jobs = Some(jobs);
    }
    Ok(update)
}

