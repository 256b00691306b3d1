//! CLI binary for resume-audit.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalyzerConfig` and `JobDetails`, runs one analysis, and prints the
//! report.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resume_audit::{
    analyze_file, render_markdown, render_text, write_report, AnalysisProgressCallback,
    AnalyzerConfig, AuditError, JobDetails, ProgressCallback, TextStyle,
};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while the single request is outstanding.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading resume…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl AnalysisProgressCallback for CliProgressCallback {
    fn on_document_ready(&self, file_name: &str, size_bytes: u64) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            file_name,
            dim(&format!("{:.2} MB", size_bytes as f64 / (1024.0 * 1024.0)))
        ));
    }

    fn on_request_start(&self, backend: &str, model: Option<&str>) {
        self.bar.set_prefix("AI Processing");
        self.bar.set_message(match model {
            Some(m) => format!("{backend} / {m}"),
            None => backend.to_string(),
        });
    }

    fn on_request_complete(&self, duration_ms: u64, overall_score: u8) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} Analysis complete: {}  {}",
            green("✔"),
            bold(&format!("{overall_score}%")),
            dim(&format!("{:.1}s", duration_ms as f64 / 1000.0)),
        );
    }

    fn on_request_error(&self, _message: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Audit a PDF resume for a role
  resume-audit resume.pdf --title "Backend Engineer" \
      --description "Go and distributed systems experience required"

  # Job description from a file, Markdown report to disk
  resume-audit cv.png --title "Data Analyst" --company Acme \
      --description-file job.txt --format markdown -o report.md

  # Raw JSON for scripting
  resume-audit resume.pdf --title SRE --description-file job.txt --format json

  # Any edgequake-llm provider instead of native Gemini
  resume-audit resume.pdf --provider anthropic --model claude-sonnet-4-20250514 ...

LIMITS:
  Accepted files: PDF, PNG, JPEG, WebP up to 100 MB.
  The remote service may reject documents above ~10 MB.

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (API_KEY is also read)
  RESUME_AUDIT_MODEL      Override model ID
  RESUME_AUDIT_PROVIDER   Use an edgequake-llm provider (openai, anthropic, ...)
  RUST_LOG                Log filter, e.g. resume_audit=debug
"#;

/// Audit a resume against a target job using a multimodal LLM.
#[derive(Parser, Debug)]
#[command(
    name = "resume-audit",
    version,
    about = "Audit a resume against a target job using a multimodal LLM",
    long_about = "Upload a PDF or image resume together with the target job title and \
description; get back an ATS-style score, strengths and weaknesses, missing keywords, \
spelling corrections and an improvement plan ranked by impact.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Resume file (PDF, PNG, JPEG or WebP).
    input: PathBuf,

    /// Target job title.
    #[arg(short, long, env = "RESUME_AUDIT_TITLE", default_value = "")]
    title: String,

    /// Target company (optional).
    #[arg(short, long, env = "RESUME_AUDIT_COMPANY", default_value = "")]
    company: String,

    /// Job description text.
    #[arg(short, long, conflicts_with = "description_file")]
    description: Option<String>,

    /// Read the job description from this file.
    #[arg(long)]
    description_file: Option<PathBuf>,

    /// Model ID (default: gemini-3-flash-preview).
    #[arg(long, env = "RESUME_AUDIT_MODEL")]
    model: Option<String>,

    /// Use an edgequake-llm provider instead of native Gemini (needs --model).
    #[arg(long, env = "RESUME_AUDIT_PROVIDER", requires = "model")]
    provider: Option<String>,

    /// Gemini API key (prefer the GEMINI_API_KEY variable).
    #[arg(long)]
    api_key: Option<String>,

    /// Report format.
    #[arg(long, short = 'f', env = "RESUME_AUDIT_FORMAT", value_enum, default_value = "text")]
    format: FormatArg,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, env = "RESUME_AUDIT_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "RESUME_AUDIT_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Request timeout in seconds.
    #[arg(long, env = "RESUME_AUDIT_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Disable the spinner.
    #[arg(long, env = "RESUME_AUDIT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RESUME_AUDIT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the report and errors.
    #[arg(short, long, env = "RESUME_AUDIT_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Text,
    Markdown,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers the happy path; library INFO logs would only
    // interleave with it.
    let show_progress = !cli.quiet && !cli.no_progress && io::stderr().is_terminal();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli, show_progress).await {
        let message = match e.downcast_ref::<AuditError>() {
            Some(audit) => audit.user_message(),
            None => format!("{e:#}"),
        };
        eprintln!("{} {}", red("✘"), message);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, show_progress: bool) -> Result<()> {
    let job = build_job(&cli).await?;

    let progress = show_progress.then(|| CliProgressCallback::new() as ProgressCallback);
    let config = build_config(&cli, progress)?;

    let result = analyze_file(&cli.input, &job, &config)
        .await
        .context("Analysis failed")?;

    let rendered = match cli.format {
        FormatArg::Json => {
            serde_json::to_string_pretty(&result).context("Failed to serialise result")? + "\n"
        }
        FormatArg::Markdown => render_markdown(&result),
        FormatArg::Text => {
            let color = cli.output.is_none() && io::stdout().is_terminal();
            render_text(&result, TextStyle { color })
        }
    };

    match cli.output {
        Some(ref path) => {
            write_report(path, &rendered).context("Failed to write report")?;
            if !cli.quiet {
                eprintln!("{}  report  →  {}", green("✔"), bold(&path.display().to_string()));
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Collect job details from flags.
async fn build_job(cli: &Cli) -> Result<JobDetails> {
    let description = match (&cli.description, &cli.description_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description from {:?}", path))?,
        (None, None) => String::new(),
    };
    Ok(JobDetails::new(
        cli.title.clone(),
        cli.company.clone(),
        description,
    ))
}

/// Map CLI args to `AnalyzerConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<AnalyzerConfig> {
    let mut builder = AnalyzerConfig::builder()
        .temperature(cli.temperature)
        .request_timeout_secs(cli.timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
