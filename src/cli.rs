use crate::{
    batch::{BatchPlan, MAX_BATCH_SIZE},
    config::Config,
    jobs::{self, JobRecord},
    model::GeminiClient,
    report,
    summarize::{RunSummary, Summarizer},
    util::{ensure_dir, now_display, now_rfc3339},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "job-digest")]
#[command(about = "Batched job-posting digest generator (scraped listings -> Gemini -> markdown)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./job-digest.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize scraped jobs into a markdown digest.
    Run {
        /// JSON file with the scraper's job listings.
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Show how the input would be split into batches, without calling the model.
    Plan {
        #[arg(long)]
        input: PathBuf,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;
    let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg).as_deref())?;

    match &args.cmd {
        Command::Run { input, out_dir } => run(&cfg, input, out_dir.as_deref()),
        Command::Plan { input } => plan(input),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("job-digest.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("job-digest.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from(&cfg.output.out_dir).join("job-digest.log"))
}

fn run(cfg: &Config, input: &Path, out_override: Option<&Path>) -> Result<()> {
    let jobs = jobs::load_jobs(input)?;
    if jobs.is_empty() {
        info!("no jobs in {}; nothing to summarize", input.display());
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "status": "empty" }))?
        );
        return Ok(());
    }
    info!("loaded {} job(s) from {}", jobs.len(), input.display());

    let out_root = out_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.output.out_dir));
    ensure_dir(&out_root)?;
    let report_path = out_root.join(&cfg.output.report_filename);

    match generate(cfg, &jobs, &report_path) {
        Ok(summary) => {
            let status = if summary.success() { "ok" } else { "partial" };
            if !summary.success() {
                warn!(
                    "{} of {} batch(es) failed; digest is incomplete",
                    summary.failed_batches(),
                    summary.statuses.len()
                );
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "status": status,
                    "report": report_path,
                    "batches": summary.statuses.len(),
                    "failed_batches": summary.failed_batches(),
                    "finished": now_rfc3339(),
                }))?
            );
        }
        Err(err) => {
            // The run still leaves an artifact: a raw dump of every listing.
            error!("digest generation failed: {err:#}");
            let degraded = report::render_degraded(&now_display(), &jobs, &format!("{err:#}"));
            let error_path = error_report_path(&report_path);
            std::fs::write(&error_path, degraded)
                .with_context(|| format!("writing degraded report: {}", error_path.display()))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "status": "degraded",
                    "report": error_path,
                    "finished": now_rfc3339(),
                }))?
            );
        }
    }

    Ok(())
}

fn generate(cfg: &Config, jobs: &[JobRecord], report_path: &Path) -> Result<RunSummary> {
    let client = GeminiClient::new(&cfg.model)?;
    let summarizer = Summarizer::new(client);
    let summary = summarizer.summarize(jobs);
    let content = report::render(summarizer.model_name(), &now_display(), &summary.body);
    std::fs::write(report_path, content)
        .with_context(|| format!("writing report: {}", report_path.display()))?;
    info!("report written to {}", report_path.display());
    Ok(summary)
}

fn error_report_path(report_path: &Path) -> PathBuf {
    let stem = report_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    let ext = report_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("md");
    report_path.with_file_name(format!("{stem}-error.{ext}"))
}

fn plan(input: &Path) -> Result<()> {
    let jobs = jobs::load_jobs(input)?;
    let plan = BatchPlan::new(&jobs, MAX_BATCH_SIZE);
    println!("{}", serde_json::to_string_pretty(&plan.describe())?);
    Ok(())
}
