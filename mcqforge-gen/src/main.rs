//! mcqforge - course text to MCQ flashcards
//!
//! Creates one job for the given files, runs it to completion and prints a
//! JSON report of the generated and rejected cards to stdout.

use anyhow::{bail, Context, Result};
use clap::Parser;
use mcqforge_common::config::load_bootstrap_config;
use mcqforge_common::events::{EventBus, McqEvent};
use mcqforge_gen::config::{resolve_chunking_config, resolve_event_capacity};
use mcqforge_gen::db::InMemoryJobStore;
use mcqforge_gen::models::{JobStatus, OutputKind, SourceKind};
use mcqforge_gen::JobService;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for mcqforge
#[derive(Parser, Debug)]
#[command(name = "mcqforge")]
#[command(about = "Generate multiple-choice flashcards from course material")]
#[command(version)]
struct Args {
    /// Course name recorded on the job
    #[arg(short, long)]
    course: String,

    /// TOML config file (defaults to the platform config dir)
    #[arg(long, env = "MCQFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Lower chunk size target in tokens
    #[arg(long)]
    min_tokens: Option<usize>,

    /// Upper chunk size target in tokens
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Source kind applied to every file (text, image, pdf)
    #[arg(short, long, default_value = "text")]
    kind: SourceKind,

    /// Also request an Anki package export
    #[arg(long)]
    apkg: bool,

    /// Course files to ingest, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_bootstrap_config(args.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting mcqforge {}", env!("CARGO_PKG_VERSION"));

    let chunking = resolve_chunking_config(args.min_tokens, args.max_tokens, &toml_config)?;
    let event_bus = EventBus::new(resolve_event_capacity(&toml_config));
    let service = JobService::new(Arc::new(InMemoryJobStore::new()), event_bus, chunking);

    let mut outputs = vec![OutputKind::Csv];
    if args.apkg {
        outputs.push(OutputKind::Apkg);
    }
    let job = service.create_job(&args.course, outputs).await?;

    for path in &args.files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        service
            .attach_source(job.job_id, args.kind, &filename, bytes)
            .await
            .with_context(|| format!("Failed to attach {}", path.display()))?;
    }

    let mut events = service.event_bus().subscribe();
    let logger = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    log_event(&event);
                    if event.is_terminal() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let handle = service.start_job(job.job_id).await?;
    let status = handle.wait().await?;
    // The terminal event is emitted before the task returns
    let _ = logger.await;

    if let JobStatus::Failed(failure) = status {
        bail!("job failed during {}: {}", failure.stage, failure.message);
    }

    let preview = service.preview(job.job_id).await?;
    let report = service.validation_report(job.job_id).await?;

    let failed_cards: Vec<_> = report
        .failed_cards
        .iter()
        .map(|issue| json!({ "reason": issue.reason.message(), "card": issue.card }))
        .collect();

    let output = json!({
        "job_id": job.job_id,
        "course_name": job.course_name,
        "status": JobStatus::Done,
        "summary": preview.validation,
        "cards": preview.cards,
        "failed_cards": failed_cards,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn log_event(event: &McqEvent) {
    match event {
        McqEvent::JobStageChanged {
            job_id,
            new_state,
            progress,
            current_step,
            ..
        } => info!(job_id = %job_id, state = %new_state, progress, step = %current_step, "Stage changed"),
        McqEvent::JobCompleted {
            job_id,
            chunk_count,
            validation,
            duration_ms,
            ..
        } => info!(
            job_id = %job_id,
            chunk_count,
            passed = validation.passed,
            failed = validation.failed,
            duration_ms,
            "Job completed"
        ),
        McqEvent::JobFailed {
            job_id,
            stage,
            error_message,
            ..
        } => warn!(job_id = %job_id, stage = %stage, error = %error_message, "Job failed"),
        other => tracing::debug!(job_id = %other.job_id(), "Event: {:?}", other),
    }
}
