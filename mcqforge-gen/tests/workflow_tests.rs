//! Job lifecycle tests
//!
//! Start/restart rules, result gating and caller-facing error codes through
//! the service facade.

use mcqforge_common::events::{EventBus, McqEvent};
use mcqforge_gen::config::ChunkingConfig;
use mcqforge_gen::db::{InMemoryJobStore, JobRepository};
use mcqforge_gen::models::{JobFailure, JobStage, JobStatus, OutputKind, SourceKind};
use mcqforge_gen::{JobError, JobService};
use std::sync::Arc;
use uuid::Uuid;

fn setup() -> (Arc<InMemoryJobStore>, JobService) {
    let store = Arc::new(InMemoryJobStore::new());
    let service = JobService::new(store.clone(), EventBus::new(64), ChunkingConfig::default());
    (store, service)
}

// ============================================================================
// Creation and attachment
// ============================================================================

#[tokio::test]
async fn test_new_job_is_queued() {
    let (_, service) = setup();
    let job = service
        .create_job("  Microbiology ", vec![OutputKind::Csv, OutputKind::Apkg])
        .await
        .unwrap();

    assert_eq!(job.course_name, "Microbiology");
    assert_eq!(job.outputs, vec![OutputKind::Csv, OutputKind::Apkg]);

    let view = service.status(job.job_id).await.unwrap();
    assert_eq!(view.status, JobStatus::Queued);
    assert_eq!(view.progress, 0);
    assert_eq!(view.current_step, "queued");
}

#[tokio::test]
async fn test_unknown_job_is_not_found_everywhere() {
    let (_, service) = setup();
    let id = Uuid::new_v4();

    let errors = vec![
        service.status(id).await.unwrap_err(),
        service.start_job(id).await.unwrap_err(),
        service.chunks(id).await.unwrap_err(),
        service.preview(id).await.unwrap_err(),
        service.validation_report(id).await.unwrap_err(),
        service
            .attach_source(id, SourceKind::Text, "a.txt", b"x".to_vec())
            .await
            .unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.code(), "NOT_FOUND", "unexpected error: {}", err);
    }
}

#[tokio::test]
async fn test_empty_upload_is_bad_request() {
    let (store, service) = setup();
    let job = service.create_job("Microbiology", vec![]).await.unwrap();

    let err = service
        .attach_source(job.job_id, SourceKind::Text, "empty.txt", Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");
    assert!(store.get(job.job_id).await.unwrap().sources.is_empty());
}

#[tokio::test]
async fn test_attachment_records_kind_and_decoding() {
    let (store, service) = setup();
    let job = service.create_job("Microbiology", vec![]).await.unwrap();
    let mut rx = service.event_bus().subscribe();

    service
        .attach_source(job.job_id, SourceKind::Text, "notes.txt", "Gram stain".into())
        .await
        .unwrap();
    service
        .attach_source(job.job_id, SourceKind::Document, "", vec![0x25, 0x50, 0x44, 0x46])
        .await
        .unwrap();

    let sources = store.get(job.job_id).await.unwrap().sources;
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].content.text(), Some("Gram stain"));
    assert!(!sources[1].content.is_decoded());
    assert_eq!(sources[1].filename, "upload");

    match rx.recv().await.unwrap() {
        McqEvent::SourceAttached { kind, decoded, .. } => {
            assert_eq!(kind, "text");
            assert!(decoded);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

// ============================================================================
// Start / restart
// ============================================================================

#[tokio::test]
async fn test_start_requires_source() {
    let (_, service) = setup();
    let job = service.create_job("Microbiology", vec![]).await.unwrap();

    let err = service.start_job(job.job_id).await.unwrap_err();
    assert!(matches!(err, JobError::InvalidState(_)));
    assert_eq!(err.code(), "INVALID_STATE");
    assert_eq!(service.status(job.job_id).await.unwrap().status, JobStatus::Queued);
}

#[tokio::test]
async fn test_start_returns_parsing_immediately() {
    let (_, service) = setup();
    let job = service.create_job("Microbiology", vec![]).await.unwrap();
    service
        .attach_source(job.job_id, SourceKind::Text, "notes.txt", "Gram stain".into())
        .await
        .unwrap();

    let handle = service.start_job(job.job_id).await.unwrap();
    assert_eq!(handle.job_id(), job.job_id);
    assert_eq!(handle.provisional_status(), &JobStatus::Parsing);
    assert_eq!(handle.wait().await.unwrap(), JobStatus::Done);
}

#[tokio::test]
async fn test_done_job_cannot_restart() {
    let (_, service) = setup();
    let job = service.create_job("Microbiology", vec![]).await.unwrap();
    service
        .attach_source(job.job_id, SourceKind::Text, "notes.txt", "Gram stain".into())
        .await
        .unwrap();
    service.start_job(job.job_id).await.unwrap().wait().await.unwrap();

    let err = service.start_job(job.job_id).await.unwrap_err();
    assert!(matches!(err, JobError::InvalidState(_)));
    assert_eq!(service.status(job.job_id).await.unwrap().status, JobStatus::Done);
}

#[tokio::test]
async fn test_running_job_cannot_restart() {
    let (store, service) = setup();
    let job = service.create_job("Microbiology", vec![]).await.unwrap();
    service
        .attach_source(job.job_id, SourceKind::Text, "notes.txt", "Gram stain".into())
        .await
        .unwrap();

    // Claim directly so no background task advances the job
    store.claim_for_start(job.job_id).await.unwrap();
    store.transition(job.job_id, JobStatus::Chunking).await.unwrap();

    assert!(matches!(
        service.start_job(job.job_id).await,
        Err(JobError::InvalidState(_))
    ));
    assert_eq!(service.status(job.job_id).await.unwrap().status, JobStatus::Chunking);

    // Chunks are queryable from CHUNKING onward
    assert!(service.chunks(job.job_id).await.unwrap().is_empty());
    assert!(service.preview(job.job_id).await.is_err());
}

#[tokio::test]
async fn test_failed_job_restarts_from_parsing() {
    let (store, service) = setup();
    let job = service.create_job("Microbiology", vec![]).await.unwrap();
    service
        .attach_source(job.job_id, SourceKind::Text, "notes.txt", "Gram stain".into())
        .await
        .unwrap();

    store.claim_for_start(job.job_id).await.unwrap();
    store
        .transition(
            job.job_id,
            JobStatus::Failed(JobFailure {
                stage: JobStage::Parsing,
                message: "decoder crashed".to_string(),
            }),
        )
        .await
        .unwrap();

    let view = service.status(job.job_id).await.unwrap();
    assert_eq!(view.current_step, "failed: decoder crashed");
    assert_eq!(view.progress, 20);

    let handle = service.start_job(job.job_id).await.unwrap();
    assert_eq!(handle.wait().await.unwrap(), JobStatus::Done);

    let record = store.get(job.job_id).await.unwrap();
    let labels: Vec<&str> = record.transitions.iter().map(|t| t.new_state.label()).collect();
    assert_eq!(
        labels,
        vec!["PARSING", "FAILED", "PARSING", "CHUNKING", "GENERATING", "DONE"]
    );
}
