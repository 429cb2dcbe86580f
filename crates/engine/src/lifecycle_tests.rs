use super::*;
use crate::test_helpers::harness;
use ciq_adapters::CommitState;
use ciq_core::{BuildConfig, JobResult};

#[tokio::test]
async fn prepare_occupies_slot_and_posts_started_status() {
    let h = harness(1).await;
    let job = h.ref_job("sha1", "refs/heads/main", BuildConfig::default(), false);
    let uid = h.dispatcher.state.lock().enqueue(job);

    h.dispatcher.prepare(&uid).await.unwrap();

    assert!(h.dispatcher.state.lock().is_running(&uid));
    let job = h.dispatcher.get_job(&uid).unwrap();
    assert!(job.start_time_epoch_ms.is_some());
    let statuses = h.hosting.statuses_for("sha1");
    assert!(statuses.iter().any(|s| s.description == "The build has started"));
}

#[tokio::test]
async fn finalize_persists_passed_jobs_and_posts_success() {
    let h = harness(1).await;
    let job = h.ref_job("sha1", "refs/heads/main", BuildConfig::default(), false);
    let uid = h.dispatcher.state.lock().enqueue(job);
    h.dispatcher.prepare(&uid).await.unwrap();
    h.dispatcher.state.lock().get_mut(&uid).unwrap().result = JobResult::Passed;

    h.dispatcher.finalize(&uid).await.unwrap();

    assert!(!h.dispatcher.state.lock().is_running(&uid));
    assert_eq!(h.persistence.jobs().len(), 1);
    let statuses = h.hosting.statuses_for("sha1");
    assert!(statuses.iter().any(|s| s.state == CommitState::Success));
}

#[tokio::test]
async fn finalize_does_not_persist_or_post_for_stopped_jobs() {
    let h = harness(1).await;
    let job = h.ref_job("sha1", "refs/heads/main", BuildConfig::default(), false);
    let uid = h.dispatcher.state.lock().enqueue(job);
    h.dispatcher.prepare(&uid).await.unwrap();
    h.dispatcher.state.lock().get_mut(&uid).unwrap().result = JobResult::Stopped;

    h.dispatcher.finalize(&uid).await.unwrap();

    assert!(h.persistence.jobs().is_empty());
    let statuses = h.hosting.statuses_for("sha1");
    assert!(!statuses.iter().any(|s| s.state == CommitState::Success || s.state == CommitState::Failure));
}

#[tokio::test]
async fn cancel_queued_job_marks_flag_and_posts_canceled() {
    let h = harness(1).await;
    let job = h.ref_job("sha1", "refs/heads/main", BuildConfig::default(), false);
    let uid = h.dispatcher.state.lock().enqueue(job);

    h.dispatcher.cancel_queued_job(&uid).await.unwrap();

    assert!(h.dispatcher.get_job(&uid).unwrap().canceled);
    let statuses = h.hosting.statuses_for("sha1");
    assert!(statuses.iter().any(|s| s.description == "Canceled"));
}

#[tokio::test]
async fn cancel_queued_job_is_noop_for_unknown_job() {
    let h = harness(1).await;
    let uid = ciq_core::JobId::new();
    h.dispatcher.cancel_queued_job(&uid).await.unwrap();
    assert!(h.hosting.calls().is_empty());
}

#[tokio::test]
async fn stop_running_job_cancels_token_and_posts_stopped() {
    let h = harness(1).await;
    let job = h.ref_job("sha1", "refs/heads/main", BuildConfig::default(), false);
    let uid = h.dispatcher.state.lock().enqueue(job);
    h.dispatcher.prepare(&uid).await.unwrap();

    h.dispatcher.stop_running_job(&uid).await.unwrap();

    let statuses = h.hosting.statuses_for("sha1");
    assert!(statuses.iter().any(|s| s.description == "Stopped"));
}
