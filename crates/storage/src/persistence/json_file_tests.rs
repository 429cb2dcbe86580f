use super::*;
use ciq_core::{BuildConfig, Commit, JobResult, Trigger};

fn job() -> Job {
    let mut j = Job::new(
        Commit { sha: "abc".into(), message: "m".into(), author: "a".into() },
        Trigger::Ref("refs/heads/main".into()),
        BuildConfig::default(),
        false,
    );
    j.result = JobResult::Passed;
    j
}

#[tokio::test]
async fn insert_then_find_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFilePersistence::new(dir.path());
    store.init().await.unwrap();

    let j = job();
    store.insert_job(&j).await.unwrap();

    let found = store.find_job(&j.uid).await.unwrap().unwrap();
    assert_eq!(found.uid, j.uid);
    assert_eq!(found.commit.sha, "abc");
}

#[tokio::test]
async fn find_job_returns_none_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFilePersistence::new(dir.path());
    store.init().await.unwrap();

    assert!(store.find_job(&JobId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_jobs_removes_matched_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFilePersistence::new(dir.path());
    store.init().await.unwrap();

    let j = job();
    store.insert_job(&j).await.unwrap();
    assert_eq!(store.count_jobs(&JobQuery::default()).await.unwrap(), 1);

    let deleted = store.delete_jobs(&JobQuery::default()).await.unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(store.count_jobs(&JobQuery::default()).await.unwrap(), 0);
}
