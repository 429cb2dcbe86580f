use super::*;
use crate::test_helpers::harness;
use ciq_core::{BuildConfig, CommitPolicy, PrPolicy, PushPolicy};
use ciq_wire::{
    PullRequestBase, PullRequestBaseRepo, PullRequestEvent, PullRequestHead, PullRequestHeadUser,
    PullRequestLabel, PullRequestLinks, PullRequestLink, PullRequestPayload, PushEvent, ZERO_SHA,
};

fn pr_event(action: &str, sha: &str, number: u64, labels: Vec<&str>, label: Option<&str>) -> PullRequestEvent {
    PullRequestEvent {
        action: action.to_string(),
        pull_request: PullRequestPayload {
            title: "a change".to_string(),
            number,
            merge_commit_sha: None,
            head: PullRequestHead {
                sha: sha.to_string(),
                user: PullRequestHeadUser { login: "dev".to_string() },
            },
            base: PullRequestBase {
                ref_name: "main".to_string(),
                sha: "base-sha".to_string(),
                repo: PullRequestBaseRepo {
                    clone_url: "https://example.test/r.git".to_string(),
                    full_name: "org/r".to_string(),
                },
            },
            links: PullRequestLinks { html: PullRequestLink { href: "https://example.test/pr/1".to_string() } },
            mergeable: Some(true),
            labels: labels.into_iter().map(|l| PullRequestLabel { name: l.to_string() }).collect(),
        },
        label: label.map(|l| PullRequestLabel { name: l.to_string() }),
    }
}

#[tokio::test]
async fn pr_event_with_other_action_is_ignored() {
    let h = harness(1).await;
    h.seeded_commit("sha1");
    let event = pr_event("review_requested", "sha1", 1, vec![], None);
    h.dispatcher.handle_pull_request_event(event).await.unwrap();
    assert!(h.dispatcher.all_jobs(&Default::default()).is_empty());
}

#[tokio::test]
async fn pr_event_aborts_silently_when_commit_missing() {
    let h = harness(1).await;
    let event = pr_event("opened", "missing-sha", 1, vec![], None);
    h.dispatcher.handle_pull_request_event(event).await.unwrap();
    assert!(h.dispatcher.all_jobs(&Default::default()).is_empty());
}

#[tokio::test]
async fn s6_skip_keyword_blocks_scheduling() {
    let h = harness(1).await;
    h.hosting.seed_commit(
        "sha1",
        ciq_core::Commit { sha: "sha1".into(), message: "ci: skip\nmore text".into(), author: "dev".into() },
    );
    h.hosting.seed_config(
        "sha1",
        BuildConfig { commit: CommitPolicy { skip_keywords: vec!["ci: skip".to_string()] }, ..Default::default() },
    );

    let event = pr_event("opened", "sha1", 1, vec![], None);
    h.dispatcher.handle_pull_request_event(event).await.unwrap();

    assert!(h.dispatcher.all_jobs(&Default::default()).is_empty());
    let statuses = h.hosting.statuses_for("sha1");
    assert!(statuses
        .iter()
        .any(|s| s.description == "The build was skipped." && s.state == ciq_adapters::CommitState::Pending));
}

#[tokio::test]
async fn s4_labeled_without_ready_label_posts_pending_and_cancels_queued() {
    let config = ciq_core::DispatcherConfig { ready_label: Some("CI:ready".to_string()), ..Default::default() };
    let h = crate::test_helpers::harness_with(config).await;
    h.seeded_commit("sha1");

    let opened = pr_event("opened", "sha1", 42, vec!["CI:ready"], None);
    h.dispatcher.handle_pull_request_event(opened).await.unwrap();
    let uid = h.dispatcher.all_jobs(&Default::default())[0].uid;

    // The label named in this event is the ready label itself, so
    // the "append a non-ready label" branch (step 7's first bullet)
    // does not apply and the "label not set" branch does.
    let labeled = pr_event("labeled", "sha1", 42, vec![], Some("CI:ready"));
    h.dispatcher.handle_pull_request_event(labeled).await.unwrap();

    let job = h.dispatcher.get_job(&uid).unwrap();
    assert!(job.canceled);
    let statuses = h.hosting.statuses_for("sha1");
    assert!(statuses.iter().any(|s| s.description == "\"CI:ready\" label not set"));
}

#[tokio::test]
async fn pr_event_closed_disables_matching_jobs() {
    let h = harness(1).await;
    h.seeded_commit("sha1");
    let opened = pr_event("opened", "sha1", 7, vec![], None);
    h.dispatcher.handle_pull_request_event(opened).await.unwrap();
    let uid = h.dispatcher.all_jobs(&Default::default())[0].uid;

    let closed = pr_event("closed", "sha1", 7, vec![], None);
    h.dispatcher.handle_pull_request_event(closed).await.unwrap();

    assert!(h.dispatcher.get_job(&uid).unwrap().canceled);
}

#[tokio::test]
async fn s5_push_deletion_cancels_queued_and_stops_running() {
    let h = harness(1).await;
    let queued = h.ref_job("sha-queued", "refs/heads/topic", BuildConfig::default(), false);
    let queued_uid = queued.uid;
    h.dispatcher.state.lock().enqueue(queued);

    let running = h.ref_job("sha-running", "refs/heads/topic", BuildConfig::default(), false);
    let running_uid = running.uid;
    h.dispatcher.state.lock().enqueue(running);
    h.dispatcher.prepare(&running_uid).await.unwrap();

    let push = PushEvent { ref_name: "refs/heads/topic".to_string(), after: ZERO_SHA.to_string() };
    h.dispatcher.handle_push_event(push).await.unwrap();

    assert!(h.dispatcher.get_job(&queued_uid).unwrap().canceled);
    let statuses = h.hosting.statuses_for("sha-running");
    assert!(statuses.iter().any(|s| s.description == "Stopped"));
}

#[tokio::test]
async fn push_event_accepts_matching_branch_and_schedules() {
    let h = harness(1).await;
    h.hosting.seed_commit(
        "sha1",
        ciq_core::Commit { sha: "sha1".into(), message: "normal change".into(), author: "dev".into() },
    );
    h.hosting.seed_config(
        "sha1",
        BuildConfig { push: PushPolicy { branches: vec!["main".to_string()], tags: vec![] }, ..Default::default() },
    );

    let push = PushEvent { ref_name: "refs/heads/main".to_string(), after: "sha1".to_string() };
    h.dispatcher.handle_push_event(push).await.unwrap();

    assert_eq!(h.dispatcher.all_jobs(&Default::default()).len(), 1);
}

#[tokio::test]
async fn push_event_rejects_unmatched_branch() {
    let h = harness(1).await;
    h.hosting.seed_commit(
        "sha1",
        ciq_core::Commit { sha: "sha1".into(), message: "normal change".into(), author: "dev".into() },
    );
    h.hosting.seed_config(
        "sha1",
        BuildConfig { push: PushPolicy { branches: vec!["release/*".to_string()], tags: vec![] }, ..Default::default() },
    );

    let push = PushEvent { ref_name: "refs/heads/main".to_string(), after: "sha1".to_string() };
    h.dispatcher.handle_push_event(push).await.unwrap();

    assert!(h.dispatcher.all_jobs(&Default::default()).is_empty());
}

#[tokio::test]
async fn pr_comments_posted_when_enabled_on_finish() {
    let h = harness(1).await;
    h.hosting.seed_commit(
        "sha1",
        ciq_core::Commit { sha: "sha1".into(), message: "normal change".into(), author: "dev".into() },
    );
    h.hosting.seed_config(
        "sha1",
        BuildConfig { pr: PrPolicy { enable_comments: true }, ..Default::default() },
    );
    let opened = pr_event("opened", "sha1", 1, vec![], None);
    h.dispatcher.handle_pull_request_event(opened).await.unwrap();
    let uid = h.dispatcher.all_jobs(&Default::default())[0].uid;

    h.dispatcher.prepare(&uid).await.unwrap();
    h.dispatcher.state.lock().get_mut(&uid).unwrap().result = ciq_core::JobResult::Passed;
    h.dispatcher.finalize(&uid).await.unwrap();

    assert!(h.hosting.calls().iter().any(|c| matches!(c, ciq_adapters::hosting::HostingCall::CommentOnPr(_))));
}
