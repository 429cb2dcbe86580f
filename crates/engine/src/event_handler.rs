// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event Handler: validates incoming PR/push events, applies
//! skip/label/ref policy, builds Job descriptors, and hands them to
//! the Scheduler (spec §4.1).

use regex::Regex;

use ciq_adapters::{CommitStatusUpdate, ExecutionAdapter, HostingAdapter};
use ciq_core::{Clock, Job, PullRequestInfo, Trigger};
use ciq_storage::PersistenceAdapter;
use ciq_wire::{PullRequestAction, PullRequestEvent, PushEvent, RefKind};

use crate::dispatcher::Dispatcher;
use crate::error::EngineError;

impl<H, E, P, C> Dispatcher<H, E, P, C>
where
    H: HostingAdapter,
    E: ExecutionAdapter,
    P: PersistenceAdapter,
    C: Clock + 'static,
{
    /// Handle a pull-request webhook event (spec §4.1, "PR event
    /// policy").
    pub async fn handle_pull_request_event(&self, event: PullRequestEvent) -> Result<(), EngineError> {
        let action = PullRequestAction::parse(&event.action);
        if action == PullRequestAction::Other {
            return Ok(());
        }

        let sha = event.pull_request.head.sha.clone();
        let Some(commit) = self.hosting.fetch_commit_info(&sha).await? else {
            tracing::warn!(%sha, "commit metadata unavailable, aborting event handling");
            return Ok(());
        };
        let config = self.hosting.fetch_build_config(&sha).await?;

        let mut pr_info = pull_request_info_from_payload(&event);
        pr_info.sort_labels();
        let number = pr_info.number;
        let labels = pr_info.labels.clone();
        let fasttracked = self
            .config
            .fasttrack_label
            .as_deref()
            .map(|label| labels.iter().any(|l| l == label))
            .unwrap_or(false);
        let job = Job::new(commit, Trigger::PullRequest(pr_info), config.clone(), fasttracked);

        if action == PullRequestAction::Closed {
            self.disable_jobs_matching(&job).await?;
            return Ok(());
        }

        if contains_skip_keyword(&job.commit.message, &config.commit.skip_keywords) {
            self.hosting
                .set_commit_status(&sha, CommitStatusUpdate::pending("The build was skipped."))
                .await?;
            return Ok(());
        }

        if let Some(ready_label) = &self.config.ready_label {
            if !labels.iter().any(|l| l == ready_label) {
                if action == PullRequestAction::Labeled {
                    if let Some(label) = &event.label {
                        if &label.name != ready_label {
                            self.append_label_to_queued_pr(number, label.name.clone());
                            return Ok(());
                        }
                    }
                }
                self.disable_jobs_matching(&job).await?;
                self.hosting
                    .set_commit_status(
                        &sha,
                        CommitStatusUpdate::pending(format!("\"{}\" label not set", ready_label)),
                    )
                    .await?;
                return Ok(());
            }
        }

        if action == PullRequestAction::Unlabeled {
            if let Some(label) = &event.label {
                self.remove_label_from_queued_pr(number, &label.name);
            }
        }

        self.schedule(job).await?;
        Ok(())
    }

    /// Handle a branch/tag push webhook event (spec §4.1, "Push
    /// event policy"). Ref deletions cancel queued jobs and stop
    /// running jobs for that ref — not the reverse (spec §9).
    pub async fn handle_push_event(&self, event: PushEvent) -> Result<(), EngineError> {
        let Ok((kind, ref_short)) = event.parse_ref() else {
            tracing::warn!(ref_name = %event.ref_name, "unrecognized ref shape, ignoring push event");
            return Ok(());
        };

        if event.is_deletion() {
            let (waiting, running) = {
                let state = self.state.lock();
                (state.search_by_ref(&event.ref_name), state.running_by_ref(&event.ref_name))
            };
            for uid in waiting {
                self.cancel_queued_job(&uid).await?;
            }
            for uid in running {
                self.stop_running_job(&uid).await?;
            }
            return Ok(());
        }

        let Some(commit) = self.hosting.fetch_commit_info(&event.after).await? else {
            tracing::warn!(sha = %event.after, "commit metadata unavailable, aborting event handling");
            return Ok(());
        };
        let config = self.hosting.fetch_build_config(&event.after).await?;

        let rules = match kind {
            RefKind::Heads => &config.push.branches,
            RefKind::Tags => &config.push.tags,
        };
        if !ref_accepted(ref_short, rules) {
            return Ok(());
        }

        if contains_skip_keyword(&commit.message, &config.commit.skip_keywords) {
            self.hosting
                .set_commit_status(&event.after, CommitStatusUpdate::pending("The build was skipped."))
                .await?;
            return Ok(());
        }

        let job = Job::new(commit, Trigger::Ref(event.ref_name.clone()), config, false);
        self.schedule(job).await?;
        Ok(())
    }

    fn append_label_to_queued_pr(&self, pr_number: u64, label: String) {
        let mut state = self.state.lock();
        let uid = state.search_by_pr(pr_number).into_iter().next();
        if let Some(uid) = uid {
            if let Some(job) = state.get_mut(&uid) {
                if let Some(pr) = job.pull_request() {
                    let mut labels = pr.labels.clone();
                    if !labels.iter().any(|l| l == &label) {
                        labels.push(label);
                        labels.sort();
                    }
                    if let Trigger::PullRequest(pr) = &mut job.trigger {
                        pr.labels = labels;
                    }
                }
            }
        }
    }

    fn remove_label_from_queued_pr(&self, pr_number: u64, label: &str) {
        let mut state = self.state.lock();
        let uid = state.search_by_pr(pr_number).into_iter().next();
        if let Some(uid) = uid {
            if let Some(job) = state.get_mut(&uid) {
                if let Trigger::PullRequest(pr) = &mut job.trigger {
                    pr.labels.retain(|l| l != label);
                }
            }
        }
    }
}

fn pull_request_info_from_payload(event: &PullRequestEvent) -> PullRequestInfo {
    let pr = &event.pull_request;
    PullRequestInfo {
        number: pr.number,
        title: pr.title.clone(),
        user: pr.head.user.login.clone(),
        url: pr.links.html.href.clone(),
        merge_commit: pr.merge_commit_sha.clone(),
        base_repo: pr.base.repo.clone_url.clone(),
        base_branch: pr.base.ref_name.clone(),
        base_commit: pr.base.sha.clone(),
        base_full_name: pr.base.repo.full_name.clone(),
        mergeable: pr.mergeable.unwrap_or(false),
        labels: pr.labels.iter().map(|l| l.name.clone()).collect(),
    }
}

/// True if `message` contains a line exactly matching one of
/// `keywords`, each anchored to the whole line (spec §4.1 step 6).
fn contains_skip_keyword(message: &str, keywords: &[String]) -> bool {
    message.lines().any(|line| {
        keywords.iter().any(|keyword| match Regex::new(&format!("^{}$", keyword)) {
            Ok(re) => re.is_match(line),
            Err(_) => line == keyword,
        })
    })
}

/// Ref-name acceptance: literal `"*"`, exact match, or regex match
/// against any rule (spec §4.1 step 4).
fn ref_accepted(name: &str, rules: &[String]) -> bool {
    rules.iter().any(|rule| {
        rule == "*" || rule == name || Regex::new(rule).map(|re| re.is_match(name)).unwrap_or(false)
    })
}

#[cfg(test)]
#[path = "event_handler_tests.rs"]
mod tests;
