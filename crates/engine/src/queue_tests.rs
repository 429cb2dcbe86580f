use super::*;
use ciq_core::{BuildConfig, Commit, Job, Trigger};

fn job(fasttracked: bool) -> Job {
    Job::new(
        Commit { sha: "abc".into(), message: "msg".into(), author: "a".into() },
        Trigger::Ref("refs/heads/main".into()),
        BuildConfig::default(),
        fasttracked,
    )
}

#[test]
fn enqueue_goes_to_normal_when_a_slot_is_free() {
    let mut state = DispatchState::new(1);
    let uid = state.enqueue(job(true));
    assert!(!state.is_running(&uid));
    assert_eq!(state.search_by_ref("refs/heads/main"), vec![uid]);
}

#[test]
fn enqueue_fasttracks_only_when_all_workers_busy() {
    let mut state = DispatchState::new(1);
    state.running_slots_mut()[0] = Some(JobId::new());
    let uid = state.enqueue(job(true));
    assert!(state.waiting_fasttrack_mut().contains(&uid));

    let uid2 = state.enqueue(job(false));
    assert!(state.waiting_normal_mut().contains(&uid2));
}

#[test]
fn cancel_queued_marks_flag_and_removes_from_waiting() {
    let mut state = DispatchState::new(1);
    let uid = state.enqueue(job(false));
    assert!(state.cancel_queued(&uid));
    assert!(!state.is_waiting(&uid));
    assert!(state.get(&uid).unwrap().canceled);
    assert!(!state.cancel_queued(&uid));
}

#[test]
fn dequeue_prefers_fasttrack() {
    let mut state = DispatchState::new(1);
    state.running_slots_mut()[0] = Some(JobId::new());
    let normal = state.enqueue(job(false));
    let fast = state.enqueue(job(true));
    state.running_slots_mut()[0] = None;
    assert_eq!(state.dequeue_next(), Some(fast));
    assert_eq!(state.dequeue_next(), Some(normal));
}
