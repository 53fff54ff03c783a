// tests/backup_run.rs

use std::time::{Duration, Instant};

use snapctl::backup::{
    BackupRun, ClientError, JobState, PollOutcome, SnapshotHandle, SnapshotOutcome,
    SnapshotStatus,
};
use snapctl_test_utils::builders::resources;

fn handle_for(resource_id: &str) -> SnapshotHandle {
    SnapshotHandle {
        snapshot_id: format!("snap-{resource_id}"),
        snapshot_arn: None,
    }
}

/// Initiate everything the run currently allows, all successfully.
fn start_all(run: &mut BackupRun, now: Instant) -> Vec<String> {
    let mut started = Vec::new();
    while let Some((resource, job)) = run.next_to_initiate() {
        run.record_started(job, handle_for(&resource.id), now).unwrap();
        started.push(resource.id);
    }
    started
}

fn throttled() -> ClientError {
    ClientError::Throttled("Rate exceeded".to_string())
}

#[test]
fn initiation_stops_at_parallelism_in_fifo_order() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(5), 2, None);

    let started = start_all(&mut run, now);

    assert_eq!(started, vec!["db-0", "db-1"]);
    assert_eq!(run.in_flight_len(), 2);
    assert_eq!(run.pending_len(), 3);
    assert!(run.next_to_initiate().is_none());
    assert_eq!(run.pending_len(), 3, "a refused initiation must not consume work");
}

#[test]
fn zero_parallelism_is_clamped_to_one() {
    let mut run = BackupRun::new(resources(3), 0, None);

    assert_eq!(run.parallelism(), 1);
    assert_eq!(start_all(&mut run, Instant::now()), vec!["db-0"]);
}

#[test]
fn completion_frees_a_slot_for_the_next_resource() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(3), 2, None);
    start_all(&mut run, now);

    let outcome = run
        .observe("snap-db-0", Ok(SnapshotStatus::Available), now)
        .unwrap();

    assert!(matches!(outcome, PollOutcome::Finished(ref r) if r.resource_id == "db-0"));
    assert_eq!(run.in_flight_len(), 1);
    assert_eq!(start_all(&mut run, now), vec!["db-2"]);
    assert_eq!(
        run.in_flight_snapshot_ids(),
        vec!["snap-db-1".to_string(), "snap-db-2".to_string()]
    );
}

#[test]
fn initiation_failure_does_not_occupy_a_slot() {
    let mut run = BackupRun::new(resources(3), 1, None);

    let (_, job) = run.next_to_initiate().unwrap();
    let result = run
        .record_initiation_failure(job, &ClientError::NotFound("db-0".to_string()))
        .unwrap();

    assert_eq!(result.outcome, SnapshotOutcome::Failed);
    assert!(result.snapshot_id.is_none());
    assert_eq!(run.in_flight_len(), 0);
    assert_eq!(run.results().len(), 1);

    let (next, _) = run.next_to_initiate().unwrap();
    assert_eq!(next.id, "db-1");
}

#[test]
fn non_terminal_status_keeps_job_outstanding() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(1), 1, None);
    start_all(&mut run, now);

    let outcome = run
        .observe("snap-db-0", Ok(SnapshotStatus::parse("creating")), now)
        .unwrap();

    assert_eq!(outcome, PollOutcome::Outstanding);
    assert_eq!(run.in_flight_len(), 1);
    assert!(!run.is_complete());
}

#[test]
fn failed_status_records_failure_with_snapshot_id() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(1), 1, None);
    start_all(&mut run, now);

    let outcome = run
        .observe("snap-db-0", Ok(SnapshotStatus::Failed), now + Duration::from_secs(5))
        .unwrap();

    let PollOutcome::Finished(result) = outcome else {
        panic!("expected a finished job, got {outcome:?}");
    };
    assert_eq!(result.outcome, SnapshotOutcome::Failed);
    assert_eq!(result.snapshot_id.as_deref(), Some("snap-db-0"));
    assert_eq!(result.duration, Some(Duration::from_secs(5)));
    assert!(result.error.unwrap().contains("failed"));
    assert!(run.is_complete());
}

#[test]
fn retryable_errors_are_swallowed_without_a_limit() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(1), 1, None);
    start_all(&mut run, now);

    for expected in 1..=10 {
        let outcome = run.observe("snap-db-0", Err(throttled()), now).unwrap();
        assert_eq!(
            outcome,
            PollOutcome::Retrying {
                error: throttled(),
                consecutive_failures: expected,
            }
        );
    }
    assert_eq!(run.in_flight()[0].state(), JobState::InFlight);
}

#[test]
fn retryable_errors_fail_the_job_at_the_limit() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(1), 1, Some(3));
    start_all(&mut run, now);

    run.observe("snap-db-0", Err(throttled()), now).unwrap();
    run.observe("snap-db-0", Err(throttled()), now).unwrap();
    let outcome = run.observe("snap-db-0", Err(throttled()), now).unwrap();

    let PollOutcome::Finished(result) = outcome else {
        panic!("expected a finished job, got {outcome:?}");
    };
    assert_eq!(result.outcome, SnapshotOutcome::Failed);
    assert!(result.error.unwrap().contains("3 consecutive times"));
    assert!(run.is_complete());
}

#[test]
fn successful_status_check_resets_the_failure_streak() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(1), 1, Some(2));
    start_all(&mut run, now);

    run.observe("snap-db-0", Err(throttled()), now).unwrap();
    run.observe("snap-db-0", Ok(SnapshotStatus::parse("creating")), now)
        .unwrap();
    let outcome = run.observe("snap-db-0", Err(throttled()), now).unwrap();

    assert!(matches!(
        outcome,
        PollOutcome::Retrying {
            consecutive_failures: 1,
            ..
        }
    ));
    assert_eq!(run.in_flight_len(), 1);
}

#[test]
fn non_retryable_error_fails_the_job_immediately() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(2), 2, None);
    start_all(&mut run, now);

    let outcome = run
        .observe(
            "snap-db-1",
            Err(ClientError::NotFound("snap-db-1".to_string())),
            now,
        )
        .unwrap();

    let PollOutcome::Finished(result) = outcome else {
        panic!("expected a finished job, got {outcome:?}");
    };
    assert_eq!(result.resource_id, "db-1");
    assert!(result.error.unwrap().starts_with("status check failed"));
    assert_eq!(run.in_flight_snapshot_ids(), vec!["snap-db-0".to_string()]);
}

#[test]
fn unknown_snapshot_id_is_ignored() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(1), 1, None);
    start_all(&mut run, now);

    let outcome = run
        .observe("snap-elsewhere", Ok(SnapshotStatus::Available), now)
        .unwrap();

    assert_eq!(outcome, PollOutcome::Outstanding);
    assert_eq!(run.in_flight_len(), 1);
    assert!(run.results().is_empty());
}

#[test]
fn results_are_in_completion_order() {
    let now = Instant::now();
    let mut run = BackupRun::new(resources(3), 3, None);
    start_all(&mut run, now);

    run.observe("snap-db-2", Ok(SnapshotStatus::Available), now).unwrap();
    run.observe("snap-db-0", Ok(SnapshotStatus::Failed), now).unwrap();
    run.observe("snap-db-1", Ok(SnapshotStatus::Available), now).unwrap();

    let order: Vec<_> = run
        .into_results()
        .into_iter()
        .map(|r| r.resource_id)
        .collect();
    assert_eq!(order, vec!["db-2", "db-0", "db-1"]);
}

#[test]
fn empty_run_is_complete() {
    let mut run = BackupRun::new(Vec::new(), 3, None);

    assert!(run.is_complete());
    assert!(run.next_to_initiate().is_none());
    assert!(run.into_results().is_empty());
}
