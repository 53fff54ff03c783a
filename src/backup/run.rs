// src/backup/run.rs

//! Working set of a single backup run.
//!
//! `BackupRun` is synchronous and deterministic: it owns the pending queue,
//! the in-flight jobs and the results, and decides what may happen next. The
//! async [`crate::backup::BackupScheduler`] performs the service calls and
//! feeds their outcomes back in.

use std::collections::VecDeque;
use std::time::Instant;

use tracing::debug;

use crate::backup::client::ClientError;
use crate::backup::job::SnapshotJob;
use crate::backup::{Resource, SnapshotHandle, SnapshotResult, SnapshotStatus};
use crate::errors::Result;

/// What a single status check did to an in-flight job.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The job is still outstanding.
    Outstanding,
    /// A transient error was swallowed; the job stays outstanding.
    Retrying { error: ClientError, consecutive_failures: u32 },
    /// The job reached a terminal state and left the in-flight set.
    Finished(SnapshotResult),
}

#[derive(Debug)]
pub struct BackupRun {
    parallelism: usize,
    max_poll_failures: Option<u32>,
    pending: VecDeque<Resource>,
    /// In-flight jobs in initiation order.
    in_flight: Vec<SnapshotJob>,
    results: Vec<SnapshotResult>,
}

impl BackupRun {
    /// `parallelism` is clamped to at least 1.
    pub fn new(resources: Vec<Resource>, parallelism: usize, max_poll_failures: Option<u32>) -> Self {
        Self {
            parallelism: parallelism.max(1),
            max_poll_failures,
            pending: resources.into(),
            in_flight: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn in_flight(&self) -> &[SnapshotJob] {
        &self.in_flight
    }

    pub fn results(&self) -> &[SnapshotResult] {
        &self.results
    }

    /// The run is done once nothing is pending or outstanding.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }

    /// Pop the next resource to initiate, if there is both pending work and a
    /// free in-flight slot. Strict FIFO.
    pub fn next_to_initiate(&mut self) -> Option<(Resource, SnapshotJob)> {
        if self.in_flight.len() >= self.parallelism {
            return None;
        }
        let resource = self.pending.pop_front()?;
        let job = SnapshotJob::new(resource.id.clone());
        Some((resource, job))
    }

    /// Record a successful initiation: the job becomes in-flight.
    pub fn record_started(
        &mut self,
        mut job: SnapshotJob,
        handle: SnapshotHandle,
        now: Instant,
    ) -> Result<&SnapshotJob> {
        job.begin(handle, now)?;
        self.in_flight.push(job);
        debug!(
            in_flight = self.in_flight.len(),
            parallelism = self.parallelism,
            "job moved to in-flight"
        );
        let idx = self.in_flight.len() - 1;
        Ok(&self.in_flight[idx])
    }

    /// Record a failed initiation: a terminal result, no in-flight slot used.
    pub fn record_initiation_failure(
        &mut self,
        mut job: SnapshotJob,
        error: &ClientError,
    ) -> Result<SnapshotResult> {
        let result = job.fail_initiation(error.to_string())?;
        self.results.push(result.clone());
        Ok(result)
    }

    /// Snapshot ids of every in-flight job, in initiation order.
    pub fn in_flight_snapshot_ids(&self) -> Vec<String> {
        self.in_flight
            .iter()
            .filter_map(|job| job.snapshot_id().map(str::to_string))
            .collect()
    }

    /// Apply one status check result to the job owning `snapshot_id`.
    ///
    /// - terminal status: the job finishes and leaves the in-flight set;
    /// - non-terminal status: stays in flight, failure streak resets;
    /// - retryable error: stays in flight unless the streak reaches
    ///   `max_poll_failures`;
    /// - non-retryable error: the job fails.
    pub fn observe(
        &mut self,
        snapshot_id: &str,
        status: std::result::Result<SnapshotStatus, ClientError>,
        now: Instant,
    ) -> Result<PollOutcome> {
        let Some(idx) = self
            .in_flight
            .iter()
            .position(|job| job.snapshot_id() == Some(snapshot_id))
        else {
            debug!(snapshot = %snapshot_id, "status for unknown snapshot; ignoring");
            return Ok(PollOutcome::Outstanding);
        };

        let job = &mut self.in_flight[idx];
        let result = match status {
            Ok(SnapshotStatus::Available) => job.succeed(now)?,
            Ok(SnapshotStatus::Failed) => job.fail("snapshot reported status 'failed'", now)?,
            Ok(SnapshotStatus::Other(_)) => {
                job.reset_poll_failures();
                return Ok(PollOutcome::Outstanding);
            }
            Err(error) if error.is_retryable() => {
                let consecutive_failures = job.record_poll_failure();
                match self.max_poll_failures {
                    Some(limit) if consecutive_failures >= limit => job.fail(
                        format!(
                            "status check failed {consecutive_failures} consecutive times: {error}"
                        ),
                        now,
                    )?,
                    _ => {
                        return Ok(PollOutcome::Retrying {
                            error,
                            consecutive_failures,
                        });
                    }
                }
            }
            Err(error) => job.fail(format!("status check failed: {error}"), now)?,
        };

        self.in_flight.remove(idx);
        self.results.push(result.clone());
        Ok(PollOutcome::Finished(result))
    }

    /// Consume the run and return its results in completion order.
    pub fn into_results(self) -> Vec<SnapshotResult> {
        self.results
    }
}
