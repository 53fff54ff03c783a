// src/backup/job.rs

//! Per-resource snapshot state machine.

use std::time::{Duration, Instant};

use crate::backup::{SnapshotHandle, SnapshotOutcome, SnapshotResult};
use crate::errors::{Result, SnapctlError};

/// Lifecycle of one snapshot attempt.
///
/// ```text
/// Pending --initiate ok--> InFlight --available--> Succeeded
///    |                        |
///    +--initiate err--+       +--failed / fatal poll error--> Failed
///                     +----------------------------------->
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// One resource's backup attempt within a run.
#[derive(Debug, Clone)]
pub struct SnapshotJob {
    resource_id: String,
    handle: Option<SnapshotHandle>,
    started_at: Option<Instant>,
    state: JobState,
    consecutive_poll_failures: u32,
}

impl SnapshotJob {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            handle: None,
            started_at: None,
            state: JobState::Pending,
            consecutive_poll_failures: 0,
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn handle(&self) -> Option<&SnapshotHandle> {
        self.handle.as_ref()
    }

    pub fn snapshot_id(&self) -> Option<&str> {
        self.handle.as_ref().map(|h| h.snapshot_id.as_str())
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn consecutive_poll_failures(&self) -> u32 {
        self.consecutive_poll_failures
    }

    /// Pending -> InFlight after a successful initiate call.
    pub fn begin(&mut self, handle: SnapshotHandle, now: Instant) -> Result<()> {
        self.transition(JobState::InFlight)?;
        self.handle = Some(handle);
        self.started_at = Some(now);
        Ok(())
    }

    /// Pending -> Failed after the initiate call errored.
    pub fn fail_initiation(&mut self, error: impl Into<String>) -> Result<SnapshotResult> {
        self.transition(JobState::Failed)?;
        Ok(SnapshotResult {
            resource_id: self.resource_id.clone(),
            snapshot_id: None,
            outcome: SnapshotOutcome::Failed,
            duration: None,
            error: Some(error.into()),
        })
    }

    /// InFlight -> Succeeded.
    pub fn succeed(&mut self, now: Instant) -> Result<SnapshotResult> {
        self.finish(JobState::Succeeded, None, now)
    }

    /// InFlight -> Failed.
    pub fn fail(&mut self, error: impl Into<String>, now: Instant) -> Result<SnapshotResult> {
        self.finish(JobState::Failed, Some(error.into()), now)
    }

    /// Count a transient status-check failure; returns the new streak length.
    pub fn record_poll_failure(&mut self) -> u32 {
        self.consecutive_poll_failures += 1;
        self.consecutive_poll_failures
    }

    pub fn reset_poll_failures(&mut self) {
        self.consecutive_poll_failures = 0;
    }

    fn finish(
        &mut self,
        to: JobState,
        error: Option<String>,
        now: Instant,
    ) -> Result<SnapshotResult> {
        if self.state != JobState::InFlight {
            return Err(self.invalid(to));
        }
        self.state = to;

        let outcome = match to {
            JobState::Succeeded => SnapshotOutcome::Succeeded,
            _ => SnapshotOutcome::Failed,
        };
        let duration = self
            .started_at
            .map(|start| now.saturating_duration_since(start))
            .or(Some(Duration::ZERO));

        Ok(SnapshotResult {
            resource_id: self.resource_id.clone(),
            snapshot_id: self.snapshot_id().map(str::to_string),
            outcome,
            duration,
            error,
        })
    }

    fn transition(&mut self, to: JobState) -> Result<()> {
        if self.state != JobState::Pending {
            return Err(self.invalid(to));
        }
        self.state = to;
        Ok(())
    }

    fn invalid(&self, to: JobState) -> SnapctlError {
        SnapctlError::InvalidTransition {
            resource_id: self.resource_id.clone(),
            from: self.state,
            to,
        }
    }
}
