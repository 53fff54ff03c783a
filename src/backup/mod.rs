// src/backup/mod.rs

//! Snapshot orchestration.
//!
//! - [`job`] is the per-resource snapshot state machine.
//! - [`run`] owns the working set of a single backup run (pending queue,
//!   in-flight jobs, results). It is synchronous and performs no IO.
//! - [`scheduler`] is the async shell that drives a [`BackupRun`] against a
//!   [`SnapshotClient`], sleeping a fixed interval between polling rounds.
//! - [`client`] defines the [`SnapshotClient`] seam.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::filter::TagFilter;

pub mod client;
pub mod job;
pub mod run;
pub mod scheduler;

pub use client::{BackupEvent, ClientError, ClientFuture, SnapshotClient};
pub use job::{JobState, SnapshotJob};
pub use run::{BackupRun, PollOutcome};
pub use scheduler::{BackupScheduler, SchedulerOptions};

/// Poll interval used when neither config nor CLI override it.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default number of snapshots allowed to be outstanding at once.
pub const DEFAULT_PARALLELISM: usize = 3;

/// Resource status that permits snapshotting.
pub const ELIGIBLE_STATUS: &str = "available";

/// A database cluster as seen by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: String,
    pub arn: Option<String>,
    pub status: String,
    pub tags: HashMap<String, String>,
}

impl Resource {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arn: None,
            status: status.into(),
            tags: HashMap::new(),
        }
    }

    pub fn matches(&self, filter: &TagFilter) -> bool {
        filter.matches(&self.tags)
    }

    pub fn is_eligible(&self) -> bool {
        self.status == ELIGIBLE_STATUS
    }
}

/// Keep only resources whose status permits a snapshot. The scheduler
/// itself never filters; callers run this first.
pub fn select_eligible(resources: Vec<Resource>) -> Vec<Resource> {
    resources.into_iter().filter(Resource::is_eligible).collect()
}

/// Identifiers returned by a successful snapshot initiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHandle {
    pub snapshot_id: String,
    pub snapshot_arn: Option<String>,
}

/// Status string reported by the snapshot service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotStatus {
    Available,
    Failed,
    Other(String),
}

impl SnapshotStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "available" => SnapshotStatus::Available,
            "failed" => SnapshotStatus::Failed,
            other => SnapshotStatus::Other(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SnapshotStatus::Other(_))
    }
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotStatus::Available => f.write_str("available"),
            SnapshotStatus::Failed => f.write_str("failed"),
            SnapshotStatus::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Succeeded,
    Failed,
}

/// Terminal record for one resource in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotResult {
    pub resource_id: String,
    /// `None` when initiation itself failed.
    pub snapshot_id: Option<String>,
    pub outcome: SnapshotOutcome,
    /// Time from initiation to the poll that observed the terminal status.
    pub duration: Option<Duration>,
    pub error: Option<String>,
}

impl SnapshotResult {
    pub fn is_success(&self) -> bool {
        self.outcome == SnapshotOutcome::Succeeded
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }
}
