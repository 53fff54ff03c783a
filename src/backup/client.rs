// src/backup/client.rs

//! Pluggable snapshot service abstraction.
//!
//! The scheduler talks to a `SnapshotClient` instead of an SDK client. The
//! production implementation is [`crate::aws::RdsSnapshotClient`]; tests
//! provide a scripted fake.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backup::{Resource, SnapshotHandle, SnapshotOutcome, SnapshotResult, SnapshotStatus};

/// Boxed future returned by [`SnapshotClient`] methods.
pub type ClientFuture<'a, T> =
    Pin<Box<dyn Future<Output = std::result::Result<T, ClientError>> + Send + 'a>>;

/// Error from a single snapshot service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rate limit exceeded (retryable).
    #[error("request throttled: {0}")]
    Throttled(String),

    /// Network failure, timeout or service-side 5xx (retryable).
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The referenced resource or snapshot does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other service error.
    #[error("{message}")]
    Service {
        code: Option<String>,
        message: String,
    },
}

impl ClientError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Throttled(_) | ClientError::Unavailable(_))
    }
}

/// Observational events emitted by the scheduler. They never influence
/// control flow.
#[derive(Debug, Clone, PartialEq)]
pub enum BackupEvent {
    Started {
        resource_id: String,
        snapshot_id: String,
        in_flight: usize,
    },
    Completed {
        result: SnapshotResult,
        in_flight: usize,
    },
    PollRound {
        in_flight: usize,
        pending: usize,
    },
    PollRetry {
        resource_id: String,
        snapshot_id: String,
        error: ClientError,
        consecutive_failures: u32,
    },
}

/// Operations the scheduler needs from a snapshot service.
pub trait SnapshotClient: Send + Sync {
    /// Request a new snapshot of `resource`.
    fn initiate_snapshot<'a>(&'a self, resource: &'a Resource) -> ClientFuture<'a, SnapshotHandle>;

    /// Fetch the current status of a snapshot.
    fn check_status<'a>(&'a self, snapshot_id: &'a str) -> ClientFuture<'a, SnapshotStatus>;

    /// Side channel for progress reporting. Defaults to `tracing`.
    fn log(&self, event: &BackupEvent) {
        log_event(event);
    }
}

/// Default `tracing` rendering of a [`BackupEvent`].
pub fn log_event(event: &BackupEvent) {
    match event {
        BackupEvent::Started {
            resource_id,
            snapshot_id,
            in_flight,
        } => {
            info!(resource = %resource_id, snapshot = %snapshot_id, in_flight, "started backup");
        }
        BackupEvent::Completed { result, in_flight } => match result.outcome {
            SnapshotOutcome::Succeeded => info!(
                resource = %result.resource_id,
                snapshot = result.snapshot_id.as_deref().unwrap_or("-"),
                duration_secs = result.duration_secs().unwrap_or_default(),
                in_flight,
                "backup available"
            ),
            SnapshotOutcome::Failed => warn!(
                resource = %result.resource_id,
                snapshot = result.snapshot_id.as_deref().unwrap_or("-"),
                error = result.error.as_deref().unwrap_or("-"),
                in_flight,
                "backup failed"
            ),
        },
        BackupEvent::PollRound { in_flight, pending } => {
            debug!(in_flight, pending, "polling outstanding snapshots");
        }
        BackupEvent::PollRetry {
            resource_id,
            snapshot_id,
            error,
            consecutive_failures,
        } => {
            warn!(
                resource = %resource_id,
                snapshot = %snapshot_id,
                error = %error,
                consecutive_failures,
                "status check failed; will retry next round"
            );
        }
    }
}
