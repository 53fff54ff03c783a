// src/backup/scheduler.rs

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::backup::client::{BackupEvent, SnapshotClient};
use crate::backup::run::{BackupRun, PollOutcome};
use crate::backup::{DEFAULT_PARALLELISM, DEFAULT_POLL_INTERVAL, Resource, SnapshotResult};
use crate::errors::{Result, SnapctlError};

/// Knobs for a [`BackupScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Maximum number of snapshots outstanding against the service.
    pub parallelism: usize,
    /// Sleep before each polling round.
    pub poll_interval: Duration,
    /// Fail a job after this many consecutive retryable status-check errors.
    /// `None` retries forever.
    pub max_poll_failures: Option<u32>,
}

impl SchedulerOptions {
    pub fn new(parallelism: usize) -> Result<Self> {
        if parallelism == 0 {
            return Err(SnapctlError::ConfigError(
                "parallelism must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(Self {
            parallelism,
            ..Self::default()
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_poll_failures(mut self, limit: Option<u32>) -> Self {
        self.max_poll_failures = limit;
        self
    }
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_failures: None,
        }
    }
}

/// Drives a batch of eligible resources through snapshot initiation and
/// polling.
///
/// All service calls are issued one at a time from the calling task; the
/// parallelism bound limits how many snapshots are outstanding on the
/// service side, not local concurrency. The only suspension besides the
/// calls themselves is the fixed sleep before each polling round.
pub struct BackupScheduler<C: SnapshotClient> {
    client: C,
    options: SchedulerOptions,
}

impl<C: SnapshotClient> fmt::Debug for BackupScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackupScheduler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<C: SnapshotClient> BackupScheduler<C> {
    pub fn new(client: C, options: SchedulerOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    /// Back up `resources` and return one terminal result per resource.
    ///
    /// The caller must have already restricted `resources` to the eligible
    /// status. Results are in completion order. Individual failures are
    /// recorded, never propagated; an `Err` means the run's own bookkeeping
    /// was violated.
    pub async fn run(&self, resources: Vec<Resource>) -> Result<Vec<SnapshotResult>> {
        if resources.is_empty() {
            debug!("no resources to back up");
            return Ok(Vec::new());
        }

        info!(
            resources = resources.len(),
            parallelism = self.options.parallelism,
            poll_interval_ms = self.options.poll_interval.as_millis() as u64,
            "starting backup run"
        );

        let mut run = BackupRun::new(
            resources,
            self.options.parallelism,
            self.options.max_poll_failures,
        );

        while !run.is_complete() {
            self.fill_slots(&mut run).await?;

            if run.in_flight_len() > 0 {
                tokio::time::sleep(self.options.poll_interval).await;
                self.poll_round(&mut run).await?;
            }
        }

        let results = run.into_results();
        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(
            total = results.len(),
            succeeded = results.len() - failed,
            failed,
            "backup run finished"
        );
        Ok(results)
    }

    /// Initiate snapshots until the pending queue is empty or every slot is
    /// taken.
    async fn fill_slots(&self, run: &mut BackupRun) -> Result<()> {
        while let Some((resource, job)) = run.next_to_initiate() {
            match self.client.initiate_snapshot(&resource).await {
                Ok(handle) => {
                    let started = run.record_started(job, handle, Instant::now())?;
                    let resource_id = started.resource_id().to_string();
                    let snapshot_id = started.snapshot_id().unwrap_or_default().to_string();
                    let event = BackupEvent::Started {
                        resource_id,
                        snapshot_id,
                        in_flight: run.in_flight_len(),
                    };
                    self.client.log(&event);
                }
                Err(error) => {
                    let result = run.record_initiation_failure(job, &error)?;
                    self.client.log(&BackupEvent::Completed {
                        result,
                        in_flight: run.in_flight_len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check every in-flight job exactly once, in initiation order.
    async fn poll_round(&self, run: &mut BackupRun) -> Result<()> {
        self.client.log(&BackupEvent::PollRound {
            in_flight: run.in_flight_len(),
            pending: run.pending_len(),
        });

        for snapshot_id in run.in_flight_snapshot_ids() {
            let status = self.client.check_status(&snapshot_id).await;
            let resource_id = run
                .in_flight()
                .iter()
                .find(|job| job.snapshot_id() == Some(snapshot_id.as_str()))
                .map(|job| job.resource_id().to_string())
                .unwrap_or_default();

            match run.observe(&snapshot_id, status, Instant::now())? {
                PollOutcome::Outstanding => {}
                PollOutcome::Retrying {
                    error,
                    consecutive_failures,
                } => self.client.log(&BackupEvent::PollRetry {
                    resource_id,
                    snapshot_id,
                    error,
                    consecutive_failures,
                }),
                PollOutcome::Finished(result) => self.client.log(&BackupEvent::Completed {
                    result,
                    in_flight: run.in_flight_len(),
                }),
            }
        }
        Ok(())
    }
}
