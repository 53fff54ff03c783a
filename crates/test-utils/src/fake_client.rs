use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use snapctl::backup::{
    BackupEvent, ClientError, ClientFuture, Resource, SnapshotClient, SnapshotHandle,
    SnapshotStatus,
};

type PollScript = VecDeque<Result<SnapshotStatus, ClientError>>;

/// A scripted snapshot service that:
/// - records initiations, status checks and log events
/// - answers status checks from a per-resource script (the last entry
///   repeats; an unscripted resource is `available` on its first check)
/// - tracks how many snapshots are outstanding service-side.
///
/// Clones share state, so a test can keep one clone for assertions while
/// the scheduler owns another.
#[derive(Clone, Default)]
pub struct FakeSnapshotClient {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    initiation_failures: HashMap<String, ClientError>,
    scripts: HashMap<String, PollScript>,
    /// snapshot id -> resource id
    owners: HashMap<String, String>,
    initiated: Vec<String>,
    status_checks: Vec<String>,
    events: Vec<BackupEvent>,
    outstanding: usize,
    max_outstanding: usize,
}

impl FakeSnapshotClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot id the fake hands out for `resource_id`.
    pub fn snapshot_id_for(resource_id: &str) -> String {
        format!("snap-{resource_id}")
    }

    /// Make `initiate_snapshot` fail for `resource_id`.
    pub fn fail_initiation(self, resource_id: &str, message: &str) -> Self {
        self.state.lock().unwrap().initiation_failures.insert(
            resource_id.to_string(),
            ClientError::Service {
                code: Some("InvalidDBClusterStateFault".to_string()),
                message: message.to_string(),
            },
        );
        self
    }

    /// Script the status checks for `resource_id`'s snapshot.
    pub fn with_polls<I>(self, resource_id: &str, polls: I) -> Self
    where
        I: IntoIterator<Item = Result<SnapshotStatus, ClientError>>,
    {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(resource_id.to_string(), polls.into_iter().collect());
        self
    }

    /// Script plain status strings, e.g. `&["creating", "available"]`.
    pub fn with_statuses(self, resource_id: &str, statuses: &[&str]) -> Self {
        let polls: Vec<_> = statuses
            .iter()
            .map(|s| Ok(SnapshotStatus::parse(s)))
            .collect();
        self.with_polls(resource_id, polls)
    }

    pub fn initiated(&self) -> Vec<String> {
        self.state.lock().unwrap().initiated.clone()
    }

    pub fn status_checks(&self) -> Vec<String> {
        self.state.lock().unwrap().status_checks.clone()
    }

    pub fn events(&self) -> Vec<BackupEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn outstanding(&self) -> usize {
        self.state.lock().unwrap().outstanding
    }

    /// Highest number of snapshots that were outstanding at the same time.
    pub fn max_outstanding(&self) -> usize {
        self.state.lock().unwrap().max_outstanding
    }

    /// Largest `in_flight` value carried by any logged event.
    pub fn max_logged_in_flight(&self) -> usize {
        self.events()
            .iter()
            .map(|e| match e {
                BackupEvent::Started { in_flight, .. }
                | BackupEvent::Completed { in_flight, .. }
                | BackupEvent::PollRound { in_flight, .. } => *in_flight,
                BackupEvent::PollRetry { .. } => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

impl SnapshotClient for FakeSnapshotClient {
    fn initiate_snapshot<'a>(&'a self, resource: &'a Resource) -> ClientFuture<'a, SnapshotHandle> {
        let state = Arc::clone(&self.state);
        let resource_id = resource.id.clone();

        Box::pin(async move {
            let mut guard = state.lock().unwrap();
            guard.initiated.push(resource_id.clone());

            if let Some(err) = guard.initiation_failures.get(&resource_id) {
                return Err(err.clone());
            }

            let snapshot_id = FakeSnapshotClient::snapshot_id_for(&resource_id);
            guard.owners.insert(snapshot_id.clone(), resource_id);
            guard.outstanding += 1;
            guard.max_outstanding = guard.max_outstanding.max(guard.outstanding);

            Ok(SnapshotHandle {
                snapshot_arn: Some(format!("arn:aws:rds:us-east-1:000000000000:cluster-snapshot:{snapshot_id}")),
                snapshot_id,
            })
        })
    }

    fn check_status<'a>(&'a self, snapshot_id: &'a str) -> ClientFuture<'a, SnapshotStatus> {
        let state = Arc::clone(&self.state);
        let snapshot_id = snapshot_id.to_string();

        Box::pin(async move {
            let mut guard = state.lock().unwrap();
            guard.status_checks.push(snapshot_id.clone());

            let Some(owner) = guard.owners.get(&snapshot_id).cloned() else {
                return Err(ClientError::NotFound(snapshot_id));
            };

            let reply = match guard.scripts.get_mut(&owner) {
                Some(script) if script.len() > 1 => script.pop_front().unwrap(),
                Some(script) => script
                    .front()
                    .cloned()
                    .unwrap_or(Ok(SnapshotStatus::Available)),
                None => Ok(SnapshotStatus::Available),
            };

            if matches!(&reply, Ok(status) if status.is_terminal()) {
                guard.outstanding -= 1;
            }
            reply
        })
    }

    fn log(&self, event: &BackupEvent) {
        snapctl::backup::client::log_event(event);
        self.state.lock().unwrap().events.push(event.clone());
    }
}
