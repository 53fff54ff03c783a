// src/aws/rds.rs

//! Aurora / RDS cluster snapshots.

use std::fmt;

use aws_sdk_rds::types::Tag;
use chrono::Utc;
use tracing::{debug, error};

use crate::aws::context::AwsContext;
use crate::aws::error::classify_sdk_error;
use crate::backup::{
    ClientError, ClientFuture, Resource, SnapshotClient, SnapshotHandle, SnapshotStatus,
};

/// `createdAt` tag and snapshot id suffix format (UTC).
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Value of the `origin` tag put on every snapshot.
pub const ORIGIN_TAG_VALUE: &str = "snapctl";

/// Identifier for a new cluster snapshot: `{prefix}-{cluster}-{timestamp}`.
pub fn snapshot_identifier(prefix: &str, cluster_id: &str, timestamp: &str) -> String {
    format!("{prefix}-{cluster_id}-{timestamp}")
}

/// [`SnapshotClient`] backed by `CreateDBClusterSnapshot` /
/// `DescribeDBClusterSnapshots`.
#[derive(Clone)]
pub struct RdsSnapshotClient {
    client: aws_sdk_rds::Client,
    prefix: String,
}

impl fmt::Debug for RdsSnapshotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RdsSnapshotClient")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl RdsSnapshotClient {
    pub fn new(client: aws_sdk_rds::Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    pub fn from_context(ctx: &AwsContext, prefix: impl Into<String>) -> Self {
        Self::new(ctx.rds_client(), prefix)
    }

    async fn create_cluster_snapshot(
        &self,
        resource: &Resource,
    ) -> Result<SnapshotHandle, ClientError> {
        let timestamp = Utc::now().format(SNAPSHOT_TIMESTAMP_FORMAT).to_string();
        let snapshot_id = snapshot_identifier(&self.prefix, &resource.id, &timestamp);

        debug!(cluster = %resource.id, snapshot = %snapshot_id, "creating cluster snapshot");

        let response = self
            .client
            .create_db_cluster_snapshot()
            .db_cluster_snapshot_identifier(&snapshot_id)
            .db_cluster_identifier(&resource.id)
            .set_tags(Some(snapshot_tags(&resource.id, &timestamp, &self.prefix)))
            .send()
            .await
            .map_err(|e| {
                let err = classify_sdk_error(&e);
                error!(cluster = %resource.id, error = %err, "failed to create cluster snapshot");
                err
            })?;

        let snapshot = response.db_cluster_snapshot();
        Ok(SnapshotHandle {
            snapshot_id: snapshot
                .and_then(|s| s.db_cluster_snapshot_identifier())
                .unwrap_or(snapshot_id.as_str())
                .to_string(),
            snapshot_arn: snapshot
                .and_then(|s| s.db_cluster_snapshot_arn())
                .map(str::to_string),
        })
    }

    async fn snapshot_status(&self, snapshot_id: &str) -> Result<SnapshotStatus, ClientError> {
        let response = self
            .client
            .describe_db_cluster_snapshots()
            .db_cluster_snapshot_identifier(snapshot_id)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        let status = response
            .db_cluster_snapshots()
            .first()
            .and_then(|s| s.status())
            .ok_or_else(|| {
                ClientError::NotFound(format!(
                    "snapshot '{snapshot_id}' missing from DescribeDBClusterSnapshots response"
                ))
            })?;

        Ok(SnapshotStatus::parse(status))
    }
}

impl SnapshotClient for RdsSnapshotClient {
    fn initiate_snapshot<'a>(&'a self, resource: &'a Resource) -> ClientFuture<'a, SnapshotHandle> {
        Box::pin(self.create_cluster_snapshot(resource))
    }

    fn check_status<'a>(&'a self, snapshot_id: &'a str) -> ClientFuture<'a, SnapshotStatus> {
        Box::pin(self.snapshot_status(snapshot_id))
    }
}

fn snapshot_tags(cluster_id: &str, timestamp: &str, prefix: &str) -> Vec<Tag> {
    [
        ("resource", cluster_id),
        ("createdAt", timestamp),
        ("prefix", prefix),
        ("version", env!("CARGO_PKG_VERSION")),
        ("origin", ORIGIN_TAG_VALUE),
    ]
    .into_iter()
    .map(|(key, value)| Tag::builder().key(key).value(value).build())
    .collect()
}
