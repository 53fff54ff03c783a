// src/aws/mod.rs

//! AWS integration.
//!
//! - [`context`] loads SDK configuration (region, profile, assumed role)
//!   once and hands out service clients.
//! - [`discovery`] lists DB clusters and keeps the ones matching a tag
//!   filter.
//! - [`rds`] implements [`crate::backup::SnapshotClient`] with cluster
//!   snapshots.
//! - [`error`] maps SDK errors onto [`crate::backup::ClientError`].

pub mod context;
pub mod discovery;
pub mod error;
pub mod rds;

pub use context::AwsContext;
pub use discovery::discover_clusters;
pub use error::{classify_code, classify_sdk_error};
pub use rds::{snapshot_identifier, RdsSnapshotClient};
