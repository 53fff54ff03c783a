// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::filter::TagFilter;
use crate::types::{Provider, ResourceKind};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// app = "billing"
///
/// [provider]
/// name = "aws"
/// region = "eu-west-1"
///
/// [auth]
/// profile = "ops"
///
/// [backup]
/// parallel = 3
/// poll_interval = "30s"
///
/// [[protect.resources]]
/// name = "aurora-prod"
/// type = "rds"
/// tags = "tag:Environment=prod AND tag:Owner=devops"
/// ```
///
/// This is the unvalidated form; convert it with `ConfigFile::try_from`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Application label, only used in output.
    #[serde(default)]
    pub app: String,

    pub provider: ProviderSection,

    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub backup: BackupSection,

    #[serde(default)]
    pub protect: ProtectSection,
}

/// `[provider]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSection {
    pub name: String,
    pub region: String,
}

/// `[auth]` section.
///
/// Both fields are optional. With neither set, the default credential chain
/// is used. `role_arn` is assumed on top of whatever `profile` resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthSection {
    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default)]
    pub role_arn: Option<String>,
}

/// `[backup]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupSection {
    /// Maximum snapshots outstanding at once.
    #[serde(default = "default_parallel")]
    pub parallel: usize,

    /// Duration string (`"30s"`, `"500ms"`, `"2m"`).
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Prefix of generated snapshot identifiers.
    #[serde(default = "default_snapshot_prefix")]
    pub snapshot_prefix: String,

    #[serde(default)]
    pub max_poll_failures: Option<u32>,
}

fn default_parallel() -> usize {
    crate::backup::DEFAULT_PARALLELISM
}

fn default_poll_interval() -> String {
    "30s".to_string()
}

fn default_snapshot_prefix() -> String {
    "backup".to_string()
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            poll_interval: default_poll_interval(),
            snapshot_prefix: default_snapshot_prefix(),
            max_poll_failures: None,
        }
    }
}

/// `[protect]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProtectSection {
    #[serde(default)]
    pub resources: Vec<RawProtectedResource>,
}

/// One `[[protect.resources]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProtectedResource {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    /// Tag filter source, e.g. `"tag:Owner=devops OR tag:Critical=yes"`.
    pub tags: String,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub app: String,
    pub provider: Provider,
    pub region: String,
    pub auth: AuthSection,
    pub backup: BackupSettings,
    pub resources: Vec<ProtectedResource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSettings {
    pub parallel: usize,
    pub poll_interval: Duration,
    pub snapshot_prefix: String,
    pub max_poll_failures: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ProtectedResource {
    pub name: String,
    pub kind: ResourceKind,
    /// The filter exactly as written in the config.
    pub filter_source: String,
    pub filter: TagFilter,
}
