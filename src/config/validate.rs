// src/config/validate.rs

use std::collections::HashSet;
use std::str::FromStr;

use tracing::warn;

use crate::config::model::{
    BackupSettings, ConfigFile, ProtectedResource, RawConfigFile, RawProtectedResource,
};
use crate::errors::{Result, SnapctlError};
use crate::filter::TagFilter;
use crate::types::{parse_duration, Provider, ResourceKind};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SnapctlError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let provider = Provider::from_str(&raw.provider.name)
            .map_err(SnapctlError::UnsupportedProvider)?;
        let region = validate_region(&raw)?;
        let backup = validate_backup(&raw)?;
        let resources = validate_resources(&raw.protect.resources)?;

        Ok(ConfigFile {
            app: raw.app,
            provider,
            region,
            auth: raw.auth,
            backup,
            resources,
        })
    }
}

fn validate_region(cfg: &RawConfigFile) -> Result<String> {
    let region = cfg.provider.region.trim();
    if region.is_empty() {
        return Err(SnapctlError::ConfigError(
            "[provider].region must not be empty".to_string(),
        ));
    }
    Ok(region.to_string())
}

fn validate_backup(cfg: &RawConfigFile) -> Result<BackupSettings> {
    let backup = &cfg.backup;

    if backup.parallel == 0 {
        return Err(SnapctlError::ConfigError(
            "[backup].parallel must be >= 1 (got 0)".to_string(),
        ));
    }

    let poll_interval = parse_duration(&backup.poll_interval).map_err(|e| {
        SnapctlError::ConfigError(format!("[backup].poll_interval is invalid: {e}"))
    })?;

    if backup.snapshot_prefix.trim().is_empty() {
        return Err(SnapctlError::ConfigError(
            "[backup].snapshot_prefix must not be empty".to_string(),
        ));
    }

    if backup.max_poll_failures == Some(0) {
        return Err(SnapctlError::ConfigError(
            "[backup].max_poll_failures must be >= 1 when set (got 0)".to_string(),
        ));
    }

    Ok(BackupSettings {
        parallel: backup.parallel,
        poll_interval,
        snapshot_prefix: backup.snapshot_prefix.trim().to_string(),
        max_poll_failures: backup.max_poll_failures,
    })
}

fn validate_resources(raw: &[RawProtectedResource]) -> Result<Vec<ProtectedResource>> {
    if raw.is_empty() {
        return Err(SnapctlError::ConfigError(
            "config must contain at least one [[protect.resources]] entry".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut resources = Vec::with_capacity(raw.len());

    for entry in raw {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(SnapctlError::ConfigError(
                "[[protect.resources]] entry is missing a name".to_string(),
            ));
        }
        if !seen.insert(name.to_string()) {
            return Err(SnapctlError::ConfigError(format!(
                "duplicate [[protect.resources]] name '{name}'"
            )));
        }

        let kind = ResourceKind::from_str(&entry.kind)
            .map_err(SnapctlError::UnsupportedResourceKind)?;
        let filter = validate_filter(name, &entry.tags)?;

        resources.push(ProtectedResource {
            name: name.to_string(),
            kind,
            filter_source: entry.tags.clone(),
            filter,
        });
    }

    Ok(resources)
}

/// An empty filter would silently back up nothing, so it is rejected here.
/// Individual unusable tokens are only warned about; the filter language
/// itself drops them.
fn validate_filter(resource: &str, source: &str) -> Result<TagFilter> {
    if source.trim().is_empty() {
        return Err(SnapctlError::ConfigError(format!(
            "resource '{resource}' has an empty `tags` filter"
        )));
    }

    let parsed = TagFilter::parse_with_diagnostics(source);
    for token in &parsed.dropped {
        warn!(
            resource = %resource,
            token = %token,
            "ignoring tag filter token without `tag:<key>=<value>` form"
        );
    }
    for piece in &parsed.stray_quotes {
        warn!(
            resource = %resource,
            piece = %piece,
            "unmatched `\"` in tag filter; splitting this part literally"
        );
    }

    if parsed.filter.is_empty() {
        return Err(SnapctlError::ConfigError(format!(
            "resource '{resource}' tag filter '{source}' contains no `tag:<key>=<value>` conditions"
        )));
    }

    Ok(parsed.filter)
}
