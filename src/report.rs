// src/report.rs

//! Plain-text output for `plan`, `validate` and `backup`.

use std::fmt;

use crate::backup::{Resource, SnapshotOutcome, SnapshotResult};
use crate::config::{ConfigFile, ProtectedResource};

/// Header shared by every command: app, provider, region and identity.
pub struct ConfigHeader<'a>(pub &'a ConfigFile);

impl fmt::Display for ConfigHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cfg = self.0;
        if !cfg.app.is_empty() {
            writeln!(f, "app:      {}", cfg.app)?;
        }
        writeln!(f, "provider: {}", cfg.provider)?;
        writeln!(f, "region:   {}", cfg.region)?;
        if let Some(ref profile) = cfg.auth.profile {
            writeln!(f, "profile:  {profile}")?;
        }
        if let Some(ref role_arn) = cfg.auth.role_arn {
            writeln!(f, "role:     {role_arn}")?;
        }
        Ok(())
    }
}

/// `validate` output for one protected resource entry.
pub struct ValidatedEntry<'a>(pub &'a ProtectedResource);

impl fmt::Display for ValidatedEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry = self.0;
        writeln!(f, "  - {} ({})", entry.name, entry.kind)?;
        writeln!(f, "      filter: {}", entry.filter)?;
        for (i, group) in entry.filter.groups.iter().enumerate() {
            writeln!(f, "      group {}: {group}", i + 1)?;
        }
        Ok(())
    }
}

/// `plan` output: the clusters matched by one entry, eligible ones marked.
pub struct Plan<'a> {
    pub entry: &'a ProtectedResource,
    pub resources: &'a [Resource],
}

impl fmt::Display for Plan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eligible = self.resources.iter().filter(|r| r.is_eligible()).count();
        writeln!(f, "{} ({})", self.entry.name, self.entry.kind)?;
        writeln!(f, "  filter: {}", self.entry.filter_source)?;
        writeln!(
            f,
            "  found:  {} cluster(s), {} eligible",
            self.resources.len(),
            eligible
        )?;
        for resource in self.resources {
            let mark = if resource.is_eligible() { "+" } else { "-" };
            writeln!(f, "    {mark} {} [{}]", resource.id, resource.status)?;
        }
        Ok(())
    }
}

/// `backup` output for one entry's run.
pub struct BackupSummary<'a> {
    pub entry: &'a str,
    pub results: &'a [SnapshotResult],
}

impl BackupSummary<'_> {
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }
}

impl fmt::Display for BackupSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failed();
        writeln!(
            f,
            "{}: {} succeeded, {} failed",
            self.entry,
            self.results.len() - failed,
            failed
        )?;
        for result in self.results {
            let snapshot = result.snapshot_id.as_deref().unwrap_or("-");
            match result.outcome {
                SnapshotOutcome::Succeeded => writeln!(
                    f,
                    "  ok   {} -> {} ({:.0}s)",
                    result.resource_id,
                    snapshot,
                    result.duration_secs().unwrap_or_default()
                )?,
                SnapshotOutcome::Failed => writeln!(
                    f,
                    "  FAIL {} -> {}: {}",
                    result.resource_id,
                    snapshot,
                    result.error.as_deref().unwrap_or("unknown error")
                )?,
            }
        }
        Ok(())
    }
}
