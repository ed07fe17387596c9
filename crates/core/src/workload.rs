// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service descriptor and backup label accessors

use std::collections::{BTreeSet, HashMap};

/// Label that turns backup scheduling on when set to `"true"`.
pub const LABEL_BACKUP: &str = "rsw.backup";
/// Label carrying the 5-field cron expression.
pub const LABEL_RUN_AT: &str = "rsw.run-at";
/// Label carrying the comma-separated repository names.
pub const LABEL_REPOS: &str = "rsw.repos";
/// Label carrying the pre-backup hook command.
pub const LABEL_PRE_HOOK: &str = "rsw.pre-hook";
/// Label carrying the post-backup hook command.
pub const LABEL_POST_HOOK: &str = "rsw.post-hook";

/// A Swarm service as seen by the scheduler: identity plus raw labels.
///
/// Descriptors are fetched fresh from the orchestrator on every scan and
/// again right before execution; nothing here is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub id: String,
    pub name: String,
    pub labels: HashMap<String, String>,
}

impl Workload {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            labels: HashMap::new(),
        }
    }

    /// Builder-style label insertion.
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Whether the service has opted into scheduled backups.
    pub fn backup_enabled(&self) -> bool {
        self.label(LABEL_BACKUP) == Some("true")
    }

    /// The service's cron line, if labeled.
    pub fn run_at(&self) -> Option<&str> {
        self.label(LABEL_RUN_AT)
    }

    /// Repository names: comma-separated, entries trimmed, empties dropped.
    pub fn repos(&self) -> BTreeSet<String> {
        self.label(LABEL_REPOS)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Command to run inside the service before a backup.
    pub fn pre_hook(&self) -> Option<&str> {
        self.label(LABEL_PRE_HOOK)
    }

    /// Command to run inside the service after a backup.
    pub fn post_hook(&self) -> Option<&str> {
        self.label(LABEL_POST_HOOK)
    }
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
