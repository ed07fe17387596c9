// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backup execution for a single service

use std::path::{Path, PathBuf};
use std::time::Duration;

use rsw_adapters::restic::ResticError;
use rsw_adapters::{ExecScope, ResticAdapter, SwarmAdapter};
use rsw_core::{RetentionPolicy, StatusStore, Workload};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
enum RepoError {
    #[error("absolute repository path {0}")]
    AbsolutePath(String),
    #[error(transparent)]
    Restic(#[from] ResticError),
}

/// Settings shared by every backup execution.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Local directory under which backup sources are mounted.
    pub backup_base: PathBuf,
    /// Retention applied after each successful backup.
    pub policy: RetentionPolicy,
    /// Which running tasks hook commands execute in.
    pub hook_scope: ExecScope,
    /// Hard cap on a single hook command.
    pub hook_timeout: Duration,
}

/// Runs one service backup end to end and records the outcome.
#[derive(Clone)]
pub struct BackupRunner<S, R> {
    swarm: S,
    restic: R,
    status: StatusStore,
    config: RunnerConfig,
}

impl<S, R> BackupRunner<S, R>
where
    S: SwarmAdapter,
    R: ResticAdapter,
{
    pub fn new(swarm: S, restic: R, status: StatusStore, config: RunnerConfig) -> Self {
        Self {
            swarm,
            restic,
            status,
            config,
        }
    }

    /// Execute a backup of the given service.
    ///
    /// The service is re-fetched first so stale labels from scheduling
    /// time are never acted on. Returns `None` without recording an
    /// outcome when the service vanished or disabled backups in the
    /// meantime.
    pub async fn run(&self, service_id: &str) -> Option<bool> {
        let workload = match self.swarm.find_service(service_id).await {
            Ok(Some(workload)) => workload,
            Ok(None) => {
                warn!(service = service_id, "service removed before backup");
                return None;
            }
            Err(e) => {
                error!(service = service_id, error = %e, "failed to refresh service");
                self.status.record(service_id, false);
                return Some(false);
            }
        };

        if !workload.backup_enabled() {
            info!(service = %workload.name, "backups disabled since scheduling, skipping");
            return None;
        }

        info!(service = %workload.name, "backing up");
        let success = self.backup(&workload).await;
        self.status.record(service_id, success);
        if success {
            info!(service = %workload.name, "backup finished");
        } else {
            error!(service = %workload.name, "backup failed");
        }
        Some(success)
    }

    async fn backup(&self, workload: &Workload) -> bool {
        let repos = workload.repos();
        if repos.is_empty() {
            error!(service = %workload.name, "no repositories configured");
            return false;
        }

        if let Some(hook) = workload.pre_hook() {
            info!(service = %workload.name, "running pre-backup hook");
            if !self.run_hook(workload, hook).await {
                return false;
            }
        }

        let mut success = true;
        for repo in &repos {
            if let Err(e) = self.backup_repo(workload, repo).await {
                error!(service = %workload.name, repo = %repo, error = %e, "repository backup failed");
                success = false;
            }
        }

        if let Some(hook) = workload.post_hook() {
            info!(service = %workload.name, "running post-backup hook");
            if !self.run_hook(workload, hook).await {
                success = false;
            }
        }

        success
    }

    /// One repository's sequence: ensure it exists, back up, forget.
    async fn backup_repo(&self, workload: &Workload, repo: &str) -> Result<(), RepoError> {
        if Path::new(repo).is_absolute() {
            return Err(RepoError::AbsolutePath(repo.to_string()));
        }

        if !self.restic.repo_exists(repo).await? {
            info!(repo = %repo, "initializing repository");
            self.restic.init_repo(repo).await?;
        }

        info!(service = %workload.name, repo = %repo, "taking backup");
        let source = self.config.backup_base.join(repo);
        self.restic.backup(repo, &source).await?;

        info!(service = %workload.name, repo = %repo, "forgetting old snapshots");
        self.restic
            .forget(repo, &self.config.policy.to_args())
            .await?;
        Ok(())
    }

    async fn run_hook(&self, workload: &Workload, command: &str) -> bool {
        let exec = self
            .swarm
            .exec_in_service(workload, command, self.config.hook_scope);
        match tokio::time::timeout(self.config.hook_timeout, exec).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!(service = %workload.name, error = %e, "hook failed");
                false
            }
            Err(_) => {
                error!(
                    service = %workload.name,
                    timeout = ?self.config.hook_timeout,
                    "hook timed out"
                );
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
