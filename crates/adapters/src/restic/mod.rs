// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restic repository operations over SFTP

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

mod cli;

pub use cli::ResticCli;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeResticAdapter, ResticCall};

/// Errors from restic invocations
#[derive(Debug, Error)]
pub enum ResticError {
    #[error("restic exited with code {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("failed to run restic: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for restic operations against remote repositories.
///
/// `repo` is the repository path on the backup host, used verbatim in
/// the sftp URL. Joining the local backup base onto the source path is
/// the caller's job.
#[async_trait]
pub trait ResticAdapter: Clone + Send + Sync + 'static {
    /// Whether the repository exists (its config is readable).
    async fn repo_exists(&self, repo: &str) -> Result<bool, ResticError>;

    /// Initialize a new repository.
    async fn init_repo(&self, repo: &str) -> Result<(), ResticError>;

    /// Back up `path` into the repository.
    async fn backup(&self, repo: &str, path: &Path) -> Result<(), ResticError>;

    /// Forget and prune snapshots according to the given policy arguments.
    async fn forget(&self, repo: &str, args: &[String]) -> Result<(), ResticError>;
}
