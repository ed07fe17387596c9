// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory restic adapter for tests
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ResticAdapter, ResticError};

/// Recorded call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResticCall {
    RepoExists { repo: String },
    InitRepo { repo: String },
    Backup { repo: String, path: PathBuf },
    Forget { repo: String, args: Vec<String> },
}

#[derive(Default)]
struct FakeState {
    existing: HashSet<String>,
    calls: Vec<ResticCall>,
    fail_init: bool,
    fail_backup: HashSet<String>,
    fail_forget: HashSet<String>,
}

/// Fake restic adapter tracking repositories in memory.
#[derive(Clone, Default)]
pub struct FakeResticAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeResticAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a repository as already initialized.
    pub fn mark_existing(&self, repo: &str) {
        self.lock().existing.insert(repo.to_string());
    }

    /// Repositories currently initialized.
    pub fn existing_repos(&self) -> HashSet<String> {
        self.lock().existing.clone()
    }

    /// All calls made against this adapter, in order.
    pub fn calls(&self) -> Vec<ResticCall> {
        self.lock().calls.clone()
    }

    /// Make `init_repo` fail for every repository.
    pub fn set_fail_init(&self, fail: bool) {
        self.lock().fail_init = fail;
    }

    /// Make `backup` fail for the given repository.
    pub fn set_fail_backup(&self, repo: &str) {
        self.lock().fail_backup.insert(repo.to_string());
    }

    /// Make `forget` fail for the given repository.
    pub fn set_fail_forget(&self, repo: &str) {
        self.lock().fail_forget.insert(repo.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn fail(op: &str, repo: &str) -> ResticError {
    ResticError::CommandFailed {
        code: 1,
        stderr: format!("fake {op} failure for {repo}"),
    }
}

#[async_trait]
impl ResticAdapter for FakeResticAdapter {
    async fn repo_exists(&self, repo: &str) -> Result<bool, ResticError> {
        let mut state = self.lock();
        state.calls.push(ResticCall::RepoExists { repo: repo.to_string() });
        Ok(state.existing.contains(repo))
    }

    async fn init_repo(&self, repo: &str) -> Result<(), ResticError> {
        let mut state = self.lock();
        state.calls.push(ResticCall::InitRepo { repo: repo.to_string() });
        if state.fail_init {
            return Err(fail("init", repo));
        }
        state.existing.insert(repo.to_string());
        Ok(())
    }

    async fn backup(&self, repo: &str, path: &Path) -> Result<(), ResticError> {
        let mut state = self.lock();
        state.calls.push(ResticCall::Backup {
            repo: repo.to_string(),
            path: path.to_path_buf(),
        });
        if state.fail_backup.contains(repo) {
            return Err(fail("backup", repo));
        }
        Ok(())
    }

    async fn forget(&self, repo: &str, args: &[String]) -> Result<(), ResticError> {
        let mut state = self.lock();
        state.calls.push(ResticCall::Forget {
            repo: repo.to_string(),
            args: args.to_vec(),
        });
        if state.fail_forget.contains(repo) {
            return Err(fail("forget", repo));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
