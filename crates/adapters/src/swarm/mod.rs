// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Docker Swarm control-plane adapters

mod docker;

pub use docker::DockerSwarmAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSwarmAdapter, SwarmCall};

use async_trait::async_trait;
use rsw_core::Workload;
use thiserror::Error;

/// Errors from Swarm operations
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("no running tasks in service {0}")]
    NoRunningTasks(String),

    #[error("command exited with code {code} in service {service}")]
    ExecFailed { service: String, code: i64 },

    #[error("docker api error: {0}")]
    Api(String),
}

/// Which running tasks of a service a hook command executes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecScope {
    /// One arbitrary running task; remaining tasks are skipped with a log.
    OneTask,
    /// Every running task, in task-list order.
    AllTasks,
}

/// Adapter for the Swarm control plane (service listing and in-task exec)
#[async_trait]
pub trait SwarmAdapter: Clone + Send + Sync + 'static {
    /// List all services with their labels.
    async fn list_services(&self) -> Result<Vec<Workload>, SwarmError>;

    /// Fetch one service by ID; `None` when it no longer exists.
    async fn find_service(&self, id: &str) -> Result<Option<Workload>, SwarmError>;

    /// Run a shell command inside the service's running task(s).
    async fn exec_in_service(
        &self,
        workload: &Workload,
        command: &str,
        scope: ExecScope,
    ) -> Result<(), SwarmError>;
}
