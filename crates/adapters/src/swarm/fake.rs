// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory Swarm adapter for tests
#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rsw_core::Workload;

use super::{ExecScope, SwarmAdapter, SwarmError};

/// Recorded call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwarmCall {
    ListServices,
    FindService { id: String },
    Exec { service: String, command: String, scope: ExecScope },
}

#[derive(Default)]
struct FakeState {
    services: Vec<Workload>,
    calls: Vec<SwarmCall>,
    fail_list: bool,
    fail_exec: bool,
    no_running_tasks: bool,
    exec_delay: Option<Duration>,
}

/// Fake Swarm adapter holding services in memory.
#[derive(Clone, Default)]
pub struct FakeSwarmAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSwarmAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service to the cluster, replacing any existing one with the same id.
    pub fn add_service(&self, workload: Workload) {
        let mut state = self.lock();
        state.services.retain(|w| w.id != workload.id);
        state.services.push(workload);
    }

    pub fn remove_service(&self, id: &str) {
        self.lock().services.retain(|w| w.id != id);
    }

    /// All calls made against this adapter, in order.
    pub fn calls(&self) -> Vec<SwarmCall> {
        self.lock().calls.clone()
    }

    /// Make `list_services` and `find_service` fail with an API error.
    pub fn set_fail_list(&self, fail: bool) {
        self.lock().fail_list = fail;
    }

    /// Make `exec_in_service` fail with a nonzero exit code.
    pub fn set_fail_exec(&self, fail: bool) {
        self.lock().fail_exec = fail;
    }

    /// Make `exec_in_service` report no running tasks.
    pub fn set_no_running_tasks(&self, empty: bool) {
        self.lock().no_running_tasks = empty;
    }

    /// Delay each exec by `delay` before it resolves.
    pub fn set_exec_delay(&self, delay: Duration) {
        self.lock().exec_delay = Some(delay);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SwarmAdapter for FakeSwarmAdapter {
    async fn list_services(&self) -> Result<Vec<Workload>, SwarmError> {
        let mut state = self.lock();
        state.calls.push(SwarmCall::ListServices);
        if state.fail_list {
            return Err(SwarmError::Api("fake list failure".to_string()));
        }
        Ok(state.services.clone())
    }

    async fn find_service(&self, id: &str) -> Result<Option<Workload>, SwarmError> {
        let mut state = self.lock();
        state.calls.push(SwarmCall::FindService { id: id.to_string() });
        if state.fail_list {
            return Err(SwarmError::Api("fake inspect failure".to_string()));
        }
        Ok(state.services.iter().find(|w| w.id == id).cloned())
    }

    async fn exec_in_service(
        &self,
        workload: &Workload,
        command: &str,
        scope: ExecScope,
    ) -> Result<(), SwarmError> {
        let delay = {
            let mut state = self.lock();
            state.calls.push(SwarmCall::Exec {
                service: workload.name.clone(),
                command: command.to_string(),
                scope,
            });
            state.exec_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.lock();
        if state.no_running_tasks {
            return Err(SwarmError::NoRunningTasks(workload.name.clone()));
        }
        if state.fail_exec {
            return Err(SwarmError::ExecFailed {
                service: workload.name.clone(),
                code: 1,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
