// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared backup status map

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Last-known backup outcome per service, shared between the executor
/// (writer) and query connections (readers).
///
/// An entry appears on the first completed execution for a service and is
/// overwritten by every later one. Entries for services that have since been
/// removed stay around until the process restarts.
#[derive(Clone, Default)]
pub struct StatusStore {
    inner: Arc<Mutex<BTreeMap<String, bool>>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a completed execution.
    pub fn record(&self, service_id: &str, success: bool) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(service_id.to_string(), success);
    }

    /// Copy of the current map; the lock is held only for the copy.
    pub fn snapshot(&self) -> BTreeMap<String, bool> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
