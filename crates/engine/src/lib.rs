// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Backup scheduling and execution engine

mod queue;
mod runner;
mod scheduler;

pub use queue::{PendingJob, Task};
pub use runner::{BackupRunner, RunnerConfig};
pub use scheduler::Scheduler;
