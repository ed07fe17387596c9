// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Label-driven backup scheduler

use chrono::{DateTime, Duration, Utc};
use rsw_adapters::{SwarmAdapter, SwarmError};
use rsw_core::{next_run, Clock, Workload};
use tracing::{debug, error, info, warn};

use crate::queue::{JobQueue, PendingJob, Task};

/// Schedules backups from service labels into a time-ordered queue.
///
/// Each scan lists all services, queues a backup at the next cron fire
/// instant for every enabled service that does not already have one
/// queued, and re-arms the next scan.
pub struct Scheduler<S, C> {
    swarm: S,
    clock: C,
    rescan_interval: Duration,
    queue: JobQueue,
}

impl<S, C> Scheduler<S, C>
where
    S: SwarmAdapter,
    C: Clock,
{
    pub fn new(swarm: S, clock: C, rescan_interval: Duration) -> Self {
        Self {
            swarm,
            clock,
            rescan_interval,
            queue: JobQueue::new(),
        }
    }

    /// Refresh the queue from the current service list.
    ///
    /// The next rescan is armed before listing so a failed listing
    /// cannot break the rescan chain.
    pub async fn scan(&mut self) -> Result<(), SwarmError> {
        let now = self.clock.now();
        self.queue.push(now + self.rescan_interval, Task::Rescan);

        let services = self.swarm.list_services().await?;
        for workload in services {
            self.schedule_workload(workload, now);
        }
        Ok(())
    }

    fn schedule_workload(&mut self, workload: Workload, now: DateTime<Utc>) {
        if !workload.backup_enabled() {
            return;
        }
        if self.queue.has_backup_for(&workload.id) {
            debug!(service = %workload.name, "backup already scheduled");
            return;
        }
        let Some(expr) = workload.run_at() else {
            warn!(service = %workload.name, "backup enabled but no schedule label");
            return;
        };

        match next_run(expr, now) {
            Ok(fire_at) => {
                info!(service = %workload.name, at = %fire_at, "scheduling backup");
                self.queue.push(
                    fire_at,
                    Task::Backup {
                        service_id: workload.id,
                        service_name: workload.name,
                    },
                );
            }
            Err(e) => {
                error!(service = %workload.name, error = %e, "invalid backup schedule");
            }
        }
    }

    /// Earliest fire instant in the queue.
    pub fn next_fire_at(&self) -> Option<DateTime<Utc>> {
        self.queue.next_fire_at()
    }

    /// Remove and return every job that is due now.
    pub fn take_due(&mut self) -> Vec<PendingJob> {
        self.queue.take_due(self.clock.now())
    }

    /// Number of queued jobs, rescans included.
    pub fn pending_jobs(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
