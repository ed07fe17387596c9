// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-ordered job queue

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use chrono::{DateTime, Utc};

/// Work carried by a queue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Re-list services and refresh the schedule.
    Rescan,
    /// Run one backup of a service.
    Backup {
        service_id: String,
        service_name: String,
    },
}

/// A queued task with its fire instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJob {
    pub fire_at: DateTime<Utc>,
    pub task: Task,
    seq: u64,
}

// BinaryHeap is a max-heap, so the ordering is reversed to pop the
// earliest fire instant first. Ties fire in insertion order.
impl Ord for PendingJob {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PendingJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Queue of pending jobs keyed on fire instant.
#[derive(Default)]
pub struct JobQueue {
    heap: BinaryHeap<PendingJob>,
    next_seq: u64,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fire_at: DateTime<Utc>, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(PendingJob { fire_at, task, seq });
    }

    /// Whether a backup of the given service is already queued.
    pub fn has_backup_for(&self, service_id: &str) -> bool {
        self.heap.iter().any(|job| {
            matches!(&job.task, Task::Backup { service_id: id, .. } if id == service_id)
        })
    }

    /// Earliest fire instant in the queue.
    pub fn next_fire_at(&self) -> Option<DateTime<Utc>> {
        self.heap.peek().map(|job| job.fire_at)
    }

    /// Remove and return every job due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<PendingJob> {
        let mut due = Vec::new();
        while let Some(job) = self.heap.peek() {
            if job.fire_at > now {
                break;
            }
            if let Some(job) = self.heap.pop() {
                due.push(job);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
