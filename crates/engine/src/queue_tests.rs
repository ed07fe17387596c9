// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, TimeZone, Utc};

use super::*;

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, h, m, 0).single().unwrap()
}

fn backup(id: &str) -> Task {
    Task::Backup {
        service_id: id.to_string(),
        service_name: format!("svc-{id}"),
    }
}

#[test]
fn pops_in_fire_order() {
    let mut queue = JobQueue::new();
    queue.push(at(12, 0), backup("c"));
    queue.push(at(10, 0), backup("a"));
    queue.push(at(11, 0), backup("b"));

    let due = queue.take_due(at(13, 0));
    let ids: Vec<_> = due
        .iter()
        .filter_map(|job| match &job.task {
            Task::Backup { service_id, .. } => Some(service_id.as_str()),
            Task::Rescan => None,
        })
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(queue.is_empty());
}

#[test]
fn ties_fire_in_insertion_order() {
    let mut queue = JobQueue::new();
    queue.push(at(10, 0), backup("first"));
    queue.push(at(10, 0), backup("second"));
    queue.push(at(10, 0), Task::Rescan);

    let due = queue.take_due(at(10, 0));
    assert_eq!(due.len(), 3);
    assert_eq!(due[0].task, backup("first"));
    assert_eq!(due[1].task, backup("second"));
    assert_eq!(due[2].task, Task::Rescan);
}

#[test]
fn take_due_includes_exact_instant_only() {
    let mut queue = JobQueue::new();
    queue.push(at(10, 0), backup("due"));
    queue.push(at(10, 1), backup("later"));

    let due = queue.take_due(at(10, 0));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].task, backup("due"));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.next_fire_at(), Some(at(10, 1)));
}

#[test]
fn has_backup_for_ignores_rescans() {
    let mut queue = JobQueue::new();
    queue.push(at(10, 0), Task::Rescan);
    assert!(!queue.has_backup_for("a"));

    queue.push(at(11, 0), backup("a"));
    assert!(queue.has_backup_for("a"));
    assert!(!queue.has_backup_for("b"));
}

#[test]
fn next_fire_at_tracks_earliest() {
    let mut queue = JobQueue::new();
    assert_eq!(queue.next_fire_at(), None);

    queue.push(at(12, 0), Task::Rescan);
    queue.push(at(9, 30), backup("a"));
    assert_eq!(queue.next_fire_at(), Some(at(9, 30)));
}
