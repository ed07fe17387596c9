// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Duration, TimeZone, Utc};
use rsw_adapters::FakeSwarmAdapter;
use rsw_core::workload::{LABEL_BACKUP, LABEL_RUN_AT};
use rsw_core::{FakeClock, Workload};

use super::*;

fn rescan_interval() -> Duration {
    Duration::seconds(10)
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).single().unwrap()
}

fn enabled_service(id: &str, name: &str, run_at: &str) -> Workload {
    Workload::new(id, name)
        .with_label(LABEL_BACKUP, "true")
        .with_label(LABEL_RUN_AT, run_at)
}

fn setup(clock: &FakeClock) -> (FakeSwarmAdapter, Scheduler<FakeSwarmAdapter, FakeClock>) {
    let swarm = FakeSwarmAdapter::new();
    let scheduler = Scheduler::new(swarm.clone(), clock.clone(), rescan_interval());
    (swarm, scheduler)
}

fn backup_ids(jobs: &[PendingJob]) -> Vec<String> {
    jobs.iter()
        .filter_map(|job| match &job.task {
            Task::Backup { service_id, .. } => Some(service_id.clone()),
            Task::Rescan => None,
        })
        .collect()
}

#[tokio::test]
async fn scan_queues_backup_at_next_cron_instant() {
    let clock = FakeClock::new();
    clock.set(base_time());
    let (swarm, mut scheduler) = setup(&clock);
    swarm.add_service(enabled_service("svc-1", "db", "0 3 * * *"));

    scheduler.scan().await.unwrap();

    // One backup at 03:00 plus the re-armed rescan at now + 10s.
    assert_eq!(scheduler.pending_jobs(), 2);
    assert_eq!(
        scheduler.next_fire_at(),
        Some(base_time() + rescan_interval())
    );

    clock.set(Utc.with_ymd_and_hms(2024, 2, 1, 3, 0, 0).single().unwrap());
    let due = scheduler.take_due();
    let job = due
        .iter()
        .find(|job| matches!(&job.task, Task::Backup { .. }))
        .unwrap();
    assert_eq!(
        job.fire_at,
        Utc.with_ymd_and_hms(2024, 2, 1, 3, 0, 0).single().unwrap()
    );
    assert_eq!(
        job.task,
        Task::Backup {
            service_id: "svc-1".to_string(),
            service_name: "db".to_string(),
        }
    );
}

#[tokio::test]
async fn scan_skips_disabled_and_unlabeled_services() {
    let clock = FakeClock::new();
    clock.set(base_time());
    let (swarm, mut scheduler) = setup(&clock);
    swarm.add_service(Workload::new("svc-1", "plain"));
    swarm.add_service(
        Workload::new("svc-2", "off")
            .with_label(LABEL_BACKUP, "false")
            .with_label(LABEL_RUN_AT, "0 3 * * *"),
    );

    scheduler.scan().await.unwrap();

    // Only the re-armed rescan is queued.
    assert_eq!(scheduler.pending_jobs(), 1);
    clock.advance(rescan_interval());
    let due = scheduler.take_due();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].task, Task::Rescan);
}

#[tokio::test]
async fn rescan_does_not_duplicate_queued_backup() {
    let clock = FakeClock::new();
    clock.set(base_time());
    let (swarm, mut scheduler) = setup(&clock);
    swarm.add_service(enabled_service("svc-1", "db", "0 3 * * *"));

    scheduler.scan().await.unwrap();
    clock.advance(rescan_interval());
    scheduler.scan().await.unwrap();

    clock.set(Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).single().unwrap());
    assert_eq!(backup_ids(&scheduler.take_due()), vec!["svc-1"]);
}

#[tokio::test]
async fn invalid_cron_is_skipped_without_failing_scan() {
    let clock = FakeClock::new();
    clock.set(base_time());
    let (swarm, mut scheduler) = setup(&clock);
    swarm.add_service(enabled_service("svc-1", "bad", "not a cron line"));
    swarm.add_service(enabled_service("svc-2", "good", "30 4 * * *"));

    scheduler.scan().await.unwrap();

    clock.set(Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).single().unwrap());
    assert_eq!(backup_ids(&scheduler.take_due()), vec!["svc-2"]);
}

#[tokio::test]
async fn enabled_service_without_schedule_is_skipped() {
    let clock = FakeClock::new();
    clock.set(base_time());
    let (swarm, mut scheduler) = setup(&clock);
    swarm.add_service(Workload::new("svc-1", "db").with_label(LABEL_BACKUP, "true"));

    scheduler.scan().await.unwrap();

    assert_eq!(scheduler.pending_jobs(), 1);
}

#[tokio::test]
async fn failed_listing_still_rearms_rescan() {
    let clock = FakeClock::new();
    clock.set(base_time());
    let (swarm, mut scheduler) = setup(&clock);
    swarm.set_fail_list(true);

    assert!(scheduler.scan().await.is_err());

    clock.advance(rescan_interval());
    let due = scheduler.take_due();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].task, Task::Rescan);
}

#[tokio::test]
async fn services_listed_together_fire_in_listing_order() {
    let clock = FakeClock::new();
    clock.set(base_time());
    let (swarm, mut scheduler) = setup(&clock);
    swarm.add_service(enabled_service("svc-1", "first", "0 3 * * *"));
    swarm.add_service(enabled_service("svc-2", "second", "0 3 * * *"));

    scheduler.scan().await.unwrap();

    clock.set(Utc.with_ymd_and_hms(2024, 2, 1, 3, 0, 0).single().unwrap());
    assert_eq!(backup_ids(&scheduler.take_due()), vec!["svc-1", "svc-2"]);
}
