// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::{Duration, Instant};

use rsw_core::Workload;

use super::*;

#[tokio::test]
async fn records_calls_in_order() {
    let swarm = FakeSwarmAdapter::new();
    let svc = Workload::new("svc-1", "db");
    swarm.add_service(svc.clone());

    swarm.list_services().await.unwrap();
    swarm.find_service("svc-1").await.unwrap();
    swarm
        .exec_in_service(&svc, "echo hi", ExecScope::OneTask)
        .await
        .unwrap();

    assert_eq!(
        swarm.calls(),
        vec![
            SwarmCall::ListServices,
            SwarmCall::FindService { id: "svc-1".to_string() },
            SwarmCall::Exec {
                service: "db".to_string(),
                command: "echo hi".to_string(),
                scope: ExecScope::OneTask,
            },
        ]
    );
}

#[tokio::test]
async fn add_service_replaces_existing_id() {
    let swarm = FakeSwarmAdapter::new();
    swarm.add_service(Workload::new("svc-1", "db"));
    swarm.add_service(Workload::new("svc-1", "db-renamed"));

    let services = swarm.list_services().await.unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].name, "db-renamed");
}

#[tokio::test]
async fn find_service_missing_returns_none() {
    let swarm = FakeSwarmAdapter::new();
    assert!(swarm.find_service("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn removed_service_is_gone() {
    let swarm = FakeSwarmAdapter::new();
    swarm.add_service(Workload::new("svc-1", "db"));
    swarm.remove_service("svc-1");

    assert!(swarm.list_services().await.unwrap().is_empty());
    assert!(swarm.find_service("svc-1").await.unwrap().is_none());
}

#[tokio::test]
async fn fail_list_affects_list_and_find() {
    let swarm = FakeSwarmAdapter::new();
    swarm.set_fail_list(true);

    assert!(matches!(
        swarm.list_services().await,
        Err(SwarmError::Api(_))
    ));
    assert!(matches!(
        swarm.find_service("svc-1").await,
        Err(SwarmError::Api(_))
    ));
}

#[tokio::test]
async fn exec_failure_knobs() {
    let swarm = FakeSwarmAdapter::new();
    let svc = Workload::new("svc-1", "db");

    swarm.set_no_running_tasks(true);
    let err = swarm
        .exec_in_service(&svc, "true", ExecScope::OneTask)
        .await
        .unwrap_err();
    assert!(matches!(err, SwarmError::NoRunningTasks(name) if name == "db"));

    swarm.set_no_running_tasks(false);
    swarm.set_fail_exec(true);
    let err = swarm
        .exec_in_service(&svc, "true", ExecScope::AllTasks)
        .await
        .unwrap_err();
    assert!(matches!(err, SwarmError::ExecFailed { code: 1, .. }));
}

#[tokio::test]
async fn exec_delay_applies() {
    let swarm = FakeSwarmAdapter::new();
    let svc = Workload::new("svc-1", "db");
    swarm.set_exec_delay(Duration::from_millis(20));

    let start = Instant::now();
    swarm
        .exec_in_service(&svc, "true", ExecScope::OneTask)
        .await
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(20));
}
