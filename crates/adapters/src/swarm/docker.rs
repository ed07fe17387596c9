// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Docker-backed Swarm adapter

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::exec::{CreateExecOptions, StartExecResults};
use bollard::service::{InspectServiceOptions, ListServicesOptions};
use bollard::task::ListTasksOptions;
use bollard::Docker;
use futures::StreamExt;
use rsw_core::Workload;
use tracing::info;

use super::{ExecScope, SwarmAdapter, SwarmError};

/// Swarm adapter backed by the local Docker API
#[derive(Clone)]
pub struct DockerSwarmAdapter {
    docker: Docker,
}

impl DockerSwarmAdapter {
    /// Connect with the standard environment/socket defaults.
    pub fn connect() -> Result<Self, SwarmError> {
        let docker = Docker::connect_with_local_defaults().map_err(api_err)?;
        Ok(Self { docker })
    }

    /// Container IDs of the service's running tasks.
    async fn running_containers(&self, workload: &Workload) -> Result<Vec<String>, SwarmError> {
        let filters = HashMap::from([
            ("service".to_string(), vec![workload.id.clone()]),
            ("desired-state".to_string(), vec!["running".to_string()]),
        ]);
        let tasks = self
            .docker
            .list_tasks(Some(ListTasksOptions::<String> {
                filters,
                ..Default::default()
            }))
            .await
            .map_err(api_err)?;

        Ok(tasks
            .into_iter()
            .filter_map(|task| task.status)
            .filter_map(|status| status.container_status)
            .filter_map(|container| container.container_id)
            .collect())
    }

    async fn exec_in_container(
        &self,
        workload: &Workload,
        container_id: &str,
        command: &str,
    ) -> Result<(), SwarmError> {
        let exec = self
            .docker
            .create_exec(
                container_id,
                CreateExecOptions {
                    cmd: Some(vec!["sh", "-c", command]),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    ..Default::default()
                },
            )
            .await
            .map_err(api_err)?;

        let started = self.docker.start_exec(&exec.id, None).await.map_err(api_err)?;
        if let StartExecResults::Attached { mut output, .. } = started {
            let mut combined = String::new();
            while let Some(chunk) = output.next().await {
                combined.push_str(&chunk.map_err(api_err)?.to_string());
            }
            if !combined.trim().is_empty() {
                info!(service = %workload.name, "command output:\n{}", combined);
            }
        }

        let inspect = self.docker.inspect_exec(&exec.id).await.map_err(api_err)?;
        match inspect.exit_code {
            Some(0) | None => Ok(()),
            Some(code) => Err(SwarmError::ExecFailed {
                service: workload.name.clone(),
                code,
            }),
        }
    }
}

fn api_err(e: bollard::errors::Error) -> SwarmError {
    SwarmError::Api(e.to_string())
}

fn workload_from_service(service: bollard::models::Service) -> Option<Workload> {
    let id = service.id?;
    let spec = service.spec.unwrap_or_default();
    let name = spec.name.unwrap_or_else(|| id.clone());
    let labels = spec.labels.unwrap_or_default();
    Some(Workload { id, name, labels })
}

#[async_trait]
impl SwarmAdapter for DockerSwarmAdapter {
    async fn list_services(&self) -> Result<Vec<Workload>, SwarmError> {
        let services = self
            .docker
            .list_services(Some(ListServicesOptions::<String>::default()))
            .await
            .map_err(api_err)?;

        Ok(services
            .into_iter()
            .filter_map(workload_from_service)
            .collect())
    }

    async fn find_service(&self, id: &str) -> Result<Option<Workload>, SwarmError> {
        match self
            .docker
            .inspect_service(id, None::<InspectServiceOptions>)
            .await
        {
            Ok(service) => Ok(workload_from_service(service)),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(None),
            Err(e) => Err(api_err(e)),
        }
    }

    async fn exec_in_service(
        &self,
        workload: &Workload,
        command: &str,
        scope: ExecScope,
    ) -> Result<(), SwarmError> {
        info!(service = %workload.name, %command, "running command in service");
        let containers = self.running_containers(workload).await?;

        if containers.is_empty() {
            return Err(SwarmError::NoRunningTasks(workload.name.clone()));
        }

        match scope {
            ExecScope::OneTask => {
                if containers.len() > 1 {
                    info!(
                        service = %workload.name,
                        tasks = containers.len(),
                        "service has multiple running tasks, running the command in only one"
                    );
                }
                self.exec_in_container(workload, &containers[0], command).await
            }
            ExecScope::AllTasks => {
                for container in &containers {
                    self.exec_in_container(workload, container, command).await?;
                }
                Ok(())
            }
        }
    }
}
