//! ECS-backed cluster client.
//!
//! Translates the SDK's optional-everywhere shapes into the crate's data
//! model. Listing calls follow `nextToken` so large clusters are not
//! silently truncated.

use crate::cluster::client::ClusterClient;
use crate::cluster::types::{
    ContainerDefinition, ContainerInstance, Definition, HostInstance, NetworkBinding, WorkUnit,
};
use crate::{DiscoveryError, Result};
use async_trait::async_trait;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types::{self as ecs, DesiredStatus};
use aws_sdk_ecs::Client;
use tracing::{debug, warn};

/// DescribeTasks accepts at most this many task ARNs per call.
const DESCRIBE_TASKS_BATCH: usize = 100;

pub struct EcsClusterClient {
    client: Client,
}

impl EcsClusterClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl ClusterClient for EcsClusterClient {
    async fn list_running_work_units(&self, cluster: &str) -> Result<Vec<String>> {
        let mut arns = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_tasks()
                .cluster(cluster)
                .desired_status(DesiredStatus::Running)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    DiscoveryError::ClusterQueryError(format!(
                        "Failed to list tasks in cluster {}: {}",
                        cluster,
                        DisplayErrorContext(&e)
                    ))
                })?;

            arns.extend(page.task_arns().iter().cloned());

            match page.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!("Listed {} running tasks in cluster {}", arns.len(), cluster);
        Ok(arns)
    }

    async fn describe_work_units(&self, cluster: &str, ids: &[String]) -> Result<Vec<WorkUnit>> {
        let mut units = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(DESCRIBE_TASKS_BATCH) {
            let output = self
                .client
                .describe_tasks()
                .cluster(cluster)
                .set_tasks(Some(chunk.to_vec()))
                .send()
                .await
                .map_err(|e| {
                    DiscoveryError::ClusterQueryError(format!(
                        "Failed to describe tasks in cluster {}: {}",
                        cluster,
                        DisplayErrorContext(&e)
                    ))
                })?;

            for failure in output.failures() {
                warn!(
                    "DescribeTasks failure for {}: {}",
                    failure.arn().unwrap_or("unknown"),
                    failure.reason().unwrap_or("no reason given")
                );
            }

            units.extend(output.tasks().iter().filter_map(work_unit_from_task));
        }

        Ok(units)
    }

    async fn list_host_instances(&self, cluster: &str) -> Result<Vec<String>> {
        let mut arns = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_container_instances()
                .cluster(cluster)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    DiscoveryError::ClusterQueryError(format!(
                        "Failed to list container instances in cluster {}: {}",
                        cluster,
                        DisplayErrorContext(&e)
                    ))
                })?;

            arns.extend(page.container_instance_arns().iter().cloned());

            match page.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(arns)
    }

    async fn describe_host_instance(&self, cluster: &str, id: &str) -> Result<HostInstance> {
        let output = self
            .client
            .describe_container_instances()
            .cluster(cluster)
            .container_instances(id)
            .send()
            .await
            .map_err(|e| {
                DiscoveryError::ClusterQueryError(format!(
                    "Failed to describe container instance {}: {}",
                    id,
                    DisplayErrorContext(&e)
                ))
            })?;

        let instance = output.container_instances().first().ok_or_else(|| {
            DiscoveryError::HostInstanceNotFound {
                id: id.to_string(),
                cluster: cluster.to_string(),
            }
        })?;

        Ok(HostInstance {
            compute_resource_id: instance.ec2_instance_id().map(str::to_string),
        })
    }

    async fn describe_definition(&self, definition_ref: &str) -> Result<Definition> {
        let output = self
            .client
            .describe_task_definition()
            .task_definition(definition_ref)
            .send()
            .await
            .map_err(|e| {
                DiscoveryError::DefinitionLookupError(format!(
                    "Failed to describe task definition {}: {}",
                    definition_ref,
                    DisplayErrorContext(&e)
                ))
            })?;

        output
            .task_definition()
            .map(definition_from_ecs)
            .ok_or_else(|| {
                DiscoveryError::DefinitionLookupError(format!(
                    "Task definition {} missing from response",
                    definition_ref
                ))
            })
    }
}

fn work_unit_from_task(task: &ecs::Task) -> Option<WorkUnit> {
    let id = task.task_arn()?.to_string();
    let definition_ref = match task.task_definition_arn() {
        Some(arn) => arn.to_string(),
        None => {
            debug!("Task {} has no task definition ARN, ignoring", id);
            return None;
        }
    };

    let containers = task
        .containers()
        .iter()
        .filter_map(|c| {
            let name = c.name()?.to_string();
            let network_bindings = c
                .network_bindings()
                .iter()
                .filter_map(network_binding_from_ecs)
                .collect();
            Some(ContainerInstance {
                name,
                network_bindings,
            })
        })
        .collect();

    Some(WorkUnit {
        id,
        definition_ref,
        host_instance_id: task.container_instance_arn().map(str::to_string),
        containers,
    })
}

fn network_binding_from_ecs(binding: &ecs::NetworkBinding) -> Option<NetworkBinding> {
    let container_port = u16::try_from(binding.container_port()?).ok()?;
    let host_port = u16::try_from(binding.host_port()?).ok()?;
    Some(NetworkBinding::new(container_port, host_port))
}

fn definition_from_ecs(definition: &ecs::TaskDefinition) -> Definition {
    let container_definitions = definition
        .container_definitions()
        .iter()
        .map(|c| {
            // First declaration wins when a key is repeated.
            let mut environment = std::collections::HashMap::new();
            for pair in c.environment() {
                if let (Some(name), Some(value)) = (pair.name(), pair.value()) {
                    environment
                        .entry(name.to_string())
                        .or_insert_with(|| value.to_string());
                }
            }
            ContainerDefinition {
                name: c.name().unwrap_or_default().to_string(),
                environment,
            }
        })
        .collect();

    Definition {
        container_definitions,
    }
}
