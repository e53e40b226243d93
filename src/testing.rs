//! In-memory collaborators for unit tests.

use crate::cluster::{
    ClusterClient, ContainerDefinition, ContainerInstance, Definition, HostInstance,
    NetworkBinding, WorkUnit,
};
use crate::host::AddressResolver;
use crate::publish::Publisher;
use crate::reconcile::EndpointMapping;
use crate::{DiscoveryError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn unit(
    id: &str,
    definition_ref: &str,
    host: Option<&str>,
    containers: Vec<ContainerInstance>,
) -> WorkUnit {
    WorkUnit {
        id: id.to_string(),
        definition_ref: definition_ref.to_string(),
        host_instance_id: host.map(str::to_string),
        containers,
    }
}

pub fn container(name: &str, bindings: &[(u16, u16)]) -> ContainerInstance {
    ContainerInstance {
        name: name.to_string(),
        network_bindings: bindings
            .iter()
            .map(|&(container_port, host_port)| NetworkBinding::new(container_port, host_port))
            .collect(),
    }
}

#[derive(Default)]
pub struct FakeCluster {
    pub units: Vec<WorkUnit>,
    /// Container instance ARN and its description.
    pub hosts: Vec<(String, HostInstance)>,
    pub definitions: HashMap<String, Definition>,
    pub fail_list_work_units: bool,
    pub fail_describe_work_units: bool,
    pub fail_list_hosts: bool,
    pub failing_hosts: HashSet<String>,
    pub definition_calls: AtomicUsize,
}

impl FakeCluster {
    pub fn with_unit(mut self, unit: WorkUnit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn with_host(mut self, id: &str, compute_resource_id: &str) -> Self {
        self.hosts.push((
            id.to_string(),
            HostInstance {
                compute_resource_id: Some(compute_resource_id.to_string()),
            },
        ));
        self
    }

    /// Add a container definition, creating the task definition on first use.
    pub fn with_definition(mut self, definition_ref: &str, container: &str, env: &[(&str, &str)]) -> Self {
        self.definitions
            .entry(definition_ref.to_string())
            .or_default()
            .container_definitions
            .push(ContainerDefinition {
                name: container.to_string(),
                environment: env
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            });
        self
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn list_running_work_units(&self, cluster: &str) -> Result<Vec<String>> {
        if self.fail_list_work_units {
            return Err(DiscoveryError::ClusterQueryError(format!(
                "ListTasks denied for {}",
                cluster
            )));
        }
        Ok(self.units.iter().map(|u| u.id.clone()).collect())
    }

    async fn describe_work_units(&self, _cluster: &str, ids: &[String]) -> Result<Vec<WorkUnit>> {
        if self.fail_describe_work_units {
            return Err(DiscoveryError::ClusterQueryError(
                "DescribeTasks throttled".to_string(),
            ));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.units.iter().find(|u| &u.id == id).cloned())
            .collect())
    }

    async fn list_host_instances(&self, _cluster: &str) -> Result<Vec<String>> {
        if self.fail_list_hosts {
            return Err(DiscoveryError::ClusterQueryError(
                "ListContainerInstances denied".to_string(),
            ));
        }
        Ok(self.hosts.iter().map(|(host_id, _)| host_id.clone()).collect())
    }

    async fn describe_host_instance(&self, cluster: &str, id: &str) -> Result<HostInstance> {
        if self.failing_hosts.contains(id) {
            return Err(DiscoveryError::ClusterQueryError(format!(
                "DescribeContainerInstances failed for {}",
                id
            )));
        }
        self.hosts
            .iter()
            .find(|(host_id, _)| host_id == id)
            .map(|(_, host)| host.clone())
            .ok_or_else(|| DiscoveryError::HostInstanceNotFound {
                id: id.to_string(),
                cluster: cluster.to_string(),
            })
    }

    async fn describe_definition(&self, definition_ref: &str) -> Result<Definition> {
        self.definition_calls.fetch_add(1, Ordering::SeqCst);
        self.definitions.get(definition_ref).cloned().ok_or_else(|| {
            DiscoveryError::DefinitionLookupError(format!("{} not found", definition_ref))
        })
    }
}

/// Resolver backed by a fixed table. Unknown ids fail resolution.
#[derive(Default)]
pub struct FakeResolver {
    pub addresses: HashMap<String, Option<String>>,
    pub calls: AtomicUsize,
}

impl FakeResolver {
    pub fn with_address(mut self, compute_resource_id: &str, address: &str) -> Self {
        self.addresses
            .insert(compute_resource_id.to_string(), Some(address.to_string()));
        self
    }

    pub fn without_address(mut self, compute_resource_id: &str) -> Self {
        self.addresses.insert(compute_resource_id.to_string(), None);
        self
    }
}

#[async_trait]
impl AddressResolver for FakeResolver {
    async fn resolve_public_address(&self, compute_resource_id: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.addresses
            .get(compute_resource_id)
            .cloned()
            .ok_or_else(|| {
                DiscoveryError::AddressResolutionError(format!(
                    "instance {} not found",
                    compute_resource_id
                ))
            })
    }
}

/// Publisher that records every mapping it is handed.
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<EndpointMapping>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.published.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, mapping: &EndpointMapping) -> Result<()> {
        if let Ok(mut published) = self.published.lock() {
            published.push(mapping.clone());
        }
        if self.fail {
            return Err(DiscoveryError::PublishError(
                "registry unavailable".to_string(),
            ));
        }
        Ok(())
    }
}
