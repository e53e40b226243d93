//! Endpoint reconciliation
//!
//! Joins four independently fetched snapshots (running tasks, task
//! definitions, container instances and host addresses) into a mapping of
//! domain name to reachable endpoints. Every pass starts from scratch.
//!
//! Failure policy:
//! - listing or describing tasks, or listing container instances, aborts the pass
//! - a host that cannot be described or resolved is treated as unresolved
//!   and its bindings are skipped
//! - a definition that cannot be fetched leaves its containers without a domain

pub mod mapping;
pub mod ports;

pub use mapping::{format_endpoint, EndpointMapping};
pub use ports::PortAllowList;

use crate::cluster::{ClusterClient, Definition};
use crate::host::AddressResolver;
use crate::Result;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Upper bound on concurrent host lookups within one pass.
const HOST_RESOLUTION_CONCURRENCY: usize = 8;

pub const DEFAULT_DOMAIN_KEY: &str = "DOMAIN";

#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    pub cluster: String,
    pub ports: PortAllowList,
    /// Environment variable that declares the domain a container serves.
    pub domain_key: String,
}

impl ReconcileSettings {
    pub fn new(cluster: impl Into<String>, ports: PortAllowList) -> Self {
        Self {
            cluster: cluster.into(),
            ports,
            domain_key: DEFAULT_DOMAIN_KEY.to_string(),
        }
    }

    pub fn with_domain_key(mut self, key: impl Into<String>) -> Self {
        self.domain_key = key.into();
        self
    }
}

/// Resolved address per container instance ARN. `None` marks a host whose
/// address could not be determined.
type HostAddresses = HashMap<String, Option<String>>;

pub struct Reconciler {
    cluster_client: Arc<dyn ClusterClient>,
    resolver: Arc<dyn AddressResolver>,
    settings: ReconcileSettings,
}

impl Reconciler {
    pub fn new(
        cluster_client: Arc<dyn ClusterClient>,
        resolver: Arc<dyn AddressResolver>,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            cluster_client,
            resolver,
            settings,
        }
    }

    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    /// Run one reconciliation pass.
    ///
    /// Returns an error only for cluster queries that make the whole snapshot
    /// unusable; no partial mapping is returned in that case.
    pub async fn reconcile(&self) -> Result<EndpointMapping> {
        let cluster = self.settings.cluster.as_str();

        let unit_ids = self.cluster_client.list_running_work_units(cluster).await?;
        let units = self
            .cluster_client
            .describe_work_units(cluster, &unit_ids)
            .await?;

        let host_ids = self.cluster_client.list_host_instances(cluster).await?;
        let addresses = self.resolve_host_addresses(&host_ids).await;

        debug!(
            cluster,
            tasks = units.len(),
            hosts = host_ids.len(),
            "Fetched cluster snapshot"
        );

        // Definitions fetched during this pass only.
        let mut definitions: HashMap<String, Definition> = HashMap::new();
        let mut mapping = EndpointMapping::new();

        for unit in &units {
            let address = unit
                .host_instance_id
                .as_deref()
                .and_then(|host| addresses.get(host))
                .and_then(|resolved| resolved.as_deref());

            for container in &unit.containers {
                let domain = match self
                    .container_domain(&mut definitions, &unit.definition_ref, &container.name)
                    .await
                {
                    Some(domain) => domain,
                    None => continue,
                };

                for binding in &container.network_bindings {
                    if !self.settings.ports.contains(binding.container_port) {
                        continue;
                    }

                    let Some(address) = address else {
                        debug!(
                            task = %unit.id,
                            container = %container.name,
                            host_port = binding.host_port,
                            "Skipping binding on unresolved host"
                        );
                        continue;
                    };

                    mapping.push(&domain, format_endpoint(address, binding.host_port));
                }
            }
        }

        info!(
            "Reconciled {} endpoints across {} domains",
            mapping.endpoint_count(),
            mapping.domain_count()
        );

        Ok(mapping)
    }

    async fn resolve_host_addresses(&self, host_ids: &[String]) -> HostAddresses {
        stream::iter(host_ids)
            .map(|id| async move { (id.clone(), self.resolve_host(id).await) })
            .buffered(HOST_RESOLUTION_CONCURRENCY)
            .collect()
            .await
    }

    async fn resolve_host(&self, host_id: &str) -> Option<String> {
        let host = match self
            .cluster_client
            .describe_host_instance(&self.settings.cluster, host_id)
            .await
        {
            Ok(host) => host,
            Err(e) => {
                warn!(host_instance = %host_id, "Could not describe host instance: {}", e);
                return None;
            }
        };

        let Some(compute_id) = host.compute_resource_id else {
            warn!(host_instance = %host_id, "Host instance has no compute resource");
            return None;
        };

        match self.resolver.resolve_public_address(&compute_id).await {
            Ok(Some(address)) => Some(address),
            Ok(None) => {
                warn!(
                    host_instance = %host_id,
                    compute_resource = %compute_id,
                    "Host has no public address"
                );
                None
            }
            Err(e) => {
                warn!(host_instance = %host_id, "{}", e);
                None
            }
        }
    }

    /// Domain declared by a container through its definition's environment.
    async fn container_domain(
        &self,
        definitions: &mut HashMap<String, Definition>,
        definition_ref: &str,
        container: &str,
    ) -> Option<String> {
        if !definitions.contains_key(definition_ref) {
            match self.cluster_client.describe_definition(definition_ref).await {
                Ok(definition) => {
                    definitions.insert(definition_ref.to_string(), definition);
                }
                Err(e) => {
                    warn!(container, "{}", e);
                    return None;
                }
            }
        }

        definitions
            .get(definition_ref)?
            .container_env(container, &self.settings.domain_key)
            .filter(|domain| !domain.is_empty())
            .map(str::to_string)
    }
}
