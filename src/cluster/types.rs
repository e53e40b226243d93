use std::collections::HashMap;

/// A running task in the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub id: String,
    pub definition_ref: String,
    /// Container instance the task was placed on. Tasks without one (Fargate)
    /// have no host address to publish.
    pub host_instance_id: Option<String>,
    pub containers: Vec<ContainerInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInstance {
    pub name: String,
    pub network_bindings: Vec<NetworkBinding>,
}

/// Runtime pairing of a container port with the host port allocated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkBinding {
    pub container_port: u16,
    pub host_port: u16,
}

impl NetworkBinding {
    pub fn new(container_port: u16, host_port: u16) -> Self {
        Self {
            container_port,
            host_port,
        }
    }
}

/// Task definition a work unit was started from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definition {
    pub container_definitions: Vec<ContainerDefinition>,
}

impl Definition {
    /// Look up an environment variable declared for the named container.
    ///
    /// Returns `None` when the container is not part of the definition or the
    /// key is not set for it.
    pub fn container_env(&self, container: &str, key: &str) -> Option<&str> {
        self.container_definitions
            .iter()
            .find(|c| c.name == container)
            .and_then(|c| c.environment.get(key))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDefinition {
    pub name: String,
    pub environment: HashMap<String, String>,
}

/// A compute node registered with the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInstance {
    pub compute_resource_id: Option<String>,
}
