pub mod client;
pub mod ecs;
pub mod types;

pub use client::ClusterClient;
pub use ecs::EcsClusterClient;
pub use types::{
    ContainerDefinition, ContainerInstance, Definition, HostInstance, NetworkBinding, WorkUnit,
};
