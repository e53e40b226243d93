use crate::cluster::types::{Definition, HostInstance, WorkUnit};
use crate::Result;
use async_trait::async_trait;

/// Read-only queries against the orchestrator API.
///
/// Implementations carry no business logic; the reconciler decides which
/// failures abort a pass.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn list_running_work_units(&self, cluster: &str) -> Result<Vec<String>>;

    async fn describe_work_units(&self, cluster: &str, ids: &[String]) -> Result<Vec<WorkUnit>>;

    async fn list_host_instances(&self, cluster: &str) -> Result<Vec<String>>;

    async fn describe_host_instance(&self, cluster: &str, id: &str) -> Result<HostInstance>;

    async fn describe_definition(&self, definition_ref: &str) -> Result<Definition>;
}
