//! Publishing reconciled endpoints to the registry
//!
//! The registry receives the complete set of backends on every push; it
//! replaces whatever it held for this source before.

pub mod registry;

pub use registry::RegistryPublisher;

use crate::reconcile::EndpointMapping;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Source type reported with every backend record.
pub const BACKEND_TYPE: &str = "ecs";

/// One domain's worth of endpoints in the registry's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backend {
    #[serde(rename = "type")]
    pub kind: String,
    pub domain: String,
    pub list: Vec<String>,
}

/// Convert a mapping into backend records, ordered by domain.
pub fn backends(mapping: &EndpointMapping) -> Vec<Backend> {
    mapping
        .iter()
        .map(|(domain, endpoints)| Backend {
            kind: BACKEND_TYPE.to_string(),
            domain: domain.to_string(),
            list: endpoints.to_vec(),
        })
        .collect()
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, mapping: &EndpointMapping) -> Result<()>;
}
