//! Host address resolution
//!
//! Maps the compute resource behind a container instance to the address
//! clients reach it on.

pub mod ec2;

pub use ec2::Ec2AddressResolver;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolve the public address of a compute resource.
    ///
    /// `Ok(None)` means the resource exists but has no public address.
    async fn resolve_public_address(&self, compute_resource_id: &str) -> Result<Option<String>>;
}
