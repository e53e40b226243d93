use crate::host::AddressResolver;
use crate::{DiscoveryError, Result};
use async_trait::async_trait;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::Client;
use tracing::debug;

pub struct Ec2AddressResolver {
    client: Client,
}

impl Ec2AddressResolver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl AddressResolver for Ec2AddressResolver {
    async fn resolve_public_address(&self, compute_resource_id: &str) -> Result<Option<String>> {
        let output = self
            .client
            .describe_instances()
            .instance_ids(compute_resource_id)
            .send()
            .await
            .map_err(|e| {
                DiscoveryError::AddressResolutionError(format!(
                    "Failed to describe EC2 instance {}: {}",
                    compute_resource_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        let instance = output
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .next()
            .ok_or_else(|| {
                DiscoveryError::AddressResolutionError(format!(
                    "EC2 instance {} not found",
                    compute_resource_id
                ))
            })?;

        let address = instance
            .public_ip_address()
            .filter(|ip| !ip.is_empty())
            .map(str::to_string);

        debug!(
            "Resolved EC2 instance {} to {:?}",
            compute_resource_id, address
        );

        Ok(address)
    }
}
