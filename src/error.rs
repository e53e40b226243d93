use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Cluster query failed: {0}")]
    ClusterQueryError(String),

    #[error("Host instance not found: {id} in cluster {cluster}")]
    HostInstanceNotFound { id: String, cluster: String },

    #[error("Address resolution failed: {0}")]
    AddressResolutionError(String),

    #[error("Definition lookup failed: {0}")]
    DefinitionLookupError(String),

    #[error("Publish failed: {0}")]
    PublishError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
