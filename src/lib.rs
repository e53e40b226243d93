pub mod agent;
pub mod cli;
pub mod cluster;
pub mod error;
pub mod host;
pub mod metrics;
pub mod publish;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{DiscoveryError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
