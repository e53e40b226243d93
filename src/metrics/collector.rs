use crate::agent::PassOutcome;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassMetrics {
    pub passes_total: u64,
    pub publishes_total: u64,
    pub reconcile_failures_total: u64,
    pub publish_failures_total: u64,
    /// Counts from the most recent successful reconciliation.
    pub last_domains: usize,
    pub last_endpoints: usize,
}

#[derive(Clone)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<PassMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(RwLock::new(PassMetrics::default())),
        }
    }

    pub async fn record(&self, outcome: &PassOutcome) {
        let mut metrics = self.metrics.write().await;
        metrics.passes_total += 1;

        match outcome {
            PassOutcome::Published { domains, endpoints } => {
                metrics.publishes_total += 1;
                metrics.last_domains = *domains;
                metrics.last_endpoints = *endpoints;
            }
            PassOutcome::ReconcileFailed => {
                metrics.reconcile_failures_total += 1;
            }
            PassOutcome::PublishFailed { domains, endpoints } => {
                metrics.publish_failures_total += 1;
                metrics.last_domains = *domains;
                metrics.last_endpoints = *endpoints;
            }
        }
    }

    pub async fn get_metrics(&self) -> PassMetrics {
        self.metrics.read().await.clone()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
