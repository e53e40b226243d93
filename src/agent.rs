//! Discovery agent
//!
//! Runs a reconcile-then-publish pass on a fixed cadence. Each pass runs to
//! completion before the next tick is awaited, so passes never overlap; a
//! pass that outlasts the interval delays the schedule instead of stacking.

use crate::metrics::MetricsCollector;
use crate::publish::Publisher;
use crate::reconcile::Reconciler;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);

/// Result of one pass. Failures are logged and counted, never propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Published { domains: usize, endpoints: usize },
    ReconcileFailed,
    PublishFailed { domains: usize, endpoints: usize },
}

pub struct Agent {
    reconciler: Reconciler,
    publisher: Arc<dyn Publisher>,
    metrics: MetricsCollector,
    interval: Duration,
}

impl Agent {
    pub fn new(reconciler: Reconciler, publisher: Arc<dyn Publisher>, interval: Duration) -> Self {
        Self {
            reconciler,
            publisher,
            metrics: MetricsCollector::new(),
            interval,
        }
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Reconcile the cluster and push the result to the registry.
    pub async fn run_pass(&self) -> PassOutcome {
        info!(
            cluster = %self.reconciler.settings().cluster,
            "Starting discovery pass"
        );

        let outcome = match self.reconciler.reconcile().await {
            Err(e) => {
                warn!(stage = "reconcile", "{}", e);
                PassOutcome::ReconcileFailed
            }
            Ok(mapping) => {
                let domains = mapping.domain_count();
                let endpoints = mapping.endpoint_count();

                match self.publisher.publish(&mapping).await {
                    Ok(()) => {
                        info!(stage = "push", "Successfully pushed data to registry");
                        PassOutcome::Published { domains, endpoints }
                    }
                    Err(e) => {
                        warn!(stage = "push", "{}", e);
                        PassOutcome::PublishFailed { domains, endpoints }
                    }
                }
            }
        };

        self.metrics.record(&outcome).await;

        let metrics = self.metrics.get_metrics().await;
        debug!(
            passes = metrics.passes_total,
            publishes = metrics.publishes_total,
            reconcile_failures = metrics.reconcile_failures_total,
            publish_failures = metrics.publish_failures_total,
            "Pass complete"
        );

        outcome
    }

    /// Run passes until `shutdown` resolves.
    ///
    /// The first pass starts immediately. Shutdown is observed between passes;
    /// an in-flight pass is never cancelled.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            cluster = %self.reconciler.settings().cluster,
            ports = %self.reconciler.settings().ports,
            "Starting discovery every {:?}",
            self.interval
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_pass().await;
                }
            }
        }
    }
}
