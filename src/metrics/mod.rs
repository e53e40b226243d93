pub mod collector;

pub use collector::{MetricsCollector, PassMetrics};
