//! Observability: runtime counters and the sink abstraction feeding them.
//!
//! There is no logging layer; every notable event (key overflow, index
//! delta, truncation) is a `MetricsEvent` routed through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

#[cfg(test)]
mod tests;

// re-exports
pub use metrics::{EventOps, EventReport, RecordCounters};
pub use sink::{
    MetricsEvent, MetricsSink, WriteKind, metrics_report, metrics_reset_all, with_metrics_sink,
};
