//! Metrics sink boundary.
//!
//! Encoders and the store never touch `obs::metrics` directly; all
//! instrumentation flows through `MetricsEvent` and `MetricsSink`.
use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// WriteKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteKind {
    Create,
    Modify,
    Erase,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    KeyEncoded {
        overflow: bool,
    },
    DispatchRejected,
    StringKeyTruncated {
        discarded: usize,
    },
    RecordWrite {
        kind: WriteKind,
        record: &'static str,
    },
    IndexDelta {
        record: &'static str,
        index: &'static str,
        inserts: u64,
        removes: u64,
    },
    IndexRebuild {
        record: &'static str,
        index: &'static str,
        entries: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::KeyEncoded { overflow } => {
                metrics::with_state_mut(|m| {
                    if overflow {
                        m.ops.key_overflows = m.ops.key_overflows.saturating_add(1);
                    } else {
                        m.ops.keys_encoded = m.ops.keys_encoded.saturating_add(1);
                    }
                });
            }

            MetricsEvent::DispatchRejected => {
                metrics::with_state_mut(|m| {
                    m.ops.dispatch_rejections = m.ops.dispatch_rejections.saturating_add(1);
                });
            }

            MetricsEvent::StringKeyTruncated { discarded } => {
                metrics::with_state_mut(|m| {
                    m.ops.string_keys_truncated = m.ops.string_keys_truncated.saturating_add(1);
                    m.ops.string_bytes_discarded = m
                        .ops
                        .string_bytes_discarded
                        .saturating_add(u64::try_from(discarded).unwrap_or(u64::MAX));
                });
            }

            MetricsEvent::RecordWrite { kind, record } => {
                metrics::with_state_mut(|m| {
                    let entry = m.records.entry(record.to_string()).or_default();
                    match kind {
                        WriteKind::Create => {
                            m.ops.creates = m.ops.creates.saturating_add(1);
                            entry.creates = entry.creates.saturating_add(1);
                        }
                        WriteKind::Modify => {
                            m.ops.modifies = m.ops.modifies.saturating_add(1);
                            entry.modifies = entry.modifies.saturating_add(1);
                        }
                        WriteKind::Erase => {
                            m.ops.erases = m.ops.erases.saturating_add(1);
                            entry.erases = entry.erases.saturating_add(1);
                        }
                    }
                });
            }

            MetricsEvent::IndexDelta {
                record,
                index: _,
                inserts,
                removes,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_inserts = m.ops.index_inserts.saturating_add(inserts);
                    m.ops.index_removes = m.ops.index_removes.saturating_add(removes);
                    let entry = m.records.entry(record.to_string()).or_default();
                    entry.index_inserts = entry.index_inserts.saturating_add(inserts);
                    entry.index_removes = entry.index_removes.saturating_add(removes);
                });
            }

            MetricsEvent::IndexRebuild {
                record,
                index: _,
                entries,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_rebuilds = m.ops.index_rebuilds.saturating_add(1);
                    let entry = m.records.entry(record.to_string()).or_default();
                    entry.index_rebuild_entries = entry.index_rebuild_entries.saturating_add(entries);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
/// The previous sink is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
