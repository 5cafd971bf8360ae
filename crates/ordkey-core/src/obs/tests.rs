use super::*;
use crate::{
    key::{TaggedKey as _, dispatch, encode_string},
    obs::sink::record,
    test_fixtures::{Adjustment, Pair},
};
use std::{cell::RefCell, rc::Rc};

///
/// CapturingSink
///

#[derive(Default)]
struct CapturingSink {
    events: RefCell<Vec<MetricsEvent>>,
}

impl MetricsSink for CapturingSink {
    fn record(&self, event: MetricsEvent) {
        self.events.borrow_mut().push(event);
    }
}

struct NoopVisitor;

impl crate::key::AlternativeVisitor for NoopVisitor {
    type Output = ();

    fn visit<T: crate::key::KeyAlternative>(self, _position: u8) {}
}

#[test]
fn global_sink_counts_key_encoding() {
    metrics_reset_all();

    Pair::Second(5).encode().expect("fits");
    Adjustment::Remove(-2).encode().expect_err("overflows");

    let report = metrics_report();
    assert_eq!(report.ops.keys_encoded, 1);
    assert_eq!(report.ops.key_overflows, 1);
}

#[test]
fn global_sink_counts_truncation_and_rejection() {
    metrics_reset_all();

    let long = "x".repeat(40);
    let _ = encode_string(&long);
    let _ = encode_string("short");
    let _ = dispatch::<(u64, u32), _>(5, NoopVisitor);

    let report = metrics_report();
    assert_eq!(report.ops.string_keys_truncated, 1);
    assert_eq!(report.ops.string_bytes_discarded, 8);
    assert_eq!(report.ops.dispatch_rejections, 1);
}

#[test]
fn truncation_counts_bytes_after_an_early_nul() {
    metrics_reset_all();

    let _ = encode_string("ab\0cd");
    let long = format!("ab\0{}", "x".repeat(40));
    let _ = encode_string(&long);

    let report = metrics_report();
    assert_eq!(report.ops.string_keys_truncated, 2);
    assert_eq!(report.ops.string_bytes_discarded, 3 + 41);
}

#[test]
fn record_writes_accumulate_per_record() {
    metrics_reset_all();

    record(MetricsEvent::RecordWrite {
        kind: WriteKind::Create,
        record: "cargo",
    });
    record(MetricsEvent::RecordWrite {
        kind: WriteKind::Erase,
        record: "cargo",
    });
    record(MetricsEvent::IndexDelta {
        record: "cargo",
        index: "by.manifest",
        inserts: 2,
        removes: 1,
    });

    let report = metrics_report();
    let cargo = report.records.get("cargo").expect("cargo counters");

    assert_eq!(report.ops.creates, 1);
    assert_eq!(report.ops.erases, 1);
    assert_eq!(cargo.index_inserts, 2);
    assert_eq!(cargo.index_removes, 1);
}

#[test]
fn override_sink_captures_and_restores() {
    metrics_reset_all();
    let sink = Rc::new(CapturingSink::default());

    with_metrics_sink(sink.clone(), || {
        Pair::First(1).encode().expect("fits");
    });

    assert_eq!(
        sink.events.borrow().as_slice(),
        [MetricsEvent::KeyEncoded { overflow: false }]
    );
    assert_eq!(metrics_report().ops.keys_encoded, 0);

    Pair::First(1).encode().expect("fits");
    assert_eq!(metrics_report().ops.keys_encoded, 1);
}

#[test]
fn report_serializes_to_json() {
    metrics_reset_all();
    Pair::First(1).encode().expect("fits");

    let json = serde_json::to_value(metrics_report()).expect("serializes");
    assert_eq!(json["ops"]["keys_encoded"], 1);
}
