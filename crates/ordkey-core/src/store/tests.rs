use super::*;
use crate::{
    config::{Scope, StoreConfig},
    error::{ErrorClass, ErrorOrigin},
    key::{StringKey, combine2, prefix_range2},
    model::{IndexKey, Record, RecordId},
    obs::{metrics_report, metrics_reset_all},
    test_fixtures::{Adjustment, Duplicated, Parcel},
};

fn table() -> Table<Parcel> {
    Table::open(StoreConfig::default().with_verify_indexes(true)).expect("parcel table opens")
}

fn parcel(manifest: u64, label: &str) -> impl FnOnce(RecordId<Parcel>) -> Parcel {
    let label = label.to_string();
    move |id| Parcel::new(id, manifest, &label)
}

fn ids(rows: &[&Parcel]) -> Vec<u64> {
    rows.iter().map(|row| row.id.get()).collect()
}

#[test]
fn open_rejects_duplicate_index_names() {
    let err = Table::<Duplicated>::open(StoreConfig::default()).expect_err("duplicate index");

    assert_eq!(err.class, ErrorClass::Conflict);
    assert_eq!(err.origin, ErrorOrigin::Index);
}

#[test]
fn next_id_is_one_past_the_highest() {
    let mut table = table();
    assert_eq!(table.next_id().get(), 0);

    table.create("alice", parcel(1, "a")).expect("create");
    table.create("alice", parcel(1, "b")).expect("create");
    assert_eq!(table.next_id().get(), 2);

    table.erase(RecordId::new(0)).expect("erase");
    assert_eq!(table.next_id().get(), 2);
}

#[test]
fn create_indexes_every_declared_key() {
    let mut table = table();
    let created = table.create("alice", parcel(7, "bolts")).expect("create");
    assert_eq!(created.manifest, 7);

    let by_manifest = table.secondary_index(Parcel::BY_MANIFEST).expect("index");
    assert!(by_manifest.contains(7u64));
    assert!(!by_manifest.contains(8u64));
    assert_eq!(by_manifest.len(), 1);

    let by_label = table.secondary_index(Parcel::BY_LABEL).expect("index");
    assert!(by_label.contains(StringKey::new("bolts")));

    assert_eq!(table.payer(RecordId::new(0)).map(|p| p.as_str()), Some("alice"));
}

#[test]
fn equal_range_returns_matches_in_id_order() {
    let mut table = table();
    for (manifest, label) in [(2, "a"), (1, "b"), (2, "c"), (3, "d"), (2, "e")] {
        table.create("alice", parcel(manifest, label)).expect("create");
    }

    let index = table.secondary_index(Parcel::BY_MANIFEST).expect("index");

    assert_eq!(ids(&index.equal_range(2u64)), [0, 2, 4]);
    assert_eq!(ids(&index.equal_range(1u64)), [1]);
    assert!(index.equal_range(9u64).is_empty());
    assert_eq!(ids(&index.range(1u64..=2u64)), [1, 0, 2, 4]);
    assert!(index.range(3u64..=1u64).is_empty());
}

#[test]
fn composite_prefix_scan_selects_one_manifest() {
    let mut table = table();
    for manifest in [5, 6, 5] {
        table.create("bob", parcel(manifest, "x")).expect("create");
    }
    table
        .modify(RecordId::new(2), "bob", |p| p.weight = 0)
        .expect("modify");

    let index = table.secondary_index(Parcel::BY_MANIFEST_WEIGHT).expect("index");
    let range = prefix_range2(5);
    let rows = index.range(*range.start()..=*range.end());

    // weight 0 sorts before weight 1 within manifest 5
    assert_eq!(ids(&rows), [2, 0]);
    assert!(index.contains(combine2(6, 1)));
}

#[test]
fn modify_moves_changed_keys_only() {
    let mut table = table();
    table.create("alice", parcel(1, "old")).expect("create");
    metrics_reset_all();

    let updated = table
        .modify(RecordId::new(0), "carol", |p| p.label = "new".to_string())
        .expect("modify");
    assert_eq!(updated.label, "new");

    let by_label = table.secondary_index(Parcel::BY_LABEL).expect("index");
    assert!(!by_label.contains(StringKey::new("old")));
    assert!(by_label.contains(StringKey::new("new")));
    assert_eq!(table.payer(RecordId::new(0)).map(|p| p.as_str()), Some("carol"));

    let report = metrics_report();
    assert_eq!(report.ops.modifies, 1);
    assert_eq!(report.ops.index_inserts, 1);
    assert_eq!(report.ops.index_removes, 1);
}

#[test]
fn failed_modify_leaves_table_untouched() {
    let mut table = table();
    table.create("alice", parcel(1, "a")).expect("create");

    let err = table
        .modify(RecordId::new(0), "alice", |p| {
            p.manifest = 99;
            p.adjustment = Adjustment::Remove(-5);
        })
        .expect_err("negative adjustment overflows");

    assert!(err.is_fatal());
    assert_eq!(table.get_by_id(RecordId::new(0)).expect("row").manifest, 1);

    let index = table.secondary_index(Parcel::BY_MANIFEST).expect("index");
    assert!(index.contains(1u64));
    assert!(!index.contains(99u64));
    table.verify_indexes().expect("indexes intact");
}

#[test]
fn failed_create_leaves_table_untouched() {
    let mut table = table();

    let err = table
        .create("alice", |id| {
            let mut p = Parcel::new(id, 1, "a");
            p.adjustment = Adjustment::Remove(-1);
            p
        })
        .expect_err("overflow");

    assert!(err.key_detail().is_some());
    assert!(table.is_empty());
    for index in Parcel::INDEXES {
        assert!(table.secondary_index(index.name()).expect("index").is_empty());
    }
}

#[test]
fn create_rejects_foreign_id() {
    let mut table = table();

    let err = table
        .create("alice", |_| Parcel::new(RecordId::new(42), 1, "a"))
        .expect_err("initializer must keep the fresh id");

    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert!(table.is_empty());
}

#[test]
fn modify_rejects_primary_key_change() {
    let mut table = table();
    table.create("alice", parcel(1, "a")).expect("create");

    let err = table
        .modify(RecordId::new(0), "alice", |p| p.id = RecordId::new(5))
        .expect_err("id is immutable");

    assert!(err.is_fatal());
    assert!(table.find(RecordId::new(0)).is_some());
}

#[test]
fn erase_removes_row_and_entries() {
    let mut table = table();
    table.create("alice", parcel(3, "a")).expect("create");

    let erased = table.erase(RecordId::new(0)).expect("erase");
    assert_eq!(erased.manifest, 3);
    assert!(table.is_empty());
    assert!(!table.secondary_index(Parcel::BY_MANIFEST).expect("index").contains(3u64));

    let err = table.erase(RecordId::new(0)).expect_err("already gone");
    assert!(err.is_not_found());
}

#[test]
fn get_by_id_reports_not_found() {
    let table = table();
    let err = table.get_by_id(RecordId::new(3)).expect_err("empty table");

    assert!(err.is_not_found());
    assert!(err.message.contains("parcel #3"));
}

#[test]
fn unknown_index_name_is_not_found() {
    let table = table();
    let err = table.secondary_index("by.nothing").err().expect("unknown index");

    assert!(err.is_not_found());
    assert_eq!(err.origin, ErrorOrigin::Index);
}

#[test]
fn rebuild_matches_incremental_maintenance() {
    let mut table = table();
    for (manifest, label) in [(4, "d"), (1, "a"), (4, "b")] {
        table.create("alice", parcel(manifest, label)).expect("create");
    }
    table
        .modify(RecordId::new(1), "alice", |p| p.adjustment = Adjustment::Add(9))
        .expect("modify");
    table.erase(RecordId::new(2)).expect("erase");

    let snapshot = |table: &Table<Parcel>| -> Vec<Vec<(IndexKey, RecordId<Parcel>)>> {
        Parcel::INDEXES
            .iter()
            .map(|index| {
                table
                    .secondary_index(index.name())
                    .expect("index")
                    .entries()
                    .collect()
            })
            .collect()
    };

    let before = snapshot(&table);
    let written = table.rebuild_indexes().expect("rebuild");

    assert_eq!(written, 2 * Parcel::INDEXES.len() as u64);
    assert_eq!(snapshot(&table), before);
    table.verify_indexes().expect("rebuilt indexes verify");
}

#[test]
fn verify_detects_missing_and_stale_entries() {
    let mut table = table();
    table.create("alice", parcel(1, "a")).expect("create");

    let store = table.index_store_mut(Parcel::BY_MANIFEST).expect("store");
    store.remove(IndexKey::U64(1), 0);
    let err = table.verify_indexes().expect_err("missing entry");
    assert!(err.message.contains("missing entry"));

    table.rebuild_indexes().expect("rebuild");
    let store = table.index_store_mut(Parcel::BY_MANIFEST).expect("store");
    store.insert(IndexKey::U64(2), 0);
    let err = table.verify_indexes().expect_err("stale entry");
    assert!(err.message.contains("stale entry"));
}

#[test]
fn verify_detects_dangling_entries_and_bad_fingerprints() {
    let mut table = table();
    table.create("alice", parcel(1, "a")).expect("create");

    let store = table.index_store_mut(Parcel::BY_MANIFEST).expect("store");
    store.insert(IndexKey::U64(1), 77);
    let err = table.verify_indexes().expect_err("dangling");
    assert_eq!(err.origin, ErrorOrigin::Store);
    assert!(err.is_fatal());

    table.rebuild_indexes().expect("rebuild");
    let store = table.index_store_mut(Parcel::BY_MANIFEST).expect("store");
    assert!(store.corrupt_fingerprint(IndexKey::U64(1), 0));
    let err = table.verify_indexes().expect_err("fingerprint");
    assert_eq!(err.origin, ErrorOrigin::Index);
    assert!(err.message.contains("fingerprint mismatch"));
}

#[test]
fn failed_verification_reports_but_keeps_the_write() {
    let mut table = table();
    table.create("alice", parcel(1, "a")).expect("create");

    let store = table.index_store_mut(Parcel::BY_MANIFEST).expect("store");
    store.remove(IndexKey::U64(1), 0);

    let err = table
        .create("alice", parcel(2, "b"))
        .err()
        .expect("verification sees the earlier damage");
    assert_eq!(err.origin, ErrorOrigin::Index);
    assert!(err.message.contains("missing entry"));

    // the new row and its entries were applied before the check ran
    assert_eq!(table.len(), 2);
    let index = table.secondary_index(Parcel::BY_MANIFEST).expect("index");
    assert!(index.contains(2u64));
}

#[test]
fn tables_in_different_scopes_are_independent() {
    let north = StoreConfig::default().with_scope(Scope::new("north").expect("scope"));
    let mut north = Table::<Parcel>::open(north).expect("open");
    let mut south = table();

    north.create("alice", parcel(1, "a")).expect("create");

    assert_eq!(north.scope().as_str(), "north");
    assert_eq!(south.scope().as_str(), Scope::GLOBAL);
    assert!(south.is_empty());
    assert_eq!(south.next_id().get(), 0);

    south.create("bob", parcel(2, "b")).expect("create");
    assert_eq!(north.iter().map(|p| p.manifest).collect::<Vec<_>>(), [1]);
}

#[test]
fn write_events_reach_the_sink() {
    metrics_reset_all();
    let mut table = table();

    table.create("alice", parcel(1, "a")).expect("create");
    table.erase(RecordId::new(0)).expect("erase");

    let report = metrics_report();
    let parcel = report.records.get(Parcel::RECORD_NAME).expect("counters");
    let declared = Parcel::INDEXES.len() as u64;

    assert_eq!(parcel.creates, 1);
    assert_eq!(parcel.erases, 1);
    assert_eq!(parcel.index_inserts, declared);
    assert_eq!(parcel.index_removes, declared);
}
