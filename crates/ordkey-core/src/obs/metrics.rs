use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for key derivation and index upkeep.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) records: BTreeMap<String, RecordCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Key encoding
    pub keys_encoded: u64,
    pub key_overflows: u64,
    pub dispatch_rejections: u64,
    pub string_keys_truncated: u64,
    pub string_bytes_discarded: u64,

    // Record writes
    pub creates: u64,
    pub modifies: u64,
    pub erases: u64,

    // Index maintenance
    pub index_inserts: u64,
    pub index_removes: u64,
    pub index_rebuilds: u64,
}

///
/// RecordCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RecordCounters {
    pub creates: u64,
    pub modifies: u64,
    pub erases: u64,
    pub index_inserts: u64,
    pub index_removes: u64,
    pub index_rebuild_entries: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the thread's metrics state.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub records: BTreeMap<String, RecordCounters>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        records: m.records.clone(),
    })
}
