use crate::{
    config::{Scope, StoreConfig},
    error::InternalError,
    model::{IndexError, IndexKey, IndexModel, Payer, Record, RecordId, validate_indexes},
    obs::sink::{self, MetricsEvent, WriteKind},
    store::{
        IndexView, StoreError,
        index::{Fingerprint, IndexEntry, IndexStore},
    },
};
use std::collections::{BTreeMap, BTreeSet};

///
/// Row
///

#[derive(Clone, Debug)]
pub(crate) struct Row<R> {
    pub(crate) record: R,
    pub(crate) payer: Payer,
}

///
/// Table
///
/// In-memory table of one record type plus every secondary index the
/// type declares. Each write derives all index keys before touching
/// anything, so a failed derivation leaves rows and indexes unchanged.
///

#[derive(Debug)]
pub struct Table<R: Record> {
    config: StoreConfig,
    rows: BTreeMap<RecordId<R>, Row<R>>,
    indexes: Vec<IndexStore>,
}

impl<R: Record> Table<R> {
    /// Open an empty table under `config`.
    pub fn open(config: StoreConfig) -> Result<Self, InternalError> {
        validate_indexes::<R>()?;

        let indexes = R::INDEXES
            .iter()
            .map(|index| IndexStore::new(index.model()))
            .collect();

        Ok(Self {
            config,
            rows: BTreeMap::new(),
            indexes,
        })
    }

    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.config.scope
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Fresh id: one past the highest id ever present, or 0.
    #[must_use]
    pub fn next_id(&self) -> RecordId<R> {
        self.rows
            .last_key_value()
            .map_or(RecordId::new(0), |(id, _)| {
                RecordId::new(id.get().saturating_add(1))
            })
    }

    pub fn get_by_id(&self, id: RecordId<R>) -> Result<&R, InternalError> {
        self.find(id).ok_or_else(|| not_found::<R>(id))
    }

    #[must_use]
    pub fn find(&self, id: RecordId<R>) -> Option<&R> {
        self.rows.get(&id).map(|row| &row.record)
    }

    /// Account billed for the row's storage.
    #[must_use]
    pub fn payer(&self, id: RecordId<R>) -> Option<&Payer> {
        self.rows.get(&id).map(|row| &row.payer)
    }

    /// Rows in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.rows.values().map(|row| &row.record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ordered view over the secondary index named `name`.
    pub fn secondary_index(&self, name: &str) -> Result<IndexView<'_, R>, InternalError> {
        let store = self
            .indexes
            .iter()
            .find(|store| store.model().name == name)
            .ok_or_else(|| IndexError::UnknownIndex {
                record: R::RECORD_NAME,
                index: name.to_string(),
            })?;

        Ok(IndexView::new(store, &self.rows))
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Insert the record built by `init`, which receives the fresh id.
    pub fn create(
        &mut self,
        payer: impl Into<Payer>,
        init: impl FnOnce(RecordId<R>) -> R,
    ) -> Result<&R, InternalError> {
        let id = self.next_id();
        if self.rows.contains_key(&id) {
            return Err(StoreError::DuplicateId {
                record: R::RECORD_NAME,
                id: id.get(),
            }
            .into());
        }

        let record = init(id);
        if record.id() != id {
            return Err(StoreError::IdMismatch {
                record: R::RECORD_NAME,
                expected: id.get(),
                found: record.id().get(),
            }
            .into());
        }

        let keys = derive_keys(&record)?;

        for (store, key) in self.indexes.iter_mut().zip(keys) {
            store.insert(key, id.get());
            record_delta(store.model(), 1, 0);
        }
        self.rows.insert(
            id,
            Row {
                record,
                payer: payer.into(),
            },
        );

        self.finish_write(WriteKind::Create)?;
        self.get_by_id(id)
    }

    /// Apply `mutator` to a copy of the row, then swap it in along with
    /// any index entries whose key changed.
    pub fn modify(
        &mut self,
        id: RecordId<R>,
        payer: impl Into<Payer>,
        mutator: impl FnOnce(&mut R),
    ) -> Result<&R, InternalError> {
        let row = self.rows.get(&id).ok_or_else(|| not_found::<R>(id))?;
        let old_keys = derive_keys(&row.record)?;

        let mut record = row.record.clone();
        mutator(&mut record);
        if record.id() != id {
            return Err(StoreError::PrimaryKeyChanged {
                record: R::RECORD_NAME,
                id: id.get(),
                found: record.id().get(),
            }
            .into());
        }

        let new_keys = derive_keys(&record)?;

        for ((store, old), new) in self.indexes.iter_mut().zip(old_keys).zip(new_keys) {
            if old == new {
                continue;
            }
            store.remove(old, id.get());
            store.insert(new, id.get());
            record_delta(store.model(), 1, 1);
        }
        self.rows.insert(
            id,
            Row {
                record,
                payer: payer.into(),
            },
        );

        self.finish_write(WriteKind::Modify)?;
        self.get_by_id(id)
    }

    /// Remove the row and its index entries, returning the removed record.
    pub fn erase(&mut self, id: RecordId<R>) -> Result<R, InternalError> {
        let row = self.rows.get(&id).ok_or_else(|| not_found::<R>(id))?;
        let keys = derive_keys(&row.record)?;

        for (store, key) in self.indexes.iter_mut().zip(keys) {
            store.remove(key, id.get());
            record_delta(store.model(), 0, 1);
        }
        let row = self.rows.remove(&id).ok_or_else(|| not_found::<R>(id))?;

        self.finish_write(WriteKind::Erase)?;

        Ok(row.record)
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Regenerate every index from a full scan of the rows.
    /// Returns the total number of entries written.
    pub fn rebuild_indexes(&mut self) -> Result<u64, InternalError> {
        let mut derived: Vec<Vec<(IndexKey, u64)>> =
            vec![Vec::with_capacity(self.rows.len()); self.indexes.len()];

        for (id, row) in &self.rows {
            let keys = derive_keys(&row.record)?;
            for (bucket, key) in derived.iter_mut().zip(keys) {
                bucket.push((key, id.get()));
            }
        }

        let mut written = 0u64;
        for (store, entries) in self.indexes.iter_mut().zip(derived) {
            store.clear();
            for (key, id) in entries {
                store.insert(key, id);
            }

            let entries = u64::try_from(store.len()).unwrap_or(u64::MAX);
            written = written.saturating_add(entries);

            sink::record(MetricsEvent::IndexRebuild {
                record: store.model().record,
                index: store.model().name,
                entries,
            });
        }

        Ok(written)
    }

    /// Re-derive every key from the rows and compare against the stored
    /// entries and their fingerprints.
    pub fn verify_indexes(&self) -> Result<(), InternalError> {
        for (index, store) in R::INDEXES.iter().zip(&self.indexes) {
            let model = store.model();

            let mut expected = BTreeSet::new();
            for (id, row) in &self.rows {
                expected.insert(IndexEntry::new(index.derive_key(&row.record)?, id.get()));
            }

            for (entry, fingerprint) in store.iter() {
                if !self.rows.contains_key(&RecordId::new(entry.id)) {
                    return Err(InternalError::store_invariant(format!(
                        "index '{model}' points at missing {} #{}",
                        R::RECORD_NAME,
                        entry.id
                    )));
                }

                if *fingerprint != Fingerprint::of(model.name, &entry.key, entry.id) {
                    return Err(InternalError::index_invariant(format!(
                        "index '{model}' fingerprint mismatch at {} -> #{}",
                        entry.key, entry.id
                    )));
                }

                if !expected.remove(entry) {
                    return Err(divergence(
                        model,
                        format!("stale entry {} -> #{}", entry.key, entry.id),
                    ));
                }
            }

            if let Some(missing) = expected.first() {
                return Err(divergence(
                    model,
                    format!("missing entry {} -> #{}", missing.key, missing.id),
                ));
            }
        }

        Ok(())
    }

    // finish_write
    // Runs after the write is applied. A verification error reports an
    // index already out of step; it does not roll the write back.
    fn finish_write(&self, kind: WriteKind) -> Result<(), InternalError> {
        sink::record(MetricsEvent::RecordWrite {
            kind,
            record: R::RECORD_NAME,
        });

        if self.config.verify_indexes {
            self.verify_indexes()?;
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn index_store_mut(&mut self, name: &str) -> Option<&mut IndexStore> {
        self.indexes
            .iter_mut()
            .find(|store| store.model().name == name)
    }
}

// derive_keys
// One key per declared index, in declaration order; fails on the first
// accessor error.
fn derive_keys<R: Record>(record: &R) -> Result<Vec<IndexKey>, InternalError> {
    R::INDEXES
        .iter()
        .map(|index| index.derive_key(record))
        .collect()
}

fn record_delta(model: &IndexModel, inserts: u64, removes: u64) {
    sink::record(MetricsEvent::IndexDelta {
        record: model.record,
        index: model.name,
        inserts,
        removes,
    });
}

fn not_found<R: Record>(id: RecordId<R>) -> InternalError {
    StoreError::NotFound {
        record: R::RECORD_NAME,
        id: id.get(),
    }
    .into()
}

fn divergence(model: &IndexModel, message: String) -> InternalError {
    IndexError::Divergence {
        record: model.record,
        index: model.name,
        message,
    }
    .into()
}
