use crate::{
    model::{IndexKey, IndexModel, Record, RecordId},
    store::{index::IndexStore, table::Row},
};
use std::{collections::BTreeMap, ops::RangeInclusive};

///
/// IndexView
///
/// Read-only ordered view of one secondary index, resolving entries to
/// the rows they point at. Entries with equal keys come back in id order.
///

pub struct IndexView<'a, R> {
    store: &'a IndexStore,
    rows: &'a BTreeMap<RecordId<R>, Row<R>>,
}

impl<'a, R: Record> IndexView<'a, R> {
    pub(crate) const fn new(store: &'a IndexStore, rows: &'a BTreeMap<RecordId<R>, Row<R>>) -> Self {
        Self { store, rows }
    }

    #[must_use]
    pub const fn model(&self) -> &'a IndexModel {
        self.store.model()
    }

    /// Every row whose key equals `key`.
    pub fn equal_range(&self, key: impl Into<IndexKey>) -> Vec<&'a R> {
        let key = key.into();

        self.range(key..=key)
    }

    /// Whether at least one row carries `key`.
    pub fn contains(&self, key: impl Into<IndexKey>) -> bool {
        self.store.contains_key(key.into())
    }

    /// Rows whose key falls in the inclusive range, in key order.
    pub fn range<K: Into<IndexKey>>(&self, range: RangeInclusive<K>) -> Vec<&'a R> {
        let (lo, hi) = range.into_inner();
        let rows = self.rows;

        self.store
            .range(lo.into(), hi.into())
            .filter_map(|entry| rows.get(&RecordId::new(entry.id)))
            .map(|row| &row.record)
            .collect()
    }

    /// Raw (key, id) pairs in index order.
    pub fn entries(&self) -> impl Iterator<Item = (IndexKey, RecordId<R>)> + 'a {
        self.store
            .iter()
            .map(|(entry, _)| (entry.key, RecordId::new(entry.id)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }
}
