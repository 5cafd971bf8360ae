use crate::model::{IndexKey, IndexModel};
use std::collections::BTreeMap;
use xxhash_rust::xxh3::Xxh3;

/*
Index fingerprints

Each entry stores an xxh3 digest of (index name, key bytes, row id).
Fingerprints are diagnostic witnesses only: the entry itself is the
authoritative fact, and a mismatch is reported, never repaired.
Rebuild is the only path that rewrites them wholesale.
*/

///
/// Fingerprint
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Fingerprint([u8; 16]);

impl Fingerprint {
    const VERSION: u8 = 1;

    pub(crate) fn of(index: &str, key: &IndexKey, id: u64) -> Self {
        let mut h = Xxh3::with_seed(0);
        h.update(&[Self::VERSION]);
        h.update(&u64::try_from(index.len()).unwrap_or(u64::MAX).to_be_bytes());
        h.update(index.as_bytes());
        h.update(&key.to_be_bytes());
        h.update(&id.to_be_bytes());

        Self(h.digest128().to_be_bytes())
    }
}

///
/// IndexEntry
///
/// Sort position of one row in one index: derived key first, row id as
/// the tie-breaker, so equal keys iterate in id order.
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct IndexEntry {
    pub(crate) key: IndexKey,
    pub(crate) id: u64,
}

impl IndexEntry {
    pub(crate) const fn new(key: IndexKey, id: u64) -> Self {
        Self { key, id }
    }

    /// Lowest entry that can carry `key`.
    pub(crate) const fn first(key: IndexKey) -> Self {
        Self::new(key, 0)
    }

    /// Highest entry that can carry `key`.
    pub(crate) const fn last(key: IndexKey) -> Self {
        Self::new(key, u64::MAX)
    }
}

///
/// IndexStore
///
/// Ordered entries of a single secondary index.
///

#[derive(Debug)]
pub(crate) struct IndexStore {
    model: IndexModel,
    entries: BTreeMap<IndexEntry, Fingerprint>,
}

impl IndexStore {
    pub(crate) const fn new(model: IndexModel) -> Self {
        Self {
            model,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) const fn model(&self) -> &IndexModel {
        &self.model
    }

    pub(crate) fn insert(&mut self, key: IndexKey, id: u64) -> bool {
        let fingerprint = Fingerprint::of(self.model.name, &key, id);

        self.entries
            .insert(IndexEntry::new(key, id), fingerprint)
            .is_none()
    }

    pub(crate) fn remove(&mut self, key: IndexKey, id: u64) -> bool {
        self.entries.remove(&IndexEntry::new(key, id)).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains_key(&self, key: IndexKey) -> bool {
        self.entries
            .range(IndexEntry::first(key)..=IndexEntry::last(key))
            .next()
            .is_some()
    }

    /// Entries whose key falls in `lo..=hi`, in (key, id) order.
    /// An inverted range is empty.
    pub(crate) fn range(
        &self,
        lo: IndexKey,
        hi: IndexKey,
    ) -> impl Iterator<Item = &IndexEntry> + '_ {
        let bounds = (lo <= hi).then(|| IndexEntry::first(lo)..=IndexEntry::last(hi));

        bounds
            .into_iter()
            .flat_map(move |bounds| self.entries.range(bounds).map(|(entry, _)| entry))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&IndexEntry, &Fingerprint)> + '_ {
        self.entries.iter()
    }

    #[cfg(test)]
    pub(crate) fn corrupt_fingerprint(&mut self, key: IndexKey, id: u64) -> bool {
        self.entries
            .get_mut(&IndexEntry::new(key, id))
            .map(|fingerprint| *fingerprint = Fingerprint([0; 16]))
            .is_some()
    }
}
