use crate::model::{IndexError, IndexModel, Record};
use std::collections::{BTreeMap, BTreeSet};

/// Check that a record type declares each index name at most once.
pub fn validate_indexes<R: Record>() -> Result<(), IndexError> {
    let mut seen = BTreeSet::new();

    for index in R::INDEXES {
        if !seen.insert(index.name()) {
            return Err(IndexError::DuplicateIndex {
                record: R::RECORD_NAME,
                index: index.name(),
            });
        }
    }

    Ok(())
}

///
/// IndexRegistry
///
/// Lookup table of declared indexes keyed by owning record name.
/// Holds type-erased `IndexModel`s; accessors stay with the record type.
///

#[derive(Debug, Default)]
pub struct IndexRegistry {
    by_record: BTreeMap<&'static str, Vec<IndexModel>>,
}

impl IndexRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every index declared by `R`.
    pub fn register<R: Record>(&mut self) -> Result<(), IndexError> {
        validate_indexes::<R>()?;

        if self.by_record.contains_key(R::RECORD_NAME) {
            return Err(IndexError::DuplicateRecord {
                record: R::RECORD_NAME,
            });
        }

        let models = R::INDEXES.iter().map(|index| index.model()).collect();
        self.by_record.insert(R::RECORD_NAME, models);

        Ok(())
    }

    /// Indexes declared by one record, in declaration order.
    #[must_use]
    pub fn indexes_for(&self, record: &str) -> &[IndexModel] {
        self.by_record.get(record).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn get(&self, record: &str, index: &str) -> Option<&IndexModel> {
        self.indexes_for(record)
            .iter()
            .find(|model| model.name == index)
    }

    #[must_use]
    pub fn contains_record(&self, record: &str) -> bool {
        self.by_record.contains_key(record)
    }

    /// All registered indexes, ordered by record name then declaration.
    pub fn iter(&self) -> impl Iterator<Item = &IndexModel> {
        self.by_record.values().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_record.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
