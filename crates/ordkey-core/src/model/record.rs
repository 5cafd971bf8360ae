use crate::{
    key::{KeyAlternative, KeyField},
    model::SecondaryIndex,
};
use derive_more::{Display, From};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

///
/// Record
///
/// A row type owned by a table. Declares its stable name, its primary id,
/// and the secondary indexes maintained alongside it.
///

pub trait Record: Clone + 'static {
    /// Stable external name used in diagnostics and metrics.
    const RECORD_NAME: &'static str;

    /// Secondary indexes on this record type (declaration order).
    const INDEXES: &'static [SecondaryIndex<Self>] = &[];

    fn id(&self) -> RecordId<Self>;
}

///
/// RecordId
///
/// Typed primary id. The phantom record type keeps ids of different
/// tables from being cross-assigned.
///

pub struct RecordId<R> {
    raw: u64,
    _marker: PhantomData<fn() -> R>,
}

impl<R> RecordId<R> {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.raw
    }
}

impl<R> Clone for RecordId<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for RecordId<R> {}

impl<R> PartialEq for RecordId<R> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<R> Eq for RecordId<R> {}

impl<R> PartialOrd for RecordId<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> Ord for RecordId<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<R> Hash for RecordId<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<R> fmt::Debug for RecordId<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.raw)
    }
}

impl<R> fmt::Display for RecordId<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl<R> From<RecordId<R>> for u64 {
    fn from(id: RecordId<R>) -> Self {
        id.raw
    }
}

impl<R> KeyAlternative for RecordId<R> {
    const TYPE_NAME: &'static str = "RecordId";

    fn to_magnitude(&self) -> u64 {
        self.raw
    }
}

impl<R> KeyField for RecordId<R> {
    const TYPE_NAME: &'static str = "RecordId";

    fn to_key_field(self) -> u64 {
        self.raw
    }

    fn try_to_key_field(self) -> Option<u64> {
        Some(self.raw)
    }
}

///
/// Payer
///
/// Account charged for a row's storage.
///

#[derive(Clone, Debug, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub struct Payer(String);

impl Payer {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Payer {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}
