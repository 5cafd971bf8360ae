use crate::{
    error::InternalError,
    key::{EncodedKey, Key256, KeyEncodeError, StringKey},
    model::{IndexError, RecordId},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// KeyKind
///
/// Storable key width of one secondary index.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum KeyKind {
    #[display("u64")]
    U64,
    #[display("u128")]
    U128,
    #[display("u256")]
    U256,
}

///
/// IndexKey
///
/// A derived secondary-index key. All keys of one index share a single
/// kind, so ordering only ever compares like with like.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum IndexKey {
    U64(u64),
    U128(u128),
    U256(Key256),
}

impl IndexKey {
    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        match self {
            Self::U64(_) => KeyKind::U64,
            Self::U128(_) => KeyKind::U128,
            Self::U256(_) => KeyKind::U256,
        }
    }

    /// Big-endian key bytes (8, 16, or 32 bytes by kind).
    #[must_use]
    pub fn to_be_bytes(&self) -> Vec<u8> {
        match self {
            Self::U64(v) => v.to_be_bytes().to_vec(),
            Self::U128(v) => v.to_be_bytes().to_vec(),
            Self::U256(v) => v.as_bytes().to_vec(),
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U64(v) => write!(f, "{v:#018x}"),
            Self::U128(v) => write!(f, "{v:#034x}"),
            Self::U256(v) => write!(f, "{v}"),
        }
    }
}

impl From<u64> for IndexKey {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<u128> for IndexKey {
    fn from(v: u128) -> Self {
        Self::U128(v)
    }
}

impl From<Key256> for IndexKey {
    fn from(v: Key256) -> Self {
        Self::U256(v)
    }
}

impl From<EncodedKey> for IndexKey {
    fn from(v: EncodedKey) -> Self {
        Self::U64(v.get())
    }
}

impl From<StringKey> for IndexKey {
    fn from(v: StringKey) -> Self {
        Self::U256(v.into())
    }
}

impl<R> From<RecordId<R>> for IndexKey {
    fn from(v: RecordId<R>) -> Self {
        Self::U64(v.get())
    }
}

/// Pure key derivation for one index: a function of the record's fields only.
pub type KeyAccessor<R> = fn(&R) -> Result<IndexKey, KeyEncodeError>;

///
/// SecondaryIndex
///
/// Compile-time declaration of one secondary index: its name, owning
/// record, key kind, and accessor. Declared once in the owning record's
/// `INDEXES` and never mutated.
///
/// The accessor must be pure so that the index can be rebuilt from a
/// full scan at any time and repeated derivation always agrees.
///

pub struct SecondaryIndex<R> {
    name: &'static str,
    record: &'static str,
    kind: KeyKind,
    accessor: KeyAccessor<R>,
}

impl<R> SecondaryIndex<R> {
    #[must_use]
    pub const fn new(
        name: &'static str,
        record: &'static str,
        kind: KeyKind,
        accessor: KeyAccessor<R>,
    ) -> Self {
        Self {
            name,
            record,
            kind,
            accessor,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn record(&self) -> &'static str {
        self.record
    }

    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        self.kind
    }

    /// Type-erased metadata for registries and diagnostics.
    #[must_use]
    pub const fn model(&self) -> IndexModel {
        IndexModel {
            name: self.name,
            record: self.record,
            kind: self.kind,
        }
    }

    /// Derive this index's key for `record`.
    ///
    /// Fails if the accessor fails or returns a key of the wrong kind.
    pub fn derive_key(&self, record: &R) -> Result<IndexKey, InternalError> {
        let key = (self.accessor)(record)?;

        if key.kind() != self.kind {
            return Err(IndexError::KindMismatch {
                record: self.record,
                index: self.name,
                expected: self.kind,
                found: key.kind(),
            }
            .into());
        }

        Ok(key)
    }
}

impl<R> Clone for SecondaryIndex<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for SecondaryIndex<R> {}

impl<R> fmt::Debug for SecondaryIndex<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecondaryIndex")
            .field("name", &self.name)
            .field("record", &self.record)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

///
/// IndexModel
/// Runtime-only descriptor for an index, with the accessor erased.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct IndexModel {
    pub name: &'static str,
    pub record: &'static str,
    pub kind: KeyKind,
}

impl fmt::Display for IndexModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({})", self.record, self.name, self.kind)
    }
}
