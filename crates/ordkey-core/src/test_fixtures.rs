use crate::{
    key::{KeyEncodeError, TaggedKey as _, combine, encode_string},
    model::{IndexKey, KeyKind, Record, RecordId, SecondaryIndex},
};
use ordkey_derive::TaggedKey;

///
/// Tagged unions
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, TaggedKey)]
pub(crate) enum Single {
    Only(u64),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, TaggedKey)]
pub(crate) enum Pair {
    First(u64),
    Second(u64),
}

/// `Pair` after a schema change appended one alternative.
#[derive(Clone, Copy, Debug, Eq, PartialEq, TaggedKey)]
pub(crate) enum Extended {
    First(u64),
    Second(u32),
    Third(u16),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, TaggedKey)]
pub(crate) enum Adjustment {
    Add(u32),
    Remove(i32),
}

///
/// Parcel
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Parcel {
    pub(crate) id: RecordId<Self>,
    pub(crate) manifest: u64,
    pub(crate) label: String,
    pub(crate) weight: u64,
    pub(crate) adjustment: Adjustment,
}

impl Parcel {
    pub(crate) const BY_MANIFEST: &'static str = "by.manifest";
    pub(crate) const BY_LABEL: &'static str = "by.label";
    pub(crate) const BY_MANIFEST_WEIGHT: &'static str = "by.mfst.wt";
    pub(crate) const BY_ADJUSTMENT: &'static str = "by.adjust";

    pub(crate) fn new(id: RecordId<Self>, manifest: u64, label: &str) -> Self {
        Self {
            id,
            manifest,
            label: label.to_string(),
            weight: 1,
            adjustment: Adjustment::Add(0),
        }
    }

    fn manifest_key(&self) -> Result<IndexKey, KeyEncodeError> {
        Ok(self.manifest.into())
    }

    fn label_key(&self) -> Result<IndexKey, KeyEncodeError> {
        Ok(encode_string(&self.label).into())
    }

    fn manifest_weight_key(&self) -> Result<IndexKey, KeyEncodeError> {
        Ok(combine((self.manifest, self.weight)).into())
    }

    fn adjustment_key(&self) -> Result<IndexKey, KeyEncodeError> {
        Ok(self.adjustment.encode()?.into())
    }
}

impl Record for Parcel {
    const RECORD_NAME: &'static str = "parcel";
    const INDEXES: &'static [SecondaryIndex<Self>] = &[
        SecondaryIndex::new(
            Self::BY_MANIFEST,
            Self::RECORD_NAME,
            KeyKind::U64,
            Self::manifest_key,
        ),
        SecondaryIndex::new(
            Self::BY_LABEL,
            Self::RECORD_NAME,
            KeyKind::U256,
            Self::label_key,
        ),
        SecondaryIndex::new(
            Self::BY_MANIFEST_WEIGHT,
            Self::RECORD_NAME,
            KeyKind::U128,
            Self::manifest_weight_key,
        ),
        SecondaryIndex::new(
            Self::BY_ADJUSTMENT,
            Self::RECORD_NAME,
            KeyKind::U64,
            Self::adjustment_key,
        ),
    ];

    fn id(&self) -> RecordId<Self> {
        self.id
    }
}

///
/// Misdeclared
///
/// Declares a 128-bit index whose accessor yields 64-bit keys.
///

#[derive(Clone, Debug)]
pub(crate) struct Misdeclared {
    pub(crate) id: RecordId<Self>,
}

impl Record for Misdeclared {
    const RECORD_NAME: &'static str = "misdeclared";
    const INDEXES: &'static [SecondaryIndex<Self>] = &[SecondaryIndex::new(
        "by.id",
        Self::RECORD_NAME,
        KeyKind::U128,
        |record: &Self| Ok(record.id.into()),
    )];

    fn id(&self) -> RecordId<Self> {
        self.id
    }
}

///
/// Duplicated
///

#[derive(Clone, Debug)]
pub(crate) struct Duplicated {
    pub(crate) id: RecordId<Self>,
}

impl Record for Duplicated {
    const RECORD_NAME: &'static str = "duplicated";
    const INDEXES: &'static [SecondaryIndex<Self>] = &[
        SecondaryIndex::new("by.id", Self::RECORD_NAME, KeyKind::U64, |record: &Self| {
            Ok(record.id.into())
        }),
        SecondaryIndex::new("by.id", Self::RECORD_NAME, KeyKind::U64, |record: &Self| {
            Ok(record.id.into())
        }),
    ];

    fn id(&self) -> RecordId<Self> {
        self.id
    }
}
