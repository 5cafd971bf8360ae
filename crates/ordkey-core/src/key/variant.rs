use crate::{
    key::{
        AlternativeList, KeyEncodeError,
        dispatch::{ResolveAlternative, dispatch},
    },
    obs::sink::{self, MetricsEvent},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

///
/// CONSTANTS
///
/// Bit layout of an encoded key (DO NOT CHANGE without migration):
/// bits [63:61] alternative position, bits [60:0] magnitude.
///

pub const TAG_BITS: u32 = 3;
pub const MAGNITUDE_BITS: u32 = u64::BITS - TAG_BITS;
pub const MAX_MAGNITUDE: u64 = (1u64 << MAGNITUDE_BITS) - 1;

/// Widest alternative list a tagged key may declare.
pub const MAX_ALTERNATIVES: usize = 7;

///
/// EncodedKey
///
/// A tagged value packed into one `u64` whose numeric order equals the
/// lexicographic order of (alternative position, magnitude).
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[display("{_0:#018x}")]
#[serde(transparent)]
pub struct EncodedKey(u64);

impl EncodedKey {
    /// Smallest key any tagged value can encode to.
    pub const MIN: Self = Self(0);

    const fn from_parts(position: u8, magnitude: u64) -> Self {
        Self(((position as u64) << MAGNITUDE_BITS) | magnitude)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Alternative position held in the tag bits.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn position(self) -> u8 {
        (self.0 >> MAGNITUDE_BITS) as u8
    }

    #[must_use]
    pub const fn magnitude(self) -> u64 {
        self.0 & MAX_MAGNITUDE
    }
}

impl From<EncodedKey> for u64 {
    fn from(key: EncodedKey) -> Self {
        key.get()
    }
}

///
/// TaggedKey
///
/// A tagged union whose alternatives all widen to `u64`.
/// Normally implemented with `#[derive(TaggedKey)]`; the derive keeps
/// `position`, `magnitude`, and `Alternatives` in declaration order.
///

pub trait TaggedKey {
    /// Ordered payload types, one per alternative.
    type Alternatives: AlternativeList;

    /// Alternative names, in declaration order.
    const ALTERNATIVE_NAMES: &'static [&'static str];

    /// Declaration position of the active alternative.
    fn position(&self) -> usize;

    /// Widened payload of the active alternative.
    fn magnitude(&self) -> u64;

    fn encode(&self) -> Result<EncodedKey, KeyEncodeError> {
        encode(self)
    }
}

/// Encode a tagged value into its order-preserving `u64` key.
pub fn encode<V: TaggedKey + ?Sized>(value: &V) -> Result<EncodedKey, KeyEncodeError> {
    let position = value.position();
    let name = V::ALTERNATIVE_NAMES.get(position).copied();

    encode_alternative::<V::Alternatives>(position, value.magnitude(), name)
}

/// Encode a raw (position, magnitude) pair against the alternative list `L`.
pub fn encode_parts<L: AlternativeList>(
    position: usize,
    magnitude: u64,
) -> Result<EncodedKey, KeyEncodeError> {
    encode_alternative::<L>(position, magnitude, None)
}

fn encode_alternative<L: AlternativeList>(
    position: usize,
    magnitude: u64,
    name: Option<&'static str>,
) -> Result<EncodedKey, KeyEncodeError> {
    let info = dispatch::<L, _>(position, ResolveAlternative)?;

    if magnitude > MAX_MAGNITUDE {
        sink::record(MetricsEvent::KeyEncoded { overflow: true });

        return Err(KeyEncodeError::KeyOverflow {
            alternative: name.unwrap_or(info.type_name),
            type_name: info.type_name,
            position: info.position,
            magnitude,
        });
    }

    sink::record(MetricsEvent::KeyEncoded { overflow: false });

    Ok(EncodedKey::from_parts(info.position, magnitude))
}

/// Lower scan bound for the union `V`.
///
/// Stable across schema changes: alternatives are only ever appended.
#[must_use]
pub const fn min_key<V: TaggedKey + ?Sized>() -> EncodedKey {
    EncodedKey::MIN
}

/// Upper scan bound for the union `V`, computed from its current last alternative.
///
/// NOTE: this value moves when an alternative is appended to `V`.
/// Recompute it right before each scan; never store it.
#[must_use]
#[expect(clippy::cast_possible_truncation)]
pub fn max_key<V: TaggedKey + ?Sized>() -> EncodedKey {
    // LEN never exceeds MAX_ALTERNATIVES, so the position fits in the tag bits.
    let last = <V::Alternatives as AlternativeList>::LEN.saturating_sub(1);

    EncodedKey::from_parts(last as u8, MAX_MAGNITUDE)
}

/// Inclusive bounds covering every key of the union `V`.
#[must_use]
pub fn key_range<V: TaggedKey + ?Sized>() -> RangeInclusive<EncodedKey> {
    min_key::<V>()..=max_key::<V>()
}

/// Inclusive bounds covering every key of one alternative of `V`.
pub fn alternative_range<V: TaggedKey + ?Sized>(
    position: usize,
) -> Result<RangeInclusive<EncodedKey>, KeyEncodeError> {
    let info = dispatch::<V::Alternatives, _>(position, ResolveAlternative)?;

    Ok(EncodedKey::from_parts(info.position, 0)..=EncodedKey::from_parts(info.position, MAX_MAGNITUDE))
}
