use crate::key::{EncodedKey, KeyEncodeError};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::RangeInclusive};

///
/// Key256
///
/// A 256-bit composite key stored as 32 big-endian bytes.
/// Layout: bytes [0..8) are zero, then field 1, field 2, field 3, each a
/// big-endian `u64`. Byte order therefore equals numeric order, which
/// equals lexicographic order over the field tuple.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Key256([u8; 32]);

impl Key256 {
    /// Fixed serialized size in bytes (stable, protocol-level).
    pub const STORED_SIZE: usize = 32;

    const WORD_SIZE: usize = 8;
    const FIRST_WORD_OFFSET: usize = Self::WORD_SIZE;

    pub const MIN: Self = Self([0; Self::STORED_SIZE]);

    /// Pack three fields, most significant first.
    #[must_use]
    pub fn from_words(a: u64, b: u64, c: u64) -> Self {
        let mut bytes = [0u8; Self::STORED_SIZE];

        for (slot, word) in [a, b, c].into_iter().enumerate() {
            let start = Self::FIRST_WORD_OFFSET + slot * Self::WORD_SIZE;
            bytes[start..start + Self::WORD_SIZE].copy_from_slice(&word.to_be_bytes());
        }

        Self(bytes)
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; Self::STORED_SIZE]) -> Self {
        Self(bytes)
    }

    /// Split back into the three packed fields.
    #[must_use]
    pub fn words(&self) -> [u64; 3] {
        let mut out = [0u64; 3];

        for (slot, word) in out.iter_mut().enumerate() {
            let start = Self::FIRST_WORD_OFFSET + slot * Self::WORD_SIZE;
            let mut buf = [0u8; Self::WORD_SIZE];
            buf.copy_from_slice(&self.0[start..start + Self::WORD_SIZE]);
            *word = u64::from_be_bytes(buf);
        }

        out
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::STORED_SIZE] {
        &self.0
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; Self::STORED_SIZE] {
        self.0
    }
}

impl fmt::Display for Key256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

/// Concatenate two fields into a 128-bit key, `a` in the high half.
#[must_use]
pub fn combine2(a: u64, b: u64) -> u128 {
    (u128::from(a) << u64::BITS) | u128::from(b)
}

/// Concatenate three fields into a 256-bit key, `a` most significant.
#[must_use]
pub fn combine3(a: u64, b: u64, c: u64) -> Key256 {
    Key256::from_words(a, b, c)
}

/// Keys whose first field equals `a`, for a two-field composite.
#[must_use]
pub fn prefix_range2(a: u64) -> RangeInclusive<u128> {
    combine2(a, 0)..=combine2(a, u64::MAX)
}

/// Keys whose first field equals `a`, for a three-field composite.
#[must_use]
pub fn prefix_range3(a: u64) -> RangeInclusive<Key256> {
    combine3(a, 0, 0)..=combine3(a, u64::MAX, u64::MAX)
}

/// Keys whose first two fields equal `(a, b)`, for a three-field composite.
#[must_use]
pub fn prefix_range3_ab(a: u64, b: u64) -> RangeInclusive<Key256> {
    combine3(a, b, 0)..=combine3(a, b, u64::MAX)
}

///
/// KeyField
///
/// A value usable as one field of a composite key.
/// `to_key_field` narrows without checking (caller responsibility);
/// `try_to_key_field` is the checked form.
///

pub trait KeyField: Copy {
    const TYPE_NAME: &'static str;

    fn to_key_field(self) -> u64;

    fn try_to_key_field(self) -> Option<u64>;
}

macro_rules! impl_key_field {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl KeyField for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_lossless,
                    clippy::unnecessary_cast
                )]
                fn to_key_field(self) -> u64 {
                    self as u64
                }

                fn try_to_key_field(self) -> Option<u64> {
                    u64::try_from(self).ok()
                }
            }
        )*
    };
}

impl_key_field!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl KeyField for bool {
    const TYPE_NAME: &'static str = "bool";

    fn to_key_field(self) -> u64 {
        u64::from(self)
    }

    fn try_to_key_field(self) -> Option<u64> {
        Some(u64::from(self))
    }
}

impl KeyField for EncodedKey {
    const TYPE_NAME: &'static str = "EncodedKey";

    fn to_key_field(self) -> u64 {
        self.get()
    }

    fn try_to_key_field(self) -> Option<u64> {
        Some(self.get())
    }
}

///
/// CompositeFields
///
/// A tuple of two or three key fields, combined most significant first.
///

pub trait CompositeFields {
    type Key: Copy + Ord;

    fn combine(self) -> Self::Key;

    fn try_combine(self) -> Result<Self::Key, KeyEncodeError>;
}

fn narrow<F: KeyField>(value: F, field: usize) -> Result<u64, KeyEncodeError> {
    value.try_to_key_field().ok_or(KeyEncodeError::FieldNarrowing {
        field,
        type_name: F::TYPE_NAME,
    })
}

impl<A: KeyField, B: KeyField> CompositeFields for (A, B) {
    type Key = u128;

    fn combine(self) -> Self::Key {
        combine2(self.0.to_key_field(), self.1.to_key_field())
    }

    fn try_combine(self) -> Result<Self::Key, KeyEncodeError> {
        Ok(combine2(narrow(self.0, 0)?, narrow(self.1, 1)?))
    }
}

impl<A: KeyField, B: KeyField, C: KeyField> CompositeFields for (A, B, C) {
    type Key = Key256;

    fn combine(self) -> Self::Key {
        combine3(
            self.0.to_key_field(),
            self.1.to_key_field(),
            self.2.to_key_field(),
        )
    }

    fn try_combine(self) -> Result<Self::Key, KeyEncodeError> {
        Ok(combine3(
            narrow(self.0, 0)?,
            narrow(self.1, 1)?,
            narrow(self.2, 2)?,
        ))
    }
}

/// Combine a tuple of fields, narrowing each one unchecked.
pub fn combine<F: CompositeFields>(fields: F) -> F::Key {
    fields.combine()
}

/// Combine a tuple of fields, failing if any field does not fit in 64 bits.
pub fn try_combine<F: CompositeFields>(fields: F) -> Result<F::Key, KeyEncodeError> {
    fields.try_combine()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine2_places_first_field_high() {
        let key = combine2(1, 2);

        assert_eq!(key, (1u128 << 64) | 2);
        assert_eq!((key >> 64) as u64, 1);
        assert_eq!(key as u64, 2);
    }

    #[test]
    fn combine2_never_sign_extends_low_field() {
        let key = combine2(0, u64::MAX);
        assert_eq!(key, u128::from(u64::MAX));
    }

    #[test]
    fn key256_layout_is_zero_prefixed_big_endian() {
        let key = combine3(0x0102_0304_0506_0708, 0, u64::MAX);
        let bytes = key.to_bytes();

        assert_eq!(&bytes[..8], &[0; 8]);
        assert_eq!(&bytes[8..16], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&bytes[16..24], &[0; 8]);
        assert_eq!(&bytes[24..], &[0xFF; 8]);
    }

    #[test]
    fn generic_combine_dispatches_on_arity() {
        let pair: u128 = combine((3u32, 4u8));
        let triple: Key256 = combine((3u16, 4u64, 5usize));

        assert_eq!(pair, combine2(3, 4));
        assert_eq!(triple, combine3(3, 4, 5));
    }

    #[test]
    fn generic_combine_narrows_unchecked() {
        let key: u128 = combine((u128::from(u64::MAX) + 2, -1i32));

        assert_eq!(key, combine2(1, u64::MAX));
    }

    #[test]
    fn try_combine_reports_the_offending_field() {
        let err = try_combine((1u64, 2u64, -3i64)).expect_err("negative field must not narrow");

        assert_eq!(
            err,
            KeyEncodeError::FieldNarrowing {
                field: 2,
                type_name: "i64",
            }
        );
        assert_eq!(try_combine((1u32, 2i8)), Ok(combine2(1, 2)));
    }

    #[test]
    fn prefix_ranges_cover_exactly_the_prefix() {
        let range = prefix_range2(7);
        assert!(range.contains(&combine2(7, 0)));
        assert!(range.contains(&combine2(7, u64::MAX)));
        assert!(!range.contains(&combine2(6, u64::MAX)));
        assert!(!range.contains(&combine2(8, 0)));

        let range = prefix_range3_ab(7, 9);
        assert!(range.contains(&combine3(7, 9, 123)));
        assert!(!range.contains(&combine3(7, 10, 0)));
        assert!(prefix_range3(7).contains(&combine3(7, 10, 0)));
    }

    #[test]
    fn key256_displays_as_hex() {
        let text = combine3(0, 0, 0xAB).to_string();

        assert_eq!(text.len(), 2 + 64);
        assert!(text.ends_with("ab"));
    }
}
