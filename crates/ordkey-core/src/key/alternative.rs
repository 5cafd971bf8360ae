///
/// KeyAlternative
///
/// A payload type that may appear as one alternative of a tagged key.
/// The magnitude must be a lossless widening of the payload; it is
/// checked against the 61-bit budget at encode time, not here.
///

pub trait KeyAlternative {
    /// Type label used when reporting an overflowing alternative.
    const TYPE_NAME: &'static str;

    fn to_magnitude(&self) -> u64;
}

macro_rules! impl_key_alternative_unsigned {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl KeyAlternative for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn to_magnitude(&self) -> u64 {
                    u64::from(*self)
                }
            }
        )*
    };
}

// Signed payloads sign-extend, so any negative value lands above the
// 61-bit budget and is rejected as an overflow.
macro_rules! impl_key_alternative_signed {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl KeyAlternative for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn to_magnitude(&self) -> u64 {
                    i64::from(*self).cast_unsigned()
                }
            }
        )*
    };
}

impl_key_alternative_unsigned!(bool, u8, u16, u32, u64);
impl_key_alternative_signed!(i8, i16, i32, i64);

impl KeyAlternative for usize {
    const TYPE_NAME: &'static str = "usize";

    fn to_magnitude(&self) -> u64 {
        u64::try_from(*self).unwrap_or(u64::MAX)
    }
}

impl<T: KeyAlternative> KeyAlternative for &T {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn to_magnitude(&self) -> u64 {
        T::to_magnitude(self)
    }
}
