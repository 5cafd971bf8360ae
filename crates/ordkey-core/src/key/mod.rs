//! Module: key
//! Responsibility: order-preserving key construction for secondary indexes.
//! Does not own: index storage or maintenance (see `store`).
//! Boundary: every encoder here is a pure function; nothing decodes.

mod alternative;
mod composite;
mod dispatch;
mod error;
mod text;
mod variant;


pub use alternative::KeyAlternative;
pub use composite::{
    CompositeFields, Key256, KeyField, combine, combine2, combine3, prefix_range2, prefix_range3,
    prefix_range3_ab, try_combine,
};
pub use dispatch::{AlternativeInfo, AlternativeList, AlternativeVisitor, dispatch};
pub use error::KeyEncodeError;
pub use text::{STRING_KEY_LEN, StringKey, encode_string};
pub use variant::{
    EncodedKey, MAGNITUDE_BITS, MAX_ALTERNATIVES, MAX_MAGNITUDE, TAG_BITS, TaggedKey,
    alternative_range, encode, encode_parts, key_range, max_key, min_key,
};
