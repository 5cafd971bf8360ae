//! Core runtime for ordkey: order-preserving secondary-index keys, index
//! descriptors, a reference record store, and the observability plumbing
//! they report through. The `prelude` carries the domain vocabulary.
#![warn(unreachable_pub)]

extern crate self as ordkey;

// public exports are one module level down
pub mod config;
pub mod error;
pub mod key;
pub mod model;
pub mod obs;
pub mod store;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Domain vocabulary only: key builders, record traits, index descriptors.
/// Traits are imported as `_` so their methods resolve without name clashes.
///

pub mod prelude {
    pub use crate::{
        key::{
            EncodedKey, Key256, StringKey, TaggedKey as _, combine, combine2, combine3,
            encode_string, max_key, min_key,
        },
        model::{IndexKey, KeyKind, Payer, Record, RecordId, SecondaryIndex},
    };
}
