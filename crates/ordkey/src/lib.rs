//! ## Crate layout
//! - `config`: store configuration and partition scopes.
//! - `error`: the structured `InternalError` and its classification.
//! - `key`: variant, composite, and string key encoders.
//! - `model`: record traits, index descriptors, and the index registry.
//! - `obs`: metrics events, sinks, and counter snapshots.
//! - `store`: the in-memory reference table and its index views.
//!
//! `#[derive(TaggedKey)]` is re-exported at the crate root; the `prelude`
//! mirrors the vocabulary schema code needs.

pub use ordkey_core as core;
pub use ordkey_core::{config, error, key, model, obs, store};

// export so derive output resolves inside this crate too
extern crate self as ordkey;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use ordkey_derive::TaggedKey;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::TaggedKey;
    pub use ordkey_core::prelude::*;
    pub use ordkey_core::{
        error::InternalError,
        store::{IndexView, Table},
    };
}
