//! Reference record store.
//!
//! An in-memory table that keeps its declared secondary indexes in step
//! with every create, modify and erase. It exercises the key-derivation
//! contract end to end; durability is not its concern.

mod error;
mod index;
mod table;
mod view;

#[cfg(test)]
mod tests;

// re-exports
pub use error::StoreError;
pub use table::Table;
pub use view::IndexView;
