//! Runtime data model: record types and their secondary index declarations.
//!
//! - A record type declares *what exists* (`Record`, `SecondaryIndex`).
//! - The store in `crate::store` decides *what runs*.

mod error;
mod index;
mod record;
mod registry;


pub use error::IndexError;
pub use index::{IndexKey, IndexModel, KeyAccessor, KeyKind, SecondaryIndex};
pub use record::{Payer, Record, RecordId};
pub use registry::{IndexRegistry, validate_indexes};
