use crate::model::KeyKind;
use thiserror::Error as ThisError;

///
/// IndexError
///
/// Failures in index declaration, lookup, or maintenance.
///

#[derive(Debug, ThisError)]
pub enum IndexError {
    #[error("record '{record}' declares index '{index}' more than once")]
    DuplicateIndex {
        record: &'static str,
        index: &'static str,
    },

    #[error("record '{record}' is already registered")]
    DuplicateRecord { record: &'static str },

    #[error("record '{record}' has no index named '{index}'")]
    UnknownIndex { record: &'static str, index: String },

    #[error("index '{record}.{index}' expects {expected} keys but the accessor produced {found}")]
    KindMismatch {
        record: &'static str,
        index: &'static str,
        expected: KeyKind,
        found: KeyKind,
    },

    #[error("index '{record}.{index}' diverged from its rows: {message}")]
    Divergence {
        record: &'static str,
        index: &'static str,
        message: String,
    },
}
