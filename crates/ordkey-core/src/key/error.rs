use thiserror::Error as ThisError;

///
/// KeyEncodeError
///
/// Failures raised while deriving an index key.
/// `InvalidDispatchIndex` and `KeyOverflow` are fatal: they abort the
/// enclosing transaction and are never retried.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyEncodeError {
    #[error("alternative index {index} is out of range for a union of {alternatives} alternatives")]
    InvalidDispatchIndex { index: usize, alternatives: usize },

    #[error(
        "alternative '{alternative}' ({type_name}, position {position}) has magnitude {magnitude}, which does not fit in 61 bits"
    )]
    KeyOverflow {
        alternative: &'static str,
        type_name: &'static str,
        position: u8,
        magnitude: u64,
    },

    #[error("composite key field {field} ({type_name}) does not fit in 64 bits")]
    FieldNarrowing {
        field: usize,
        type_name: &'static str,
    },
}
