use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("{record} #{id} not found")]
    NotFound { record: &'static str, id: u64 },

    #[error("{record} #{id} already exists")]
    DuplicateId { record: &'static str, id: u64 },

    #[error("{record} initializer returned id #{found}, expected #{expected}")]
    IdMismatch {
        record: &'static str,
        expected: u64,
        found: u64,
    },

    #[error("{record} #{id} cannot change its primary id (mutator set #{found})")]
    PrimaryKeyChanged {
        record: &'static str,
        id: u64,
        found: u64,
    },
}
