use crate::{config::ConfigError, key::KeyEncodeError, model::IndexError, store::StoreError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every fallible operation in this crate surfaces one of these; the
/// origin-specific detail (if any) is kept alongside for callers that
/// want to match on it.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without a structured detail payload.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct an index-origin invariant violation.
    pub(crate) fn index_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Index,
            message.into(),
        )
    }

    /// Construct a store-origin invariant violation.
    pub(crate) fn store_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Store,
            message.into(),
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    /// Whether this error must abort the enclosing transaction outright.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.class, ErrorClass::InvariantViolation)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }

    /// Borrow the key-encoding detail, if this error came from the key layer.
    #[must_use]
    pub const fn key_detail(&self) -> Option<&KeyEncodeError> {
        match &self.detail {
            Some(ErrorDetail::Key(err)) => Some(err),
            _ => None,
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Key(KeyEncodeError),
    #[error("{0}")]
    Index(IndexError),
    #[error("{0}")]
    Store(StoreError),
}

impl From<KeyEncodeError> for InternalError {
    fn from(err: KeyEncodeError) -> Self {
        let class = match err {
            KeyEncodeError::InvalidDispatchIndex { .. } | KeyEncodeError::KeyOverflow { .. } => {
                ErrorClass::InvariantViolation
            }
            KeyEncodeError::FieldNarrowing { .. } => ErrorClass::Unsupported,
        };

        Self {
            class,
            origin: ErrorOrigin::Key,
            message: err.to_string(),
            detail: Some(ErrorDetail::Key(err)),
        }
    }
}

impl From<IndexError> for InternalError {
    fn from(err: IndexError) -> Self {
        let class = match err {
            IndexError::DuplicateIndex { .. } | IndexError::DuplicateRecord { .. } => {
                ErrorClass::Conflict
            }
            IndexError::UnknownIndex { .. } => ErrorClass::NotFound,
            IndexError::KindMismatch { .. } | IndexError::Divergence { .. } => {
                ErrorClass::InvariantViolation
            }
        };

        Self {
            class,
            origin: ErrorOrigin::Index,
            message: err.to_string(),
            detail: Some(ErrorDetail::Index(err)),
        }
    }
}

impl From<StoreError> for InternalError {
    fn from(err: StoreError) -> Self {
        let class = match err {
            StoreError::NotFound { .. } => ErrorClass::NotFound,
            StoreError::DuplicateId { .. } => ErrorClass::Conflict,
            StoreError::IdMismatch { .. } | StoreError::PrimaryKeyChanged { .. } => {
                ErrorClass::InvariantViolation
            }
        };

        Self {
            class,
            origin: ErrorOrigin::Store,
            message: err.to_string(),
            detail: Some(ErrorDetail::Store(err)),
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Internal,
    Conflict,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Index,
    Key,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Index => "index",
            Self::Key => "key",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}
