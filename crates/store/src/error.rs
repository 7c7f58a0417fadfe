//! # Store Errors
//!
//! [`StoreError`] is what every store operation returns; [`StoreError::kind`] folds it, wrapped
//! cipher and codec failures included, onto the small [`ErrorKind`] taxonomy hosts branch on.

use lss_cipher::CipherError;
use lss_codec::CodecError;
use std::borrow::Cow;

/// A specialized [`StoreError`] enum of this crate.
#[lss_derive::lss_error]
pub enum StoreError {
    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The key channel never held this session's key; the store refuses every operation.
    #[error("Storage unavailable{}: {message}", format_context(.context))]
    StorageUnavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Buffer contents that do not decrypt or decode under the session key.
    #[error("Corrupted entry{}: {message}", format_context(.context))]
    Corrupted { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Cipher failure{}: {source}", format_context(.context))]
    Cipher { source: CipherError, context: Option<Cow<'static, str>> },

    #[error("Codec failure{}: {source}", format_context(.context))]
    Codec { source: CodecError, context: Option<Cow<'static, str>> },

    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Failure classes a host can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidInput,
    StorageUnavailable,
    StorageFull,
    Corrupted,
    Configuration,
}

impl StoreError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
            Self::Corrupted { .. } => ErrorKind::Corrupted,
            Self::Cipher { source, .. } => match source {
                CipherError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
                CipherError::InvalidInput { .. } => ErrorKind::InvalidInput,
                CipherError::Entropy { .. } => ErrorKind::StorageUnavailable,
            },
            Self::Codec { source, .. } => match source {
                CodecError::StorageFull { .. } => ErrorKind::StorageFull,
                CodecError::Malformed { .. } => ErrorKind::Corrupted,
            },
            Self::Config { .. } => ErrorKind::Configuration,
        }
    }

    pub(crate) fn unavailable() -> Self {
        Self::StorageUnavailable {
            message: "the key channel rejected the session key".into(),
            context: None,
        }
    }
}
