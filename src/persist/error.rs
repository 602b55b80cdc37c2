//! Persistence error types.

use thiserror::Error;

use crate::core::CodecError;

/// Errors that can occur while saving or loading a definition.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Serialization to JSON or binary format failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Deserialization from JSON or binary format failed.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The document was written by an unsupported format version.
    #[error("unsupported definition version {found}, supported: {supported}")]
    UnsupportedVersion {
        /// Version recorded in the document.
        found: u32,
        /// Version this crate reads and writes.
        supported: u32,
    },

    /// An identifier or kind in the document failed to decode.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
