use thiserror::Error;

/// Every fallible operation in this crate returns this alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Tagged error variant shared by the PE container, metadata directory,
/// tables stream, signature parser, and semantic model.
///
/// Parse errors on optional sub-structures are recovered by the caller
/// (the affected field becomes `None`); parse errors on the PE headers,
/// CLI header, or required heaps are fatal for the file being read.
/// Comparisons and lookups never produce an `Error`; they return `bool`
/// or `Option`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid PE file: {reason}")]
    InvalidPE { reason: String },

    #[error("insufficient data at offset {at_offset:#x}")]
    InsufficientData { at_offset: usize },

    #[error("malformed encoding: {kind}")]
    MalformedEncoding { kind: String },

    #[error("unknown element type byte {byte:#04x}")]
    UnknownElementType { byte: u8 },

    #[error("missing required stream {name:?}")]
    MissingStream { name: String },

    #[error("invalid metadata token {token:#010x}")]
    InvalidToken { token: u32 },

    #[error("could not resolve {reference}")]
    ResolutionFailure { reference: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_pe(reason: impl Into<String>) -> Error {
        Error::InvalidPE { reason: reason.into() }
    }

    pub fn insufficient_data(at_offset: usize) -> Error {
        Error::InsufficientData { at_offset }
    }

    pub fn malformed_encoding(kind: impl Into<String>) -> Error {
        Error::MalformedEncoding { kind: kind.into() }
    }

    pub fn missing_stream(name: impl Into<String>) -> Error {
        Error::MissingStream { name: name.into() }
    }

    pub fn invalid_token(token: u32) -> Error {
        Error::InvalidToken { token }
    }

    pub fn resolution_failure(reference: impl Into<String>) -> Error {
        Error::ResolutionFailure { reference: reference.into() }
    }
}
