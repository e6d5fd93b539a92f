//! Error types for the JSON codec

use thiserror::Error;

/// Everything that can go wrong while encoding or decoding a map. Both kinds
/// are fatal to the operation that raised them.
#[derive(Error, Debug)]
pub enum Error {
    /// serde_json refused to write a key or value: a key that isn't a
    /// string, a `Serialize` impl that failed, or the writer itself failing.
    /// Any bytes already written are unusable.
    #[error("JSON encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// The input was not a well-formed JSON object.
    #[error("JSON parse error: {0}")]
    Parse(#[source] serde_json::Error),
}

impl Error {
    pub fn is_encode(&self) -> bool {
        matches!(self, Error::Encode(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// The underlying serde_json error.
    pub fn inner(&self) -> &serde_json::Error {
        match self {
            Error::Encode(e) | Error::Parse(e) => e,
        }
    }

    /// One-based line of the input at which decoding failed. Zero for
    /// encode errors.
    pub fn line(&self) -> usize {
        self.inner().line()
    }

    /// One-based column of the input at which decoding failed. Zero for
    /// encode errors.
    pub fn column(&self) -> usize {
        self.inner().column()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
