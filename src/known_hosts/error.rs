// ABOUTME: Error taxonomy for known_hosts parsing and matching
// ABOUTME: Distinguishes base64 failures, binary framing violations, and line-format problems

use thiserror::Error;

/// Failure decoding the binary public-key blob embedded in a record.
#[derive(Debug, Error)]
pub enum KeyBlobError {
    /// The base64 wrapper itself is malformed.
    #[error("invalid base64 in key")]
    Base64(#[from] base64::DecodeError),
    /// Fewer than four bytes remain where a length prefix is expected.
    #[error("truncated key blob: {remaining} bytes left where a 4-byte length prefix was expected")]
    TruncatedPrefix { remaining: usize },
    /// A length prefix declares more bytes than remain in the buffer.
    #[error("truncated key blob: field declares {declared} bytes but only {remaining} remain")]
    TruncatedField { declared: usize, remaining: usize },
}

/// Failure parsing one known_hosts line.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("host field is neither a hostname nor a |1|salt|digest triple")]
    MalformedHostField,
    #[error("invalid base64 in hashed host field")]
    HashedHostEncoding(#[source] base64::DecodeError),
    #[error("invalid public key")]
    Key(#[from] KeyBlobError),
}

/// A hash-mode record uses an algorithm tag other than "1".
///
/// Raised lazily when the record is actually matched against, not at parse
/// time, since an unqueried record never needs its hash evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported host hash type {0:?}")]
pub struct UnsupportedHashType(pub String);

/// Failure loading a whole known_hosts file in strict mode.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read known_hosts file")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: RecordError,
    },
}
