//! Unified error types for convostat.
//!
//! Two layers of errors exist:
//!
//! - [`ConvoError`] is returned to callers. It covers failures that stop an
//!   ingestion run outright: a missing input directory, an unreadable file,
//!   a fragment that is not valid JSON, or a bad time zone string.
//! - [`DecodeError`] describes why a single message record could not be
//!   turned into a [`Message`](crate::Message). It never escapes
//!   [`load`](crate::loader::load); instead it drives the configured
//!   [`InvalidRecordPolicy`](crate::config::InvalidRecordPolicy).
//!
//! [`RepairError`] is the failure mode of the mojibake repair step in
//! [`encoding`](crate::encoding).

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// A specialized [`Result`] type for convostat operations.
///
/// # Example
///
/// ```rust
/// use convostat::error::Result;
/// use convostat::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ConvoError>;

/// The error type for all convostat operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvoError {
    /// The conversation directory is missing or is not a directory.
    #[error("Conversation directory not found: {}", path.display())]
    DirectoryNotFound {
        /// The path that was requested
        path: PathBuf,
    },

    /// An I/O error occurred while walking or reading fragment files.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A fragment file is not valid JSON or lacks the `messages` array.
    #[error("Malformed fragment {}: {source}", path.display())]
    MalformedJson {
        /// The fragment file that failed to parse
        path: PathBuf,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A time zone string could not be parsed.
    ///
    /// Accepted forms are `utc`, `local`, a fixed offset such as `+02:00`,
    /// or an IANA name such as `Europe/Paris`.
    #[error("Invalid time zone '{input}'. Expected utc, local, +HH:MM or an IANA name")]
    InvalidTimezone {
        /// The string that was provided
        input: String,
    },

    /// A report could not be written as JSON.
    #[error("Failed to serialize report: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl From<walkdir::Error> for ConvoError {
    fn from(err: walkdir::Error) -> Self {
        let message = err.to_string();
        match err.into_io_error() {
            Some(io_err) => ConvoError::Io(io_err),
            None => ConvoError::Io(io::Error::other(message)),
        }
    }
}

impl ConvoError {
    /// Creates a directory-not-found error.
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        ConvoError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a malformed-fragment error.
    pub fn malformed_json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ConvoError::MalformedJson {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid time zone error.
    pub fn invalid_timezone(input: impl Into<String>) -> Self {
        ConvoError::InvalidTimezone {
            input: input.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ConvoError::Io(_))
    }

    /// Returns `true` if the input directory was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConvoError::DirectoryNotFound { .. })
    }

    /// Returns `true` if a fragment file could not be parsed.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ConvoError::MalformedJson { .. })
    }

    /// Returns `true` if this is a time zone error.
    pub fn is_invalid_timezone(&self) -> bool {
        matches!(self, ConvoError::InvalidTimezone { .. })
    }
}

/// Why a single message record could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The sender name or text content could not be repaired.
    #[error("text repair failed: {0}")]
    Repair(#[from] RepairError),

    /// A required field (`sender_name`, `timestamp_ms`, `type`) is missing or
    /// has the wrong type.
    #[error("unexpected record shape: {0}")]
    Shape(#[from] serde_json::Error),

    /// None of `content`, `photos`, `files` or `sticker` is present.
    #[error("record has no content, photos, files or sticker")]
    NoContent,

    /// `timestamp_ms` cannot be represented as a date.
    #[error("timestamp {0} ms is out of range")]
    TimestampOutOfRange(i64),
}

/// Failure of the mojibake repair step.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepairError {
    /// The text holds a character above U+00FF, so it was never produced by
    /// mis-decoding UTF-8 bytes as Latin-1.
    #[error("character {ch:?} is outside the Latin-1 range")]
    NotLatin1 {
        /// The first offending character
        ch: char,
    },

    /// The recovered bytes are not valid UTF-8.
    #[error("recovered bytes are not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}
