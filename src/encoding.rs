//! Repair of Meta's double-encoded export text (mojibake).
//!
//! Messenger exports store UTF-8 text as if every byte were an ISO-8859-1
//! character. `"Café"` arrives as `"CafÃ©"`, one `char` per byte.
//!
//! [`repair_text`] reverses that: every `char` is narrowed back to its byte
//! value and the byte string is decoded as UTF-8.
//!
//! Preconditions: every `char` of the input is in `U+0000..=U+00FF`.
//! Postcondition: the output is the UTF-8 text the bytes encode. ASCII input
//! comes back unchanged.
//!
//! When the precondition fails, or the bytes are not UTF-8, the repair is
//! reported as a [`RepairError`] instead of returning mangled text. How such
//! failures are handled is chosen by [`RepairMode`].
//!
//! # Example
//!
//! ```
//! use convostat::encoding::{mis_encode, repair_text};
//!
//! let garbled = mis_encode("Café");
//! assert_eq!(garbled, "CafÃ©");
//! assert_eq!(repair_text(&garbled).unwrap(), "Café");
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::RepairError;

/// Reverses the Latin-1 mis-decoding of UTF-8 text.
pub fn repair_text(s: &str) -> Result<String, RepairError> {
    let mut bytes = Vec::with_capacity(s.len());
    for ch in s.chars() {
        let byte = u8::try_from(u32::from(ch)).map_err(|_| RepairError::NotLatin1 { ch })?;
        bytes.push(byte);
    }
    Ok(String::from_utf8(bytes)?)
}

/// Produces the mojibake form of `s`: its UTF-8 bytes read as Latin-1.
///
/// This is what Meta's exporter does to every text field. Mostly useful for
/// building fixtures.
pub fn mis_encode(s: &str) -> String {
    s.bytes().map(char::from).collect()
}

/// How text fields are repaired while decoding records.
///
/// The same mode applies to sender names, message text and declared
/// participant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairMode {
    /// Repair every field; a failed repair is a decode error.
    #[default]
    Strict,

    /// Repair every field; keep the original text when repair fails.
    Lenient,

    /// Leave text exactly as exported.
    Off,
}

impl RepairMode {
    /// Applies this mode to one text field.
    pub fn apply<'a>(&self, s: &'a str) -> Result<Cow<'a, str>, RepairError> {
        if s.is_ascii() || *self == RepairMode::Off {
            return Ok(Cow::Borrowed(s));
        }
        match repair_text(s) {
            Ok(fixed) => Ok(Cow::Owned(fixed)),
            Err(_) if *self == RepairMode::Lenient => Ok(Cow::Borrowed(s)),
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Display for RepairMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairMode::Strict => write!(f, "strict"),
            RepairMode::Lenient => write!(f, "lenient"),
            RepairMode::Off => write!(f, "off"),
        }
    }
}
