//! Normalized message type for Messenger conversation exports.
//!
//! The decoder in [`parsing::messenger`](crate::parsing::messenger) turns every
//! raw JSON record into a [`Message`]. Messages are plain values: once built
//! they are never modified, and every statistic in
//! [`Conversation`](crate::Conversation) is computed from them.
//!
//! # Examples
//!
//! ```
//! use convostat::{ContentType, Message};
//!
//! let msg = Message::text("Alice", 1705315800000, "hello world").unwrap();
//! assert_eq!(msg.content_type, ContentType::Message);
//! assert!(msg.is_generic_text());
//! assert_eq!(msg.char_count(), 11);
//!
//! let photos = Message::new("Bob", 1705315860000, "Generic", ContentType::Photos, "a.jpg;b.jpg;")
//!     .unwrap();
//! assert_eq!(photos.attachment_count(), 2);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform type of ordinary chat messages.
pub const GENERIC: &str = "Generic";

/// Separator appended after every attachment URI in [`Message::content`].
pub const URI_SEPARATOR: char = ';';

/// What a message carries.
///
/// Exactly one variant is chosen per record, by trying the raw keys in
/// declaration order: `content`, `photos`, `files`, `sticker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Plain text; `content` is the text itself
    Message,

    /// One or more photos; `content` is their URIs
    Photos,

    /// One or more files; `content` is their URIs
    Files,

    /// A single sticker; `content` is its URI
    Sticker,
}

impl ContentType {
    /// Returns every content type in decoding priority order.
    pub fn all() -> &'static [ContentType] {
        &[
            ContentType::Message,
            ContentType::Photos,
            ContentType::Files,
            ContentType::Sticker,
        ]
    }

    /// Returns the JSON key this content type is read from.
    pub fn key(&self) -> &'static str {
        match self {
            ContentType::Message => "content",
            ContentType::Photos => "photos",
            ContentType::Files => "files",
            ContentType::Sticker => "sticker",
        }
    }

    /// Returns `true` for the URI-carrying variants.
    pub fn is_attachment(&self) -> bool {
        !matches!(self, ContentType::Message)
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Message => write!(f, "message"),
            ContentType::Photos => write!(f, "photos"),
            ContentType::Files => write!(f, "files"),
            ContentType::Sticker => write!(f, "sticker"),
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "message" | "text" => Ok(ContentType::Message),
            "photos" | "photo" => Ok(ContentType::Photos),
            "files" | "file" => Ok(ContentType::Files),
            "sticker" => Ok(ContentType::Sticker),
            _ => Err(format!(
                "Unknown content type: '{}'. Expected one of: message, photos, files, sticker",
                s
            )),
        }
    }
}

/// One decoded message of a conversation.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `sender` | `String` | Display name of the author, after encoding repair |
/// | `timestamp` | `DateTime<Utc>` | When the message was sent |
/// | `platform_type` | `String` | `"Generic"` for ordinary messages |
/// | `content_type` | [`ContentType`] | What the message carries |
/// | `content` | `String` | Text, or `;`-terminated attachment URIs |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the author.
    pub sender: String,

    /// When the message was sent.
    pub timestamp: DateTime<Utc>,

    /// Platform classification such as `"Generic"`.
    ///
    /// Structural records (calls, shares, subscriptions) carry other values.
    pub platform_type: String,

    /// What the message carries.
    pub content_type: ContentType,

    /// Text for [`ContentType::Message`]; otherwise every attachment URI
    /// followed by `;`.
    pub content: String,
}

impl Message {
    /// Creates a message from a millisecond timestamp.
    ///
    /// Returns `None` if the timestamp cannot be represented as a date.
    pub fn new(
        sender: impl Into<String>,
        timestamp_ms: i64,
        platform_type: impl Into<String>,
        content_type: ContentType,
        content: impl Into<String>,
    ) -> Option<Self> {
        let timestamp = DateTime::from_timestamp_millis(timestamp_ms)?;
        Some(Self {
            sender: sender.into(),
            timestamp,
            platform_type: platform_type.into(),
            content_type,
            content: content.into(),
        })
    }

    /// Creates a `Generic` text message.
    pub fn text(
        sender: impl Into<String>,
        timestamp_ms: i64,
        content: impl Into<String>,
    ) -> Option<Self> {
        Self::new(sender, timestamp_ms, GENERIC, ContentType::Message, content)
    }

    /// Returns the timestamp as milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Returns `true` if this is an ordinary text message.
    ///
    /// Only these messages contribute to character counts.
    pub fn is_generic_text(&self) -> bool {
        self.content_type == ContentType::Message && self.platform_type == GENERIC
    }

    /// Number of characters (Unicode scalar values) in the content.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Number of attachments referenced by this message.
    ///
    /// Text messages have none, whatever their content.
    pub fn attachment_count(&self) -> usize {
        if self.content_type.is_attachment() {
            self.content.matches(URI_SEPARATOR).count()
        } else {
            0
        }
    }

    /// Iterates over attachment URIs. Empty for text messages.
    pub fn attachments(&self) -> impl Iterator<Item = &str> {
        let content = if self.content_type.is_attachment() {
            self.content.as_str()
        } else {
            ""
        };
        content.split_terminator(URI_SEPARATOR)
    }
}
