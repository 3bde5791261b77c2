//! Messenger JSON fragment decoding.
//!
//! A conversation export is split into fragment files (`message_1.json`,
//! `message_2.json`, ...). Each fragment holds a `participants` array and a
//! `messages` array. This module owns the raw serde shapes and
//! [`decode_message`], which normalizes one raw record into a [`Message`].
//!
//! Messages are kept as [`serde_json::Value`] inside [`MessengerExport`] so
//! that one bad record surfaces as a [`DecodeError`] for that record instead
//! of failing the whole file at deserialization time.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::Message;
use crate::encoding::RepairMode;
use crate::error::{DecodeError, RepairError};
use crate::message::{ContentType, URI_SEPARATOR};

/// One fragment file.
#[derive(Debug, Deserialize)]
pub struct MessengerExport {
    /// Participants still in the conversation when the export was made.
    #[serde(default)]
    pub participants: Vec<MessengerParticipant>,
    pub messages: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct MessengerParticipant {
    pub name: String,
}

/// Raw Messenger message structure for deserialization.
#[derive(Debug, Deserialize)]
pub struct MessengerRawMessage {
    pub sender_name: String,
    pub timestamp_ms: i64,
    /// Platform type ("Generic", "Share", "Call", ...)
    #[serde(rename = "type")]
    pub msg_type: String,
    // Payload keys are absent or hold a value; `null` is a shape error.
    #[serde(default, deserialize_with = "non_null")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub photos: Option<Vec<MessengerMedia>>,
    #[serde(default, deserialize_with = "non_null")]
    pub files: Option<Vec<MessengerMedia>>,
    #[serde(default, deserialize_with = "non_null")]
    pub sticker: Option<MessengerMedia>,
}

/// Deserializes a key that is present, so it must not be `null`.
fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Photo, file or sticker reference.
#[derive(Debug, Deserialize)]
pub struct MessengerMedia {
    pub uri: String,
}

impl MessengerExport {
    /// Declared participant names, each repaired with `mode`.
    pub fn participant_names(
        &self,
        mode: RepairMode,
    ) -> impl Iterator<Item = Result<String, RepairError>> + '_ {
        self.participants
            .iter()
            .map(move |p| mode.apply(&p.name).map(Cow::into_owned))
    }
}

fn join_uris<'a>(uris: impl IntoIterator<Item = &'a MessengerMedia>) -> String {
    let mut content = String::new();
    for media in uris {
        content.push_str(&media.uri);
        content.push(URI_SEPARATOR);
    }
    content
}

/// Picks the payload by fixed priority: text, photos, files, sticker.
fn classify(
    raw: &MessengerRawMessage,
    mode: RepairMode,
) -> Result<(ContentType, String), DecodeError> {
    if let Some(text) = &raw.content {
        return Ok((ContentType::Message, mode.apply(text)?.into_owned()));
    }
    if let Some(photos) = &raw.photos {
        return Ok((ContentType::Photos, join_uris(photos)));
    }
    if let Some(files) = &raw.files {
        return Ok((ContentType::Files, join_uris(files)));
    }
    if let Some(sticker) = &raw.sticker {
        return Ok((ContentType::Sticker, join_uris([sticker])));
    }
    Err(DecodeError::NoContent)
}

/// Decodes a typed raw message.
pub fn parse_messenger_message(
    raw: &MessengerRawMessage,
    mode: RepairMode,
) -> Result<Message, DecodeError> {
    let (content_type, content) = classify(raw, mode)?;
    let sender = mode.apply(&raw.sender_name)?.into_owned();

    Message::new(sender, raw.timestamp_ms, &raw.msg_type, content_type, content)
        .ok_or(DecodeError::TimestampOutOfRange(raw.timestamp_ms))
}

/// Decodes one raw JSON record into a [`Message`].
///
/// # Example
///
/// ```
/// use convostat::encoding::RepairMode;
/// use convostat::parsing::messenger::decode_message;
/// use convostat::ContentType;
/// use serde_json::json;
///
/// let raw = json!({
///     "sender_name": "Bob",
///     "timestamp_ms": 1705315860000_i64,
///     "type": "Generic",
///     "sticker": {"uri": "s.png"}
/// });
/// let msg = decode_message(&raw, RepairMode::Strict).unwrap();
/// assert_eq!(msg.content_type, ContentType::Sticker);
/// assert_eq!(msg.content, "s.png;");
/// ```
pub fn decode_message(value: &Value, mode: RepairMode) -> Result<Message, DecodeError> {
    let raw = MessengerRawMessage::deserialize(value)?;
    parse_messenger_message(&raw, mode)
}
