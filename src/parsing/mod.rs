//! Parsing of export fragment files.
//!
//! Only the Messenger JSON shape is supported. The raw serde types and the
//! record decoder live in [`messenger`].

pub mod messenger;

// Re-export commonly used items
pub use messenger::{MessengerExport, MessengerRawMessage, decode_message};
