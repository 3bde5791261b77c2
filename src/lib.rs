//! # Convostat
//!
//! A Rust library for turning a Facebook Messenger JSON conversation export
//! into statistics: who talks the most, when, and with which words.
//!
//! ## Overview
//!
//! A Messenger export stores one conversation as a directory of fragment
//! files (`message_1.json`, `message_2.json`, ...). Convostat:
//!
//! - walks the directory and decodes every fragment
//! - repairs Messenger's mis-encoded text (UTF-8 bytes stored as Latin-1
//!   code points, the classic `Ã©` for `é` mojibake)
//! - classifies each message as text, photos, files or sticker
//! - reconstructs the full participant set, including people who left
//! - computes per-participant, temporal and lexical aggregates on demand
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use convostat::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = IngestConfig::new().with_zone(Zone::Utc);
//!     let conv = load("messages/inbox/friends_abc123".as_ref(), &config)?;
//!
//!     for (name, count) in conv.messages_per_participant() {
//!         println!("{name}: {count}");
//!     }
//!     println!("{:?}", conv.most_active_days(5));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`loader`] - [`load`](loader::load) a directory, or
//!   [`load_fragments`](loader::load_fragments) from memory
//! - [`collector`] - fragment file discovery
//! - [`parsing`] - raw Messenger JSON shapes and record decoding
//! - [`encoding`] - mojibake repair ([`RepairMode`](encoding::RepairMode))
//! - [`participants`] - participant set reconstruction
//! - [`temporal`] - time zones ([`Zone`](temporal::Zone)) and calendar fields
//! - [`conversation`] - [`Conversation`] and its aggregates
//! - [`report`] - a serializable snapshot of all aggregates
//! - [`config`] - [`IngestConfig`](config::IngestConfig)
//! - [`error`] - [`ConvoError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod collector;
pub mod config;
pub mod conversation;
pub mod encoding;
pub mod error;
pub mod loader;
pub mod message;
pub mod parsing;
pub mod participants;
pub mod report;
pub mod temporal;

// Re-export the main types at the crate root for convenience
pub use conversation::Conversation;
pub use error::{ConvoError, Result};
pub use message::{ContentType, Message};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use convostat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{ContentType, Conversation, Message};

    pub use crate::error::{ConvoError, Result};

    pub use crate::config::{IngestConfig, InvalidRecordPolicy};
    pub use crate::encoding::RepairMode;
    pub use crate::participants::ParticipantSource;
    pub use crate::temporal::{Calendar, Zone};

    pub use crate::loader::{load, load_fragments};
    pub use crate::report::{Report, ReportOptions, WordQuery};
}
