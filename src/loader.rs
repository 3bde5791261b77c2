//! Ingestion of a conversation directory into a [`Conversation`].
//!
//! The pipeline is:
//!
//! 1. [`collect_files`] lists every fragment under the directory.
//! 2. Each fragment is parsed as a [`MessengerExport`]; a file that is not
//!    valid JSON stops the run with [`ConvoError::MalformedJson`].
//! 3. Every record is decoded with [`decode_message`]. What happens on a
//!    decode failure depends on [`InvalidRecordPolicy`]: by default the whole
//!    run yields an empty conversation.
//! 4. Declared participants are merged with all senders.
//!
//! # Example
//!
//! ```rust,no_run
//! use convostat::config::IngestConfig;
//! use convostat::loader::load;
//! use convostat::temporal::Zone;
//!
//! let config = IngestConfig::new().with_zone(Zone::Utc);
//! let conv = load("messages/inbox/alice_abc123".as_ref(), &config)?;
//! println!("{} messages", conv.message_count());
//! # Ok::<(), convostat::ConvoError>(())
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::Message;
use crate::collector::collect_files;
use crate::config::{IngestConfig, InvalidRecordPolicy};
use crate::conversation::Conversation;
use crate::error::{ConvoError, Result};
use crate::parsing::messenger::{MessengerExport, decode_message};
use crate::participants::ParticipantSource;

/// Accumulates decoded fragments until the conversation is built.
struct Ingestion<'a> {
    config: &'a IngestConfig,
    messages: Vec<Message>,
    declared: BTreeSet<String>,
    fragments: usize,
    skipped: usize,
}

impl<'a> Ingestion<'a> {
    fn new(config: &'a IngestConfig) -> Self {
        Self {
            config,
            messages: Vec::new(),
            declared: BTreeSet::new(),
            fragments: 0,
            skipped: 0,
        }
    }

    /// Logs a bad record and decides whether ingestion continues.
    fn reject(
        &mut self,
        origin: &Path,
        what: &str,
        reason: &dyn std::fmt::Display,
    ) -> ControlFlow<()> {
        match self.config.on_invalid {
            InvalidRecordPolicy::Abort => {
                error!(
                    file = %origin.display(),
                    error = %reason,
                    record = what,
                    "undecodable record, discarding the whole conversation"
                );
                ControlFlow::Break(())
            }
            InvalidRecordPolicy::Skip => {
                warn!(
                    file = %origin.display(),
                    error = %reason,
                    record = what,
                    "skipping undecodable record"
                );
                self.skipped += 1;
                ControlFlow::Continue(())
            }
        }
    }

    fn add_fragment(&mut self, origin: &Path, export: &MessengerExport) -> ControlFlow<()> {
        let first = self.fragments == 0;
        self.fragments += 1;

        if first || self.config.participants == ParticipantSource::AllFiles {
            for (name, raw) in export
                .participant_names(self.config.repair)
                .zip(&export.participants)
            {
                match name {
                    Ok(name) => {
                        self.declared.insert(name);
                    }
                    Err(e) => self.reject(origin, &raw.name, &e)?,
                }
            }
        }

        for raw in &export.messages {
            match decode_message(raw, self.config.repair) {
                Ok(msg) => self.messages.push(msg),
                Err(e) => self.reject(origin, &raw.to_string(), &e)?,
            }
        }

        debug!(
            file = %origin.display(),
            records = export.messages.len(),
            "fragment decoded"
        );
        ControlFlow::Continue(())
    }

    fn finish(self) -> Conversation {
        let conv = Conversation::new(self.messages, self.declared, self.config.calendar());
        info!(
            fragments = self.fragments,
            messages = conv.message_count(),
            participants = conv.participants().len(),
            skipped = self.skipped,
            "conversation loaded"
        );
        conv
    }
}

fn parse_fragment(origin: &Path, bytes: &[u8]) -> Result<MessengerExport> {
    serde_json::from_slice(bytes).map_err(|e| ConvoError::malformed_json(origin, e))
}

/// Loads every fragment under `root`.
///
/// # Errors
///
/// [`ConvoError::DirectoryNotFound`] for a missing directory,
/// [`ConvoError::Io`] when a file cannot be read, and
/// [`ConvoError::MalformedJson`] when a fragment is not a Messenger export.
/// Undecodable message records are not errors; see [`InvalidRecordPolicy`].
pub fn load(root: &Path, config: &IngestConfig) -> Result<Conversation> {
    let files = collect_files(root)?;
    debug!(dir = %root.display(), files = files.len(), "collected fragment files");

    let mut ingestion = Ingestion::new(config);
    for path in &files {
        let bytes = fs::read(path)?;
        let export = parse_fragment(path, &bytes)?;
        if ingestion.add_fragment(path, &export).is_break() {
            return Ok(Conversation::empty(config.calendar()));
        }
    }
    Ok(ingestion.finish())
}

/// Loads a conversation from in-memory fragment contents, in order.
///
/// Behaves like [`load`] over files holding the same text. Fragments are
/// labelled `fragment-N` in errors and logs.
///
/// # Example
///
/// ```
/// use convostat::config::IngestConfig;
/// use convostat::loader::load_fragments;
///
/// let a = r#"{"participants": [{"name": "Alice"}, {"name": "Bob"}],
///            "messages": [{"sender_name": "Alice", "timestamp_ms": 0, "type": "Generic", "content": "hello world"}]}"#;
/// let b = r#"{"messages": [{"sender_name": "Carol", "timestamp_ms": 1000, "type": "Generic", "content": "hi"}]}"#;
///
/// let conv = load_fragments(&[a, b], &IngestConfig::new())?;
/// assert_eq!(conv.participants().len(), 3);
/// # Ok::<(), convostat::ConvoError>(())
/// ```
pub fn load_fragments(fragments: &[&str], config: &IngestConfig) -> Result<Conversation> {
    let mut ingestion = Ingestion::new(config);
    for (i, content) in fragments.iter().enumerate() {
        let origin = PathBuf::from(format!("fragment-{}", i + 1));
        let export = parse_fragment(&origin, content.as_bytes())?;
        if ingestion.add_fragment(&origin, &export).is_break() {
            return Ok(Conversation::empty(config.calendar()));
        }
    }
    Ok(ingestion.finish())
}
