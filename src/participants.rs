//! Reconstruction of the full participant set.
//!
//! The `participants` array of an export only lists people who are still in
//! the conversation. Anyone who left is only visible as the sender of old
//! messages, so the historical set is the declared set plus every sender.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Message;

/// Which fragments contribute declared participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantSource {
    /// Union of the `participants` arrays of every fragment.
    #[default]
    AllFiles,

    /// Only the first fragment file visited.
    FirstFile,
}

/// Returns `declared` with every message sender added.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use convostat::Message;
/// use convostat::participants::resolve;
///
/// let declared = BTreeSet::from(["Alice".to_string(), "Bob".to_string()]);
/// let messages = vec![Message::text("Carol", 0, "hi").unwrap()];
///
/// let all = resolve(declared, &messages);
/// assert_eq!(all.len(), 3);
/// assert!(all.contains("Carol"));
/// ```
pub fn resolve(mut declared: BTreeSet<String>, messages: &[Message]) -> BTreeSet<String> {
    for msg in messages {
        if !declared.contains(&msg.sender) {
            declared.insert(msg.sender.clone());
        }
    }
    declared
}
