//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`ReportFormat`] - How the report is printed
//!
//! [`Args`] converts into the library's own configuration types, so the
//! binary stays a thin layer:
//!
//! ```rust
//! use clap::Parser;
//! use convostat::cli::Args;
//!
//! let args = Args::parse_from(["convostat", "inbox/alice", "--timezone", "utc", "--skip-invalid"]);
//! let config = args.ingest_config();
//! assert_eq!(config.zone.to_string(), "utc");
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{IngestConfig, InvalidRecordPolicy};
use crate::encoding::RepairMode;
use crate::participants::ParticipantSource;
use crate::report::{ReportOptions, WordQuery};
use crate::temporal::Zone;

/// Statistics for a Messenger JSON conversation export.
#[derive(Parser, Debug, Clone)]
#[command(name = "convostat")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    convostat messages/inbox/alice_abc123
    convostat inbox/friends --timezone Europe/Paris --top-days 5
    convostat inbox/friends --format json > stats.json
    convostat inbox/friends --word Alice=lol --word Bob=ok")]
pub struct Args {
    /// Conversation directory (holding message_1.json, message_2.json, ...)
    pub dir: PathBuf,

    /// Time zone for hour/weekday/day statistics: utc, local, +HH:MM or an IANA name
    #[arg(short = 'z', long, value_name = "ZONE", default_value = "local")]
    pub timezone: Zone,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Number of most active days to list
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub top_days: usize,

    /// Number of most frequent words to list
    #[arg(long, value_name = "K", default_value_t = 20)]
    pub top_words: usize,

    /// Only count words longer than this many characters
    #[arg(long, value_name = "L", default_value_t = 3)]
    pub min_word_len: usize,

    /// Read declared participants from the first fragment only
    #[arg(long)]
    pub first_file_participants: bool,

    /// Skip undecodable records instead of discarding the conversation
    #[arg(long)]
    pub skip_invalid: bool,

    /// Do not repair mis-encoded text
    #[arg(long, conflicts_with = "lenient")]
    pub no_repair: bool,

    /// Keep text as exported when it cannot be repaired
    #[arg(long)]
    pub lenient: bool,

    /// Count a participant's messages containing a word (PARTICIPANT=WORD)
    #[arg(short, long = "word", value_name = "PARTICIPANT=WORD")]
    pub words: Vec<WordQuery>,
}

impl Args {
    /// Ingestion settings selected on the command line.
    pub fn ingest_config(&self) -> IngestConfig {
        let repair = if self.no_repair {
            RepairMode::Off
        } else if self.lenient {
            RepairMode::Lenient
        } else {
            RepairMode::Strict
        };
        let participants = if self.first_file_participants {
            ParticipantSource::FirstFile
        } else {
            ParticipantSource::AllFiles
        };
        let on_invalid = if self.skip_invalid {
            InvalidRecordPolicy::Skip
        } else {
            InvalidRecordPolicy::Abort
        };

        IngestConfig::new()
            .with_zone(self.timezone)
            .with_repair(repair)
            .with_participants(participants)
            .with_on_invalid(on_invalid)
    }

    /// Report sizes selected on the command line.
    pub fn report_options(&self) -> ReportOptions {
        self.words.iter().cloned().fold(
            ReportOptions::new()
                .with_top_days(self.top_days)
                .with_top_words(self.top_words)
                .with_min_word_len(self.min_word_len),
            ReportOptions::with_word,
        )
    }
}

/// How the report is printed on stdout.
///
/// - [`Text`](ReportFormat::Text) - Aligned, human-readable sections
/// - [`Json`](ReportFormat::Json) - Pretty-printed JSON, for scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["text", "json"]
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "Text"),
            ReportFormat::Json => write!(f, "JSON"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                ReportFormat::all_names().join(", ")
            )),
        }
    }
}
