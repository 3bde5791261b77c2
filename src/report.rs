//! A serializable snapshot of every aggregate of a [`Conversation`].
//!
//! [`Report::build`] runs each accessor once and keeps the results, so a
//! report can be printed as text (via [`Display`](std::fmt::Display)) or as
//! JSON (via [`Report::to_json`]) without recomputing anything.
//!
//! # Example
//!
//! ```rust
//! use convostat::config::IngestConfig;
//! use convostat::loader::load_fragments;
//! use convostat::report::{Report, ReportOptions};
//! use convostat::temporal::Zone;
//!
//! let fragment = r#"{"participants": [{"name": "Alice"}],
//!     "messages": [{"sender_name": "Alice", "timestamp_ms": 0, "type": "Generic", "content": "hello world"}]}"#;
//! let conv = load_fragments(&[fragment], &IngestConfig::new().with_zone(Zone::Utc))?;
//!
//! let report = Report::build(&conv, &ReportOptions::new().with_top_words(5));
//! assert_eq!(report.message_count, 1);
//! assert_eq!(report.top_words[0].key, "hello");
//! # Ok::<(), convostat::ConvoError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conversation::{Conversation, TimeRepartition};
use crate::error::{ConvoError, Result};
use crate::message::ContentType;

/// One participant/word pair to count with
/// [`Conversation::word_occurrence_for`].
///
/// Parses from `PARTICIPANT=WORD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordQuery {
    pub participant: String,
    pub word: String,
}

impl FromStr for WordQuery {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((participant, word)) if !participant.is_empty() && !word.is_empty() => Ok(Self {
                participant: participant.to_string(),
                word: word.to_string(),
            }),
            _ => Err(format!(
                "Invalid word query: '{}'. Expected PARTICIPANT=WORD",
                s
            )),
        }
    }
}

/// Controls the size of the rankings in a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Number of most active days to list (default: 10)
    pub top_days: usize,

    /// Number of most frequent words to list (default: 20)
    pub top_words: usize,

    /// Words must be strictly longer than this many characters (default: 3)
    pub min_word_len: usize,

    /// Per-participant word counts to include
    #[serde(default)]
    pub words: Vec<WordQuery>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_days: 10,
            top_words: 20,
            min_word_len: 3,
            words: Vec::new(),
        }
    }
}

impl ReportOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_top_days(mut self, n: usize) -> Self {
        self.top_days = n;
        self
    }

    #[must_use]
    pub fn with_top_words(mut self, k: usize) -> Self {
        self.top_words = k;
        self
    }

    #[must_use]
    pub fn with_min_word_len(mut self, len: usize) -> Self {
        self.min_word_len = len;
        self
    }

    /// Adds a word occurrence query.
    #[must_use]
    pub fn with_word(mut self, query: WordQuery) -> Self {
        self.words.push(query);
        self
    }
}

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub key: String,
    pub count: usize,
}

impl From<(String, usize)> for Ranked {
    fn from((key, count): (String, usize)) -> Self {
        Self { key, count }
    }
}

/// Answer to a [`WordQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordOccurrence {
    pub participant: String,
    pub word: String,
    /// Messages from `participant` containing `word`
    pub messages: usize,
}

/// Every aggregate of a conversation, computed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Zone used for the date-derived sections
    pub zone: String,
    pub message_count: usize,
    pub participants: Vec<String>,
    pub messages_per_participant: BTreeMap<String, usize>,
    pub chars_per_participant: BTreeMap<String, usize>,
    pub total_chars: usize,
    /// Attachment counts per content type (`photos`, `files`, `sticker`)
    pub attachments_per_participant: BTreeMap<&'static str, BTreeMap<String, usize>>,
    pub total_pics: usize,
    pub time_repartition: TimeRepartition,
    pub messages_per_date: BTreeMap<String, usize>,
    pub most_active_days: Vec<Ranked>,
    pub min_word_len: usize,
    pub top_words: Vec<Ranked>,
    pub word_occurrences: Vec<WordOccurrence>,
}

impl Report {
    /// Computes every aggregate of `conv`.
    pub fn build(conv: &Conversation, options: &ReportOptions) -> Self {
        let attachments_per_participant = ContentType::all()
            .iter()
            .filter(|kind| kind.is_attachment())
            .map(|&kind| (kind.key(), conv.pics_per_participant(kind)))
            .collect();

        let word_occurrences = options
            .words
            .iter()
            .map(|q| WordOccurrence {
                participant: q.participant.clone(),
                word: q.word.clone(),
                messages: conv.word_occurrence_for(&q.participant, &q.word),
            })
            .collect();

        Self {
            zone: conv.calendar().zone().to_string(),
            message_count: conv.message_count(),
            participants: conv.participants().iter().cloned().collect(),
            messages_per_participant: conv.messages_per_participant(),
            chars_per_participant: conv.chars_per_participant(),
            total_chars: conv.total_chars(),
            attachments_per_participant,
            total_pics: conv.total_pics(),
            time_repartition: conv.time_repartition(),
            messages_per_date: conv.messages_per_date(),
            most_active_days: ranked(conv.most_active_days(options.top_days)),
            min_word_len: options.min_word_len,
            top_words: ranked(conv.top_words(options.min_word_len, options.top_words)),
            word_occurrences,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ConvoError::Serialization)
    }

    fn attachments_of(&self, kind: ContentType, participant: &str) -> usize {
        self.attachments_per_participant
            .get(kind.key())
            .and_then(|counts| counts.get(participant))
            .copied()
            .unwrap_or(0)
    }
}

fn ranked(ranking: Vec<(String, usize)>) -> Vec<Ranked> {
    ranking.into_iter().map(Ranked::from).collect()
}

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 Conversation report (zone: {})", self.zone)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "   Messages:      {}", self.message_count)?;
        writeln!(f, "   Participants:  {}", self.participants.len())?;
        writeln!(f, "   Characters:    {}", self.total_chars)?;
        writeln!(f, "   Photos:        {}", self.total_pics)?;

        if self.message_count == 0 && self.participants.is_empty() {
            writeln!(f)?;
            return writeln!(f, "⚠️  No messages were loaded");
        }

        let width = self
            .participants
            .iter()
            .map(|p| p.chars().count())
            .max()
            .unwrap_or(0);

        writeln!(f)?;
        writeln!(f, "👥 Participants")?;
        for name in &self.participants {
            writeln!(
                f,
                "   {:<width$}  {:>6} msgs  {:>8} chars  {:>4} photos  {:>4} files  {:>4} stickers",
                name,
                self.messages_per_participant.get(name).copied().unwrap_or(0),
                self.chars_per_participant.get(name).copied().unwrap_or(0),
                self.attachments_of(ContentType::Photos, name),
                self.attachments_of(ContentType::Files, name),
                self.attachments_of(ContentType::Sticker, name),
                width = width,
            )?;
        }

        writeln!(f)?;
        writeln!(f, "🕐 Messages per hour")?;
        for (hour, count) in &self.time_repartition.hour {
            writeln!(f, "   {:02}h  {}", hour, count)?;
        }

        writeln!(f)?;
        writeln!(f, "📅 Messages per weekday")?;
        for (day, count) in self.time_repartition.weekday.iter() {
            writeln!(f, "   {:<9}  {}", day, count)?;
        }

        writeln!(f)?;
        writeln!(f, "📆 Messages per year")?;
        for (year, count) in &self.time_repartition.year {
            writeln!(f, "   {}  {}", year, count)?;
        }

        writeln!(f)?;
        writeln!(f, "🔥 Most active days")?;
        for (i, day) in self.most_active_days.iter().enumerate() {
            writeln!(f, "   {:>2}. {}  {}", i + 1, day.key, day.count)?;
        }

        writeln!(f)?;
        writeln!(f, "💬 Top words (longer than {} chars)", self.min_word_len)?;
        for (i, word) in self.top_words.iter().enumerate() {
            writeln!(f, "   {:>2}. {}  {}", i + 1, word.key, word.count)?;
        }

        if !self.word_occurrences.is_empty() {
            writeln!(f)?;
            writeln!(f, "🔎 Word occurrences")?;
            for occ in &self.word_occurrences {
                writeln!(
                    f,
                    "   {} / \"{}\": {} messages",
                    occ.participant, occ.word, occ.messages
                )?;
            }
        }
        Ok(())
    }
}
