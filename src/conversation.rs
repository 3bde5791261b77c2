//! The conversation aggregate and every statistic derived from it.
//!
//! A [`Conversation`] owns the decoded messages, the full participant set and
//! the [`Calendar`] used for date groupings. It is immutable: statistics are
//! computed on demand by each accessor, nothing is cached, and calling an
//! accessor twice gives the same answer.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use convostat::{Conversation, Message};
//! use convostat::temporal::Calendar;
//!
//! let messages = vec![
//!     Message::text("Alice", 1705315800000, "hello world").unwrap(),
//!     Message::text("Carol", 1705315860000, "hi").unwrap(),
//! ];
//! let declared = BTreeSet::from(["Alice".to_string(), "Bob".to_string()]);
//! let conv = Conversation::new(messages, declared, Calendar::utc());
//!
//! assert_eq!(conv.message_count(), 2);
//! assert_eq!(conv.messages_per_participant()["Bob"], 0);
//! assert_eq!(conv.chars_per_participant()["Alice"], 11);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Weekday;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::Message;
use crate::message::ContentType;
use crate::participants::resolve;
use crate::temporal::{Calendar, WEEKDAY_NAMES};

/// Messages per day for one year: `grid[month - 1][day - 1]`.
///
/// Days past the end of a month stay at zero.
pub type DayGrid = [[usize; 31]; 12];

/// A ranked list of `(key, count)`, highest count first.
pub type Ranking = Vec<(String, usize)>;

/// Message counts for each weekday, Monday first.
///
/// All seven days are always present. Serializes as a map from weekday name
/// to count, in Monday..Sunday order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdayCounts([usize; 7]);

impl WeekdayCounts {
    /// Count for one weekday.
    pub fn get(&self, day: Weekday) -> usize {
        self.0[day.num_days_from_monday() as usize]
    }

    /// Counts indexed `0 = Monday .. 6 = Sunday`.
    pub fn as_array(&self) -> &[usize; 7] {
        &self.0
    }

    /// `(name, count)` pairs, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        WEEKDAY_NAMES.iter().copied().zip(self.0.iter().copied())
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    fn bump(&mut self, index: usize) {
        self.0[index] += 1;
    }
}

impl Serialize for WeekdayCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (name, count) in self.iter() {
            map.serialize_entry(name, &count)?;
        }
        map.end()
    }
}

/// Hour, weekday and year distributions computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TimeRepartition {
    /// Hour of day (0..=23) to count; only observed hours
    pub hour: BTreeMap<u32, usize>,
    pub weekday: WeekdayCounts,
    /// Year to count; only observed years
    pub year: BTreeMap<i32, usize>,
}

/// A calendar month, ordered chronologically. Displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Splits content into counted words.
///
/// Content is split on single spaces (not general whitespace), each piece is
/// trimmed and lowercased, and empty pieces are dropped.
pub fn tokenize(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split(' ')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

/// Counts keys, keeping first-occurrence order.
fn tally(keys: impl IntoIterator<Item = String>) -> Ranking {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Ranking = Vec::new();
    for key in keys {
        if let Some(&i) = index.get(&key) {
            counts[i].1 += 1;
        } else {
            index.insert(key.clone(), counts.len());
            counts.push((key, 1));
        }
    }
    counts
}

/// Highest counts first; the sort is stable so ties keep first-occurrence order.
fn top(mut counts: Ranking, n: usize) -> Ranking {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// An ingested conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
    participants: BTreeSet<String>,
    calendar: Calendar,
}

impl Conversation {
    /// Builds a conversation; every sender is added to `declared`.
    pub fn new(messages: Vec<Message>, declared: BTreeSet<String>, calendar: Calendar) -> Self {
        let participants = resolve(declared, &messages);
        Self {
            messages,
            participants,
            calendar,
        }
    }

    /// A conversation with no messages and no participants.
    pub fn empty(calendar: Calendar) -> Self {
        Self {
            messages: Vec::new(),
            participants: BTreeSet::new(),
            calendar,
        }
    }

    /// Messages in file enumeration order, then in-file order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Everyone who was ever part of the conversation.
    pub fn participants(&self) -> &BTreeSet<String> {
        &self.participants
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn zero_filled(&self) -> BTreeMap<String, usize> {
        self.participants.iter().map(|p| (p.clone(), 0)).collect()
    }

    /// Sums `value(msg)` per sender over messages matching `keep`.
    fn per_participant(
        &self,
        keep: impl Fn(&Message) -> bool,
        value: impl Fn(&Message) -> usize,
    ) -> BTreeMap<String, usize> {
        let mut counts = self.zero_filled();
        for msg in self.messages.iter().filter(|&m| keep(m)) {
            *counts.entry(msg.sender.clone()).or_insert(0) += value(msg);
        }
        counts
    }

    /// Messages sent by each participant; silent participants map to 0.
    pub fn messages_per_participant(&self) -> BTreeMap<String, usize> {
        self.per_participant(|_| true, |_| 1)
    }

    /// Characters written by each participant.
    ///
    /// Only `Generic` text messages count.
    pub fn chars_per_participant(&self) -> BTreeMap<String, usize> {
        self.per_participant(Message::is_generic_text, Message::char_count)
    }

    pub fn total_chars(&self) -> usize {
        self.chars_per_participant().values().sum()
    }

    /// Attachments of the given kind sent by each participant.
    ///
    /// `pics_per_participant(ContentType::Photos)` counts pictures. Text
    /// messages carry no attachments, so `ContentType::Message` gives zeros.
    pub fn pics_per_participant(&self, kind: ContentType) -> BTreeMap<String, usize> {
        self.per_participant(|m| m.content_type == kind, Message::attachment_count)
    }

    /// Total number of photos.
    pub fn total_pics(&self) -> usize {
        self.pics_per_participant(ContentType::Photos).values().sum()
    }

    /// Messages per hour of day; only observed hours are present.
    pub fn messages_per_hour(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for msg in &self.messages {
            *counts.entry(self.calendar.hour(msg.timestamp)).or_insert(0) += 1;
        }
        counts
    }

    /// Messages per weekday; all seven days are present.
    pub fn messages_per_weekday(&self) -> WeekdayCounts {
        let mut counts = WeekdayCounts::default();
        for msg in &self.messages {
            counts.bump(self.calendar.weekday_index(msg.timestamp));
        }
        counts
    }

    /// Messages per year; only observed years are present.
    pub fn messages_per_year(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for msg in &self.messages {
            *counts.entry(self.calendar.year(msg.timestamp)).or_insert(0) += 1;
        }
        counts
    }

    /// Hour, weekday and year distributions in a single traversal.
    pub fn time_repartition(&self) -> TimeRepartition {
        let mut rep = TimeRepartition::default();
        for msg in &self.messages {
            let fields = self.calendar.fields(msg.timestamp);
            *rep.hour.entry(fields.hour).or_insert(0) += 1;
            rep.weekday.bump(fields.weekday_index());
            *rep.year.entry(fields.year).or_insert(0) += 1;
        }
        rep
    }

    /// A 12x31 grid of daily counts for every observed year.
    pub fn messages_per_day_grid(&self) -> BTreeMap<i32, DayGrid> {
        let mut grids: BTreeMap<i32, DayGrid> = BTreeMap::new();
        for msg in &self.messages {
            let f = self.calendar.fields(msg.timestamp);
            let grid = grids.entry(f.year).or_insert([[0; 31]; 12]);
            grid[(f.month - 1) as usize][(f.day - 1) as usize] += 1;
        }
        grids
    }

    /// The 12x31 grid for one year; all zeros if the year has no messages.
    pub fn messages_per_day_in(&self, year: i32) -> DayGrid {
        let mut grid = [[0; 31]; 12];
        for msg in &self.messages {
            let f = self.calendar.fields(msg.timestamp);
            if f.year == year {
                grid[(f.month - 1) as usize][(f.day - 1) as usize] += 1;
            }
        }
        grid
    }

    /// A 31-slot row of daily counts for every observed month.
    pub fn messages_per_month(&self) -> BTreeMap<YearMonth, [usize; 31]> {
        let mut rows: BTreeMap<YearMonth, [usize; 31]> = BTreeMap::new();
        for msg in &self.messages {
            let f = self.calendar.fields(msg.timestamp);
            let key = YearMonth {
                year: f.year,
                month: f.month,
            };
            rows.entry(key).or_insert([0; 31])[(f.day - 1) as usize] += 1;
        }
        rows
    }

    /// Messages per `YYYY-MM-DD` date; only active days are present.
    pub fn messages_per_date(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for msg in &self.messages {
            *counts.entry(self.calendar.date_key(msg.timestamp)).or_insert(0) += 1;
        }
        counts
    }

    /// The `n` dates with the most messages.
    ///
    /// Dates with equal counts keep the order in which they first appear in
    /// [`messages`](Self::messages).
    pub fn most_active_days(&self, n: usize) -> Ranking {
        let dates = self
            .messages
            .iter()
            .map(|m| self.calendar.date_key(m.timestamp));
        top(tally(dates), n)
    }

    /// The `top_k` most frequent words longer than `min_len` characters.
    ///
    /// Every message is tokenized with [`tokenize`], whatever its content
    /// type, so attachment URIs are counted as words too. Words with equal
    /// counts keep first-occurrence order.
    pub fn top_words(&self, min_len: usize, top_k: usize) -> Ranking {
        let words = self
            .messages
            .iter()
            .flat_map(|m| tokenize(&m.content))
            .filter(|word| word.chars().count() > min_len);
        top(tally(words), top_k)
    }

    /// How many of `participant`'s messages contain `word`, ignoring case.
    ///
    /// This is a substring match on the whole content, not a token match.
    pub fn word_occurrence_for(&self, participant: &str, word: &str) -> usize {
        let needle = word.to_lowercase();
        self.messages
            .iter()
            .filter(|m| m.sender == participant)
            .filter(|m| m.content.to_lowercase().contains(&needle))
            .count()
    }
}
