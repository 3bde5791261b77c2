//! Timestamp to calendar-field conversion with an explicit time zone.
//!
//! Every date-derived grouping in [`Conversation`](crate::Conversation)
//! (hour, weekday, year, per-day grids, active days) goes through a
//! [`Calendar`], which converts an instant into local calendar fields for a
//! chosen [`Zone`]. The zone is part of the configuration, so the same
//! export produces the same statistics on every machine once it is pinned.
//!
//! # Example
//!
//! ```
//! use chrono::{DateTime, Weekday};
//! use convostat::temporal::{Calendar, Zone};
//!
//! // 2024-01-15 10:50:00 UTC, a Monday
//! let ts = DateTime::from_timestamp_millis(1705315800000).unwrap();
//!
//! let utc = Calendar::new(Zone::Utc);
//! assert_eq!(utc.hour(ts), 10);
//! assert_eq!(utc.weekday(ts), Weekday::Mon);
//! assert_eq!(utc.date_key(ts), "2024-01-15");
//!
//! let tokyo = Calendar::new("Asia/Tokyo".parse().unwrap());
//! assert_eq!(tokyo.hour(ts), 19);
//! ```

use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConvoError;

/// Weekday names indexed by `0 = Monday .. 6 = Sunday`.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Time zone used to derive calendar fields.
///
/// Parses from and displays as a string: `utc`, `local`, a fixed offset
/// (`+02:00`, `-0530`), or an IANA name (`Europe/Paris`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Zone {
    /// Coordinated Universal Time
    Utc,

    /// The time zone of the machine running the analysis
    #[default]
    Local,

    /// A fixed UTC offset
    Fixed(FixedOffset),

    /// A named IANA zone, with daylight saving rules
    Named(Tz),
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Utc => write!(f, "utc"),
            Zone::Local => write!(f, "local"),
            Zone::Fixed(offset) => write!(f, "{}", offset),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl std::str::FromStr for Zone {
    type Err = ConvoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "utc" | "z" => return Ok(Zone::Utc),
            "local" => return Ok(Zone::Local),
            _ => {}
        }
        if let Some(offset) = parse_offset(trimmed) {
            return Ok(Zone::Fixed(offset));
        }
        trimmed
            .parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| ConvoError::invalid_timezone(s))
    }
}

impl TryFrom<String> for Zone {
    type Error = ConvoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> String {
        zone.to_string()
    }
}

/// Parses `+HH:MM`, `+HHMM` or `+HH` (and the `-` forms).
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// All calendar fields of one instant, in a given zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarFields {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// 1..=31
    pub day: u32,
    /// 0..=23
    pub hour: u32,
    pub weekday: Weekday,
}

impl CalendarFields {
    /// Weekday as `0 = Monday .. 6 = Sunday`.
    pub fn weekday_index(&self) -> usize {
        self.weekday.num_days_from_monday() as usize
    }

    /// Canonical `YYYY-MM-DD` key.
    pub fn date_key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

fn fields_in<Z: TimeZone>(ts: DateTime<Utc>, zone: &Z) -> CalendarFields {
    let local = ts.with_timezone(zone);
    CalendarFields {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        weekday: local.weekday(),
    }
}

/// Converts instants to calendar fields in a fixed [`Zone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Calendar {
    zone: Zone,
}

impl Calendar {
    /// Creates a calendar for the given zone.
    pub fn new(zone: Zone) -> Self {
        Self { zone }
    }

    /// Calendar in UTC.
    pub fn utc() -> Self {
        Self::new(Zone::Utc)
    }

    /// Returns the zone of this calendar.
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Returns every calendar field of `ts` at once.
    pub fn fields(&self, ts: DateTime<Utc>) -> CalendarFields {
        match self.zone {
            Zone::Utc => fields_in(ts, &Utc),
            Zone::Local => fields_in(ts, &Local),
            Zone::Fixed(offset) => fields_in(ts, &offset),
            Zone::Named(tz) => fields_in(ts, &tz),
        }
    }

    /// Hour of day, 0..=23.
    pub fn hour(&self, ts: DateTime<Utc>) -> u32 {
        self.fields(ts).hour
    }

    pub fn weekday(&self, ts: DateTime<Utc>) -> Weekday {
        self.fields(ts).weekday
    }

    /// Weekday as `0 = Monday .. 6 = Sunday`.
    pub fn weekday_index(&self, ts: DateTime<Utc>) -> usize {
        self.fields(ts).weekday_index()
    }

    /// Day of month, 1..=31.
    pub fn day(&self, ts: DateTime<Utc>) -> u32 {
        self.fields(ts).day
    }

    /// Month, 1..=12.
    pub fn month(&self, ts: DateTime<Utc>) -> u32 {
        self.fields(ts).month
    }

    pub fn year(&self, ts: DateTime<Utc>) -> i32 {
        self.fields(ts).year
    }

    /// `YYYY-MM-DD` in this calendar's zone.
    pub fn date_key(&self, ts: DateTime<Utc>) -> String {
        self.fields(ts).date_key()
    }
}
