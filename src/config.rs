//! Configuration for conversation ingestion.
//!
//! [`IngestConfig`] gathers every choice that changes what
//! [`load`](crate::loader::load) produces: the time zone used for
//! date-derived statistics, how mojibake is repaired, where declared
//! participants come from, and what happens to records that cannot be
//! decoded.
//!
//! # Example
//!
//! ```rust
//! use convostat::config::{IngestConfig, InvalidRecordPolicy};
//! use convostat::temporal::Zone;
//!
//! let config = IngestConfig::new()
//!     .with_zone(Zone::Utc)
//!     .with_on_invalid(InvalidRecordPolicy::Skip);
//!
//! assert_eq!(config.zone, Zone::Utc);
//! ```

use serde::{Deserialize, Serialize};

use crate::encoding::RepairMode;
use crate::participants::ParticipantSource;
use crate::temporal::{Calendar, Zone};

/// What to do with a message record that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRecordPolicy {
    /// Log the record and return an empty conversation.
    #[default]
    Abort,

    /// Log the record, drop it, and keep going.
    Skip,
}

/// Configuration for [`load`](crate::loader::load).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Time zone for hour/weekday/day statistics (default: local)
    pub zone: Zone,

    /// Mojibake repair of sender names, text and participant names
    /// (default: strict)
    pub repair: RepairMode,

    /// Which fragments declare participants (default: all files)
    pub participants: ParticipantSource,

    /// Handling of undecodable records (default: abort)
    pub on_invalid: InvalidRecordPolicy,
}

impl IngestConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time zone.
    #[must_use]
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    /// Sets the repair mode.
    #[must_use]
    pub fn with_repair(mut self, repair: RepairMode) -> Self {
        self.repair = repair;
        self
    }

    /// Sets where declared participants are read from.
    #[must_use]
    pub fn with_participants(mut self, source: ParticipantSource) -> Self {
        self.participants = source;
        self
    }

    /// Sets the invalid record policy.
    #[must_use]
    pub fn with_on_invalid(mut self, policy: InvalidRecordPolicy) -> Self {
        self.on_invalid = policy;
        self
    }

    /// Calendar for this configuration's zone.
    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::new();
        assert_eq!(config.zone, Zone::Local);
        assert_eq!(config.repair, RepairMode::Strict);
        assert_eq!(config.participants, ParticipantSource::AllFiles);
        assert_eq!(config.on_invalid, InvalidRecordPolicy::Abort);
    }

    #[test]
    fn test_builder_chain() {
        let config = IngestConfig::new()
            .with_zone(Zone::Utc)
            .with_repair(RepairMode::Off)
            .with_participants(ParticipantSource::FirstFile)
            .with_on_invalid(InvalidRecordPolicy::Skip);

        assert_eq!(config.calendar().zone(), Zone::Utc);
        assert_eq!(config.repair, RepairMode::Off);
        assert_eq!(config.participants, ParticipantSource::FirstFile);
        assert_eq!(config.on_invalid, InvalidRecordPolicy::Skip);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = IngestConfig::new()
            .with_zone("Europe/Paris".parse().unwrap())
            .with_on_invalid(InvalidRecordPolicy::Skip);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("Europe/Paris"));
        assert!(json.contains("\"skip\""));

        let parsed: IngestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
