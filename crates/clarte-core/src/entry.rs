//! Journal entry model.
//!
//! One [`JournalEntry`] per calendar day. The serialized shape (camelCase,
//! `step1`..`step5`, `committed`, `completedAt`) is shared by the store and by
//! export documents.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date key format: locale-independent and lexicographically sortable.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT).ok()
}

/// Number of a guided prompt, 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StepIndex(u8);

impl StepIndex {
    pub const FIRST: StepIndex = StepIndex(1);
    pub const LAST: StepIndex = StepIndex(5);
    /// Where the user describes the vision for the day.
    pub const VISION: StepIndex = StepIndex(2);
    /// What stands in the way.
    pub const OBSTACLE: StepIndex = StepIndex(3);
    /// The concrete micro-step.
    pub const ACTION: StepIndex = StepIndex(5);

    pub fn new(n: u8) -> Option<Self> {
        (1..=5).contains(&n).then_some(StepIndex(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn all() -> impl Iterator<Item = StepIndex> {
        (1..=5).map(StepIndex)
    }
}

impl TryFrom<u8> for StepIndex {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        StepIndex::new(n).ok_or_else(|| format!("step must be between 1 and 5, got {n}"))
    }
}

impl From<StepIndex> for u8 {
    fn from(step: StepIndex) -> u8 {
        step.0
    }
}

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One calendar day's record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step5: Option<String>,
    /// Answer to the commitment question. Only meaningful once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committed: Option<bool>,
    /// Set once when the five-step flow is finished.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_instant::deserialize"
    )]
    pub completed_at: Option<DateTime<FixedOffset>>,
}

impl JournalEntry {
    pub fn step(&self, step: StepIndex) -> Option<&str> {
        let slot = match step.0 {
            1 => &self.step1,
            2 => &self.step2,
            3 => &self.step3,
            4 => &self.step4,
            _ => &self.step5,
        };
        slot.as_deref()
    }

    pub fn set_step(&mut self, step: StepIndex, text: impl Into<String>) {
        let slot = match step.0 {
            1 => &mut self.step1,
            2 => &mut self.step2,
            3 => &mut self.step3,
            4 => &mut self.step4,
            _ => &mut self.step5,
        };
        *slot = Some(text.into());
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// `true` only for a completed entry whose answer was yes.
    pub fn is_committed(&self) -> bool {
        self.is_completed() && self.committed == Some(true)
    }

    /// Local calendar date of completion, in the offset it was recorded with.
    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.completed_at.map(|at| at.date_naive())
    }

    /// Highest step holding non-blank text, 0 when none.
    pub fn highest_filled_step(&self) -> u8 {
        StepIndex::all()
            .filter(|s| self.step(*s).is_some_and(|t| !t.trim().is_empty()))
            .map(StepIndex::get)
            .max()
            .unwrap_or(0)
    }

    /// Nothing has been written for this day yet.
    pub fn is_blank(&self) -> bool {
        StepIndex::all().all(|s| self.step(s).is_none())
            && self.committed.is_none()
            && self.completed_at.is_none()
    }

    /// Text of a step, empty when absent.
    pub fn text(&self, step: StepIndex) -> &str {
        self.step(step).unwrap_or("")
    }
}

/// An entry tagged with its date key, as listed by history and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedEntry {
    #[serde(with = "date_key_format")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub entry: JournalEntry,
}

impl DatedEntry {
    pub fn new(date: NaiveDate, entry: JournalEntry) -> Self {
        Self { date, entry }
    }
}

mod date_key_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::date_key(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date_key(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date key: {raw}")))
    }
}

/// Accepts RFC 3339 instants, and naive `YYYY-MM-DDTHH:MM:SS[.fff]` read as UTC.
pub(crate) mod lenient_instant {
    use chrono::{DateTime, FixedOffset, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at);
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid instant: {raw}"))),
        }
    }
}
