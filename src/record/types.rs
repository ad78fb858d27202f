use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrackerError};

/// Top-level record key holding the capture time.
pub const DATE_KEY: &str = "date";
/// Format of the `date` field inside a record.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format of the record identifier (`date` with ' ' -> '_' and ':' -> '-').
pub const RECORD_ID_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// A tracked account name. Always lower-case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityName(String);

impl EntityName {
    pub fn parse(raw: &str) -> Result<Self> {
        let name = raw.trim().to_lowercase();
        let invalid = name.is_empty()
            || name.starts_with('.')
            || name.chars().any(|c| c == '/' || c == '\\' || c.is_control());
        if invalid {
            return Err(TrackerError::InvalidEntityName(raw.to_string()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityName {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Second-precision capture time of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureTime(NaiveDateTime);

impl CaptureTime {
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    /// Accepts both `2020-04-27 14:30:05` and `2020-04-27_14-30-05`.
    pub fn parse(raw: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(raw, DATE_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, RECORD_ID_FORMAT))
            .map(Self)
            .map_err(|e| TrackerError::Serialization(format!("bad timestamp {raw:?}: {e}")))
    }

    /// Filesystem-safe token used as the record identifier.
    pub fn record_id(&self) -> String {
        self.0.format(RECORD_ID_FORMAT).to_string()
    }
}

impl fmt::Display for CaptureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for CaptureTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaptureTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CaptureTime::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Ranked stats for one skill. Fields are optional so that records written
/// by an older client still load; the extractor reports what is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, alias = "xp", skip_serializing_if = "Option::is_none")]
    pub experience: Option<i64>,
}

impl SkillRecord {
    pub fn new(rank: i64, level: i64, experience: i64) -> Self {
        Self {
            rank: Some(rank),
            level: Some(level),
            experience: Some(experience),
        }
    }
}

/// Skill name -> stats, as returned by the hiscores.
pub type SkillTable = BTreeMap<String, SkillRecord>;

/// One immutable observation of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "date")]
    pub captured_at: CaptureTime,
    #[serde(flatten)]
    pub metrics: SkillTable,
}

impl Snapshot {
    pub fn new(captured_at: CaptureTime, metrics: SkillTable) -> Self {
        Self { captured_at, metrics }
    }

    pub fn record_id(&self) -> String {
        self.captured_at.record_id()
    }
}

/// Hiscore table an account is ranked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Normal,
    Ironman,
    UltimateIronman,
    HardcoreIronman,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Normal => "normal",
            AccountType::Ironman => "ironman",
            AccountType::UltimateIronman => "ultimate-ironman",
            AccountType::HardcoreIronman => "hardcore-ironman",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "n" | "normal" => Ok(AccountType::Normal),
            "im" | "ironman" => Ok(AccountType::Ironman),
            "uim" | "ultimate" | "ultimate-ironman" => Ok(AccountType::UltimateIronman),
            "hic" | "hcim" | "hardcore" | "hardcore-ironman" => Ok(AccountType::HardcoreIronman),
            _ => Err(TrackerError::InvalidAccountType(s.to_string())),
        }
    }
}
