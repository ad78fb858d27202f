use thiserror::Error;

/// Errors raised by the record store and the series layer.
///
/// The first group is fatal to the operation it came from. `CorruptRecord` and
/// `MissingField` describe a single historical record and are normally
/// collected as warnings instead of being returned.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("'{0}' is not currently being tracked")]
    UnknownEntity(String),

    #[error("'{0}' is already being tracked")]
    NameCollision(String),

    #[error("a record for {entity} already exists at {record}")]
    DuplicateTimestamp { entity: String, record: String },

    #[error("record {record} could not be read: {reason}")]
    CorruptRecord { record: String, reason: String },

    #[error("'{0}' is not a known skill")]
    UnknownMetric(String),

    #[error("'{0}' is not a known mode (expected experience, level or rank)")]
    UnknownMode(String),

    #[error("snapshot {timestamp} has no {mode} for {metric}")]
    MissingField {
        timestamp: String,
        metric: String,
        mode: String,
    },

    #[error("'{0}' is reserved and cannot be stored as a skill")]
    ReservedMetricName(String),

    #[error("invalid account name: {0:?}")]
    InvalidEntityName(String),

    #[error("'{0}' is not an account type (expected N, IM, UIM or HIC)")]
    InvalidAccountType(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TrackerError {
    /// True for errors that describe one stored record rather than the
    /// operation's target.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            TrackerError::CorruptRecord { .. } | TrackerError::MissingField { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
