//! Error types for database decoding and encoding.

use std::fmt;

use thiserror::Error;

/// Errors that can occur when reading or writing a database.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream-level error (truncation, string encoding).
    #[error("{0}")]
    Common(#[from] mirdb_common::Error),

    /// Header version outside the supported range.
    #[error("unsupported database version: {0} (expected {min}..={max})", min = crate::MIN_VERSION, max = crate::LATEST_VERSION)]
    UnsupportedVersion(i32),

    /// Negative or implausible length prefix.
    #[error("malformed {what} count: {count}")]
    MalformedCount { what: &'static str, count: i64 },

    /// A value does not fit the width the latest layout stores it in.
    #[error("{field} value {value} does not fit its wire width")]
    ValueOutOfRange { field: &'static str, value: i64 },

    /// A decoded record failed validation.
    #[error("invalid {what}: {reason}")]
    InvalidRecord { what: &'static str, reason: String },

    /// JSON import/export error.
    #[cfg(feature = "json-export")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the underlying cause is running out of bytes.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Common(mirdb_common::Error::StreamTruncated { .. }))
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level section of the database stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Maps,
    Items,
    Monsters,
    Npcs,
    Quests,
    Dragon,
    Magics,
    GameShop,
    Conquests,
    RespawnTimer,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Maps => "maps",
            Self::Items => "items",
            Self::Monsters => "monsters",
            Self::Npcs => "npcs",
            Self::Quests => "quests",
            Self::Dragon => "dragon",
            Self::Magics => "magics",
            Self::GameShop => "gameshop",
            Self::Conquests => "conquests",
            Self::RespawnTimer => "respawn timer",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure isolated to one record or one section during a load.
#[derive(Debug, Error)]
#[error("{section} record {}: {error}", describe_ordinal(.ordinal))]
pub struct RecordError {
    pub section: Section,
    /// Zero-based position in the section, or `None` when the section's
    /// count prefix itself could not be read.
    pub ordinal: Option<usize>,
    #[source]
    pub error: Error,
}

fn describe_ordinal(ordinal: &Option<usize>) -> String {
    match ordinal {
        Some(ordinal) => ordinal.to_string(),
        None => "count".to_string(),
    }
}
