//! Error types for the fitlog_core library.

use chrono::NaiveDate;
use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Grammar branch a set description was being matched against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grammar {
    Cardio,
    CardioDetail,
    Weights,
    Bodyweight,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grammar::Cardio => "cardio",
            Grammar::CardioDetail => "cardio detail",
            Grammar::Weights => "weights",
            Grammar::Bodyweight => "bodyweight",
        };
        f.write_str(name)
    }
}

/// A set description that did not match the grammar it was classified into
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("cannot decode {text:?} as {grammar}: {reason}")]
pub struct DecodeError {
    pub text: String,
    pub grammar: Grammar,
    pub reason: String,
}

impl DecodeError {
    pub fn new(text: &str, grammar: Grammar, reason: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            grammar,
            reason: reason.into(),
        }
    }
}

/// Core error type for fitlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP transport or status error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A set line failed to decode, located within its workout
    #[error(
        "workout on {date}, exercise {exercise_index} ({exercise}), set {set_index}: {source}"
    )]
    Set {
        date: NaiveDate,
        exercise: String,
        exercise_index: usize,
        set_index: usize,
        #[source]
        source: DecodeError,
    },

    /// Expected node, sibling or attribute missing from the input markup
    #[error("Structure error: {0}")]
    Structure(String),

    /// Key not present in a fixed lookup table
    #[error("no entry for {key:?} in {table} table")]
    Lookup { table: &'static str, key: String },

    /// Workout date text that does not parse
    #[error("invalid workout date {text:?}: {source}")]
    Date {
        text: String,
        #[source]
        source: chrono::ParseError,
    },
}
