//! Error types for rule compilation, rule-file parsing and tree cleanup.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the engine
pub type Result<T> = std::result::Result<T, KeepError>;

/// A single rule string that could not be compiled into a matcher
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("rule is empty")]
    Empty,

    #[error("rule '{0}' is absolute; rules are relative to the cleaned folder")]
    Absolute(String),

    #[error("rule '{rule}' does not compile: {source}")]
    Regex {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised by the engine. All of them are fatal for the invocation.
#[derive(Debug, Error)]
pub enum KeepError {
    #[error("invalid rule on line {line}: {source}")]
    InvalidRule {
        line: usize,
        #[source]
        source: PatternError,
    },

    #[error("built-in rule '.keep' does not compile: {0}")]
    BuiltinRule(#[source] PatternError),

    #[error("invalid rule in config: {0}")]
    InvalidConfigRule(#[source] PatternError),

    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("the given folder does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("the given folder is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl KeepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KeepError::Io {
            path: path.into(),
            source,
        }
    }
}
