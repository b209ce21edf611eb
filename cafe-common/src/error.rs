//! Common error types for the cafe platform

use thiserror::Error;

/// Common result type for cafe platform operations
pub type Result<T> = std::result::Result<T, Error>;

/// Business rule failures detected before any state is mutated.
///
/// Never transient; callers surface them verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    /// A review index fell outside the inclusive 1..=5 scale
    #[error("Index out of range: {dimension} = {value} (allowed {min}..={max})")]
    IndexOutOfRange {
        dimension: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    /// More distinct image URLs than a review may carry
    #[error("Too many images: {count} distinct (max {max})")]
    TooManyImages { count: usize, max: usize },

    /// Orphan-file batch exceeds the per-request cap
    #[error("Too many orphan files: {count} (max {max})")]
    TooManyOrphanFiles { count: usize, max: usize },

    /// The same URL was submitted more than once in one batch
    #[error("Duplicate file in request: {url}")]
    DuplicateRequestFile { url: String },

    /// File type string matched no known file type
    #[error("Illegal file type: {0}")]
    IllegalFileType(String),

    /// Domain string matched no known file domain
    #[error("Illegal domain: {0}")]
    IllegalDomain(String),

    /// URL already has a live orphan-file history record
    #[error("Orphan file already recorded: {url}")]
    DuplicateOrphanFile { url: String },

    /// Parallel orphan-file lists differ in length
    #[error(
        "Mismatched orphan file fields: {file_names} names, {file_types} types, {domains} domains, {urls} urls"
    )]
    MismatchedOrphanFields {
        file_names: usize,
        file_types: usize,
        domains: usize,
        urls: usize,
    },
}

/// Common error types across the cafe platform crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Domain rule violation
    #[error(transparent)]
    Rule(#[from] RuleViolation),

    /// Optimistic update lost against a concurrent writer
    #[error("Version conflict on {entity} {id}")]
    VersionConflict { entity: &'static str, id: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the rule violation carried by this error, if any
    pub fn rule_violation(&self) -> Option<&RuleViolation> {
        match self {
            Error::Rule(violation) => Some(violation),
            _ => None,
        }
    }
}
