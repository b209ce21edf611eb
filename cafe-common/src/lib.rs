//! # Cafe Common Library
//!
//! Shared code for the cafe platform:
//! - Domain rule engine (index validation, type/theme classification,
//!   review image sets, orphan-file batches)
//! - Closed enumerations and alias lookup
//! - Database models and queries
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod rules;
pub mod types;

pub use error::{Error, Result, RuleViolation};
pub use types::{CafeTheme, CafeType, FileDomain, FileType};
