//! # Error Types
//!
//! Errors shared across the workspace.

use thiserror::Error;

/// Failure to parse a wire name into one of the shared enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not a known lifecycle event name.
    #[error("Unknown event key: {0}")]
    UnknownEventKey(String),

    /// Not a known permission level.
    #[error("Unknown permission level: {0}")]
    UnknownPermission(String),
}
