//! Error types for the generation pipeline.

use std::error::Error;
use std::fmt;

/// Errors surfaced by the generation pipeline and the interactive session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenError {
    /// Caller contract violation: an operation was requested against the
    /// wrong map type, before any map existed, or with unusable parameters.
    Configuration(String),
    /// The retry loop exhausted its pass limit without producing an island
    /// covering the minimum fraction of the map.
    GenerationFailed { passes: u32 },
    /// A stage received malformed data (mismatched dimensions, a region map
    /// inconsistent with its label grid). Programming error, not recoverable.
    InvariantViolation(String),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            GenError::GenerationFailed { passes } => {
                write!(f, "generation failed: no valid island after {} passes", passes)
            }
            GenError::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
        }
    }
}

impl Error for GenError {}
