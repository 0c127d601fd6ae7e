//! Engine error type

use std::fmt;

/// Failures surfaced by the engine's host-facing API.
///
/// Gameplay edge cases (no snap cell, no match) are handled by fallback
/// policies inside the simulation and never show up here.
#[derive(Debug)]
pub enum EngineError {
    /// The host surface could not hand out a 2D drawing context
    NoDrawingContext,
    /// A tuning value is outside its allowed range
    InvalidTuning { field: &'static str, reason: String },
    /// Tuning or settings JSON failed to parse
    Config(serde_json::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDrawingContext => write!(f, "cannot get 2d drawing context"),
            Self::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning value `{field}`: {reason}")
            }
            Self::Config(err) => write!(f, "config parse error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}
