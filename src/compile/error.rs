// src/compile/error.rs

use thiserror::Error;

/// Fallback shown when a diagnostic body could not be decoded at all.
pub const UNPARSEABLE_MESSAGE: &str = "Compilation failed: Could not parse error log.";

/// Why a compile did not produce an artifact.
///
/// Every variant is terminal for the request that produced it; none is
/// retried. `Display` is the text shown in the diagnostic console.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The compile call did not complete (connection refused, reset, ...).
    #[error("{message}")]
    Transport { message: String },

    /// The service ran and reported the input as invalid.
    #[error("{message}")]
    Diagnostic { message: String },

    /// The service reported an error whose body no strategy could decode.
    #[error("{}", UNPARSEABLE_MESSAGE)]
    Unparseable,
}

impl CompileError {
    pub fn transport(message: impl Into<String>) -> Self {
        CompileError::Transport {
            message: message.into(),
        }
    }

    pub fn diagnostic(message: impl Into<String>) -> Self {
        CompileError::Diagnostic {
            message: message.into(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Transport { .. } => "transport",
            CompileError::Diagnostic { .. } => "diagnostic",
            CompileError::Unparseable => "unparseable",
        }
    }
}
