//! Error taxonomy
//!
//! Nothing inside the simulation is recoverable: every variant ends the run.
//! The library reports, the binary terminates.

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A tagged value or state transition target outside its valid range
    #[error("parameter out of range: {0}")]
    OutOfRange(&'static str),
    /// A required entity was missing
    #[error("missing required entity: {0}")]
    NullReference(&'static str),
    /// Malformed level data
    #[error("invalid level input at line {line}: {reason}")]
    InvalidInput { line: usize, reason: String },
    /// Container growth failed
    #[error("allocation failed")]
    AllocationFailure(#[from] TryReserveError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub fn invalid_input(line: usize, reason: impl Into<String>) -> Self {
        SimError::InvalidInput {
            line,
            reason: reason.into(),
        }
    }

    /// Process exit code for this error category
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::NullReference(_) => 2,
            SimError::OutOfRange(_) => 3,
            SimError::InvalidInput { .. } => 4,
            SimError::AllocationFailure(_) => 5,
            SimError::Io(_) => 6,
        }
    }
}
