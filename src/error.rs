//! Error types for the simulation core
//!
//! The core reports failures through [`SimError`]. Application layers (config
//! files, report writers, the CLI) wrap these in `anyhow` with context.

use thiserror::Error;

/// Errors produced by the sampling and statistics core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A run or distribution parameter is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A statistic could not be computed as a finite number
    #[error("numerically undefined: {0}")]
    NumericallyUndefined(String),

    /// Statistics were requested before any sample was recorded
    #[error("no data recorded")]
    NoData,

    /// A run is already active; at most one run may be in progress
    #[error("a run is already in progress")]
    AlreadyRunning,
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidParameter(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SimError::invalid("p must be in [0, 1]").to_string(),
            "invalid parameter: p must be in [0, 1]"
        );
        assert_eq!(SimError::NoData.to_string(), "no data recorded");
        assert_eq!(SimError::AlreadyRunning.to_string(), "a run is already in progress");
    }
}
