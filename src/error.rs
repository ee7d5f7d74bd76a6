//! Error taxonomy for chain construction and analysis.
//!
//! Two classes only: [`ChainError::Configuration`] for caller-fixable input
//! problems caught eagerly at build time, and [`ChainError::SingularSystem`]
//! for a structurally broken chain (some non-absorbing state cannot reach
//! absorption, so the reduced system has no solution). All operations are
//! pure in-memory computations, so there is no transient/retryable class
//! and no partial failure: each public operation succeeds fully or returns
//! one of these.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    /// Invalid input: a probability outside `[0, 1]` or a state index
    /// outside the chain.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The reduced absorption system is not invertible. Carries the
    /// non-absorbing states with no path to any absorbing state (empty if
    /// the singularity has another numeric cause).
    #[error("singular absorption system; states unable to reach absorption: {unreachable:?}")]
    SingularSystem { unreachable: Vec<usize> },
}

impl ChainError {
    pub(crate) fn probability(name: &str, value: f64) -> Self {
        ChainError::Configuration(format!("probability `{name}` = {value} is outside [0, 1]"))
    }

    pub(crate) fn state_index(what: &str, state: usize, len: usize) -> Self {
        ChainError::Configuration(format!(
            "{what} state {state} is outside the chain (0..{len})"
        ))
    }
}
