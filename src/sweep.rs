//! Parameter-grid sweep over the Pong return probabilities.
//!
//! For every (p, q) in the grid, builds the rally chain and runs both
//! analysis paths: the exact solver for the expected number of moves, and
//! the propagator for the two players' full hitting-time distributions.
//! Sweep iterations share nothing and run in parallel under rayon; the
//! engine itself stays single-threaded per iteration.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::ChainError;
use crate::games::pong::{PongRules, STATE_P1_WINS, STATE_P2_WINS};
use crate::propagation::{propagate, AbsorptionSummary, StepRecord};
use crate::solver::expected_hitting_time;

/// The default grid: 0.1 to 0.9 in steps of 0.1.
pub fn default_grid() -> Vec<f64> {
    (1..=9).map(|i| f64::from(i) / 10.0).collect()
}

/// One grid point's full output.
#[derive(Debug, Clone, Serialize)]
pub struct PongSweepResult {
    pub p: f64,
    pub q: f64,
    /// Exact expected number of moves from the serve (solver path).
    pub expected_moves: f64,
    /// Per-step winning mass for player one, in step order.
    pub p1_records: Vec<StepRecord>,
    /// Per-step winning mass for player two, in step order.
    pub p2_records: Vec<StepRecord>,
    pub p1_summary: AbsorptionSummary,
    pub p2_summary: AbsorptionSummary,
}

/// Analyze a single (p, q) point.
pub fn analyze_pong(serve: f64, p: f64, q: f64) -> Result<PongSweepResult, ChainError> {
    let chain = PongRules { serve, p, q }.build()?;
    let expected_moves = expected_hitting_time(&chain, 0)?;
    let run = propagate(&chain, 0)?;

    let for_state = |state: usize| -> Vec<StepRecord> {
        run.records.iter().filter(|r| r.state == state).copied().collect()
    };
    let summary_for = |state: usize| -> AbsorptionSummary {
        // Both sinks always appear in the summaries of a rally chain.
        *run.summaries
            .iter()
            .find(|s| s.state == state)
            .expect("rally chain summary missing a sink")
    };

    Ok(PongSweepResult {
        p,
        q,
        expected_moves,
        p1_records: for_state(STATE_P1_WINS),
        p2_records: for_state(STATE_P2_WINS),
        p1_summary: summary_for(STATE_P1_WINS),
        p2_summary: summary_for(STATE_P2_WINS),
    })
}

/// Run the full p × q grid in parallel. Results come back in grid order
/// (p-major), independent of scheduling.
pub fn sweep_pong(serve: f64, grid: &[f64]) -> Result<Vec<PongSweepResult>, ChainError> {
    let points: Vec<(f64, f64)> = grid
        .iter()
        .flat_map(|&p| grid.iter().map(move |&q| (p, q)))
        .collect();
    points
        .par_iter()
        .map(|&(p, q)| analyze_pong(serve, p, q))
        .collect()
}
