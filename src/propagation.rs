//! Step-by-step distribution propagation and the hitting-time distribution.
//!
//! Starting from a one-hot vector at the start state, repeatedly apply
//! `v ← v·T` and record, after each step n, the mass sitting on every
//! absorbing state — with absorbing rows zeroed during propagation, that
//! mass is exactly the probability of finishing in *exactly* n moves, so
//! the recorded sequence is the full hitting-time distribution P(n) per
//! sink. Summary statistics (first/last/modal hitting step, peak mass)
//! are derived from the sequence after the loop ends.
//!
//! ## Stopping rule
//!
//! The loop is a three-state machine {RUNNING, CONVERGED, STOPPED_BY_FLOOR}:
//!
//! - RUNNING → CONVERGED once every sink's running cumulative exceeds
//!   [`CONVERGENCE_THRESHOLD`] — the distribution is effectively complete.
//! - RUNNING → STOPPED_BY_FLOOR once at least [`MIN_STEPS_BEFORE_FLOOR`]
//!   steps have run *and* every sink's current per-step mass is below
//!   [`MASS_FLOOR`] — covers chains whose sinks split the mass so that no
//!   single cumulative ever nears 1 (every competitive game), and chains
//!   with a tiny never-absorbed residual.
//!
//! Both terminal states end the run; the reason is reported in the result.
//! The floor deliberately requires *every* sink's mass to have decayed: when
//! one sink converges far earlier than another, the slower sink keeps the
//! loop alive until its mass is negligible too.

use nalgebra::{DMatrix, RowDVector};
use serde::Serialize;

use crate::chain::Chain;
use crate::constants::{CONVERGENCE_THRESHOLD, MASS_FLOOR, MIN_STEPS_BEFORE_FLOOR};
use crate::error::ChainError;

/// Mass newly absorbed into `state` at exactly step `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepRecord {
    pub step: u32,
    pub state: usize,
    pub mass: f64,
}

/// Why a propagation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// Every sink's cumulative absorbed mass cleared the threshold.
    Converged,
    /// Past the minimum step count, every sink's per-step mass had decayed
    /// below the negligible-mass floor.
    MassFloor,
}

/// Loop status; `Running` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Finished(StopReason),
}

/// Per-sink summary derived from the recorded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbsorptionSummary {
    /// The absorbing state these figures describe.
    pub state: usize,
    /// Smallest step with strictly positive mass (None if never reached).
    pub min_step: Option<u32>,
    /// Largest step with strictly positive mass.
    pub max_step: Option<u32>,
    /// Step of the single largest recorded mass, first occurrence on ties.
    pub modal_step: Option<u32>,
    /// The mass recorded at `modal_step`.
    pub peak_mass: f64,
    /// Total mass absorbed into this sink over the whole run.
    pub cumulative: f64,
}

/// Full output of one propagation run.
#[derive(Debug, Clone, Serialize)]
pub struct PropagationResult {
    /// One record per sink per step, in step order.
    pub records: Vec<StepRecord>,
    /// One summary per sink, in ascending state order.
    pub summaries: Vec<AbsorptionSummary>,
    /// Steps taken before the loop ended.
    pub steps: u32,
    pub stop: StopReason,
}

impl PropagationResult {
    /// Σ n·P(n) over one sink's records — the mean hitting time restricted
    /// to paths ending in that sink (unnormalized).
    pub fn mean_contribution(&self, state: usize) -> f64 {
        self.records
            .iter()
            .filter(|r| r.state == state)
            .map(|r| f64::from(r.step) * r.mass)
            .sum()
    }

    /// Σ n·P(n) over all sinks: the propagated estimate of the expected
    /// number of moves to finish.
    pub fn mean_hitting_time(&self) -> f64 {
        self.records
            .iter()
            .map(|r| f64::from(r.step) * r.mass)
            .sum()
    }
}

/// Incremental propagation: one chain, one start state, advanced a step at
/// a time. Restartable by constructing a fresh propagator over the same
/// chain. All loop state lives here; nothing global, no I/O.
pub struct Propagator<'a> {
    chain: &'a Chain,
    /// T with absorbing rows zeroed, so v[f] after a step is newly
    /// absorbed mass rather than cumulative mass.
    flow: DMatrix<f64>,
    v: RowDVector<f64>,
    step: u32,
    cumulative: Vec<f64>,
    status: Status,
}

impl<'a> Propagator<'a> {
    pub fn new(chain: &'a Chain, start: usize) -> Result<Self, ChainError> {
        if start >= chain.len() {
            return Err(ChainError::state_index("start", start, chain.len()));
        }
        // A game that starts on a sink is already over: the recorded
        // sequence begins at step 1 and has no slot for a zero-move
        // finish, so the solver paths are the right tool for that input.
        if chain.is_absorbing(start) {
            return Err(ChainError::Configuration(format!(
                "start state {start} is absorbing; propagation needs a non-absorbing start"
            )));
        }
        if chain.absorbing().is_empty() {
            return Err(ChainError::Configuration(
                "chain has no absorbing states to propagate toward".to_string(),
            ));
        }
        let mut flow = chain.transitions().clone();
        for &f in chain.absorbing() {
            for j in 0..chain.len() {
                flow[(f, j)] = 0.0;
            }
        }
        let mut v = RowDVector::zeros(chain.len());
        v[start] = 1.0;
        Ok(Self {
            chain,
            flow,
            v,
            step: 0,
            cumulative: vec![0.0; chain.absorbing().len()],
            status: Status::Running,
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn steps_taken(&self) -> u32 {
        self.step
    }

    /// Cumulative absorbed mass per sink, in ascending state order.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Advance one step and return the per-sink records for it, or `None`
    /// once the loop has reached a terminal state.
    pub fn advance(&mut self) -> Option<Vec<StepRecord>> {
        if self.status != Status::Running {
            return None;
        }
        self.step += 1;
        self.v = &self.v * &self.flow;

        let mut records = Vec::with_capacity(self.chain.absorbing().len());
        for (k, &f) in self.chain.absorbing().iter().enumerate() {
            let mass = self.v[f];
            self.cumulative[k] += mass;
            records.push(StepRecord {
                step: self.step,
                state: f,
                mass,
            });
        }

        let converged = self
            .cumulative
            .iter()
            .all(|&c| c > CONVERGENCE_THRESHOLD);
        if converged {
            self.status = Status::Finished(StopReason::Converged);
        } else if self.step >= MIN_STEPS_BEFORE_FLOOR
            && records.iter().all(|r| r.mass.abs() < MASS_FLOOR)
        {
            self.status = Status::Finished(StopReason::MassFloor);
        }
        Some(records)
    }
}

/// Run a full propagation from `start` and derive per-sink summaries.
pub fn propagate(chain: &Chain, start: usize) -> Result<PropagationResult, ChainError> {
    let mut prop = Propagator::new(chain, start)?;
    let mut records = Vec::new();
    while let Some(step_records) = prop.advance() {
        records.extend(step_records);
    }
    let stop = match prop.status() {
        Status::Finished(reason) => reason,
        Status::Running => unreachable!("advance() returned None while running"),
    };
    let summaries = summarize(chain, &records, prop.cumulative());
    Ok(PropagationResult {
        records,
        summaries,
        steps: prop.steps_taken(),
        stop,
    })
}

fn summarize(chain: &Chain, records: &[StepRecord], cumulative: &[f64]) -> Vec<AbsorptionSummary> {
    chain
        .absorbing()
        .iter()
        .enumerate()
        .map(|(k, &f)| {
            let mut min_step = None;
            let mut max_step = None;
            let mut modal_step = None;
            let mut peak_mass = 0.0;
            for r in records.iter().filter(|r| r.state == f) {
                if r.mass > 0.0 {
                    min_step.get_or_insert(r.step);
                    max_step = Some(r.step);
                }
                // Strict > keeps the first occurrence on ties.
                if modal_step.is_none() || r.mass > peak_mass {
                    peak_mass = r.mass;
                    modal_step = Some(r.step);
                }
            }
            AbsorptionSummary {
                state: f,
                min_step,
                max_step,
                modal_step,
                peak_mass,
                cumulative: cumulative[k],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainBuilder;

    /// 0 → sink 1 with prob 1/2, stays at 0 otherwise: P(n) = 0.5^n.
    fn geometric() -> Chain {
        let mut b = ChainBuilder::new(2);
        b.set(0, 0, 0.5).unwrap();
        b.set(0, 1, 0.5).unwrap();
        b.mark_absorbing(1).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn geometric_converges_at_step_17() {
        // Cumulative after n steps is 1 - 0.5^n; it first clears 0.99999
        // at n = 17 (1 - 2^-17 ≈ 0.9999924).
        let result = propagate(&geometric(), 0).unwrap();
        assert_eq!(result.stop, StopReason::Converged);
        assert_eq!(result.steps, 17);
        let s = &result.summaries[0];
        assert_eq!(s.min_step, Some(1));
        assert_eq!(s.max_step, Some(17));
        assert_eq!(s.modal_step, Some(1));
        assert!((s.peak_mass - 0.5).abs() < 1e-15);
    }

    #[test]
    fn geometric_masses_are_powers_of_half() {
        let result = propagate(&geometric(), 0).unwrap();
        for r in &result.records {
            let expected = 0.5f64.powi(r.step as i32);
            assert!(
                (r.mass - expected).abs() < 1e-15,
                "step {}: mass {} != {}",
                r.step,
                r.mass,
                expected
            );
        }
    }

    #[test]
    fn uneven_sinks_stop_by_mass_floor_at_step_100() {
        // Sink 1 collects 0.9 at step 1 and converges immediately; sink 3
        // drains slowly through state 2. Neither cumulative can clear the
        // threshold, and the masses decay below the floor well before step
        // 100, so the floor fires at exactly the minimum step count.
        let mut b = ChainBuilder::new(4);
        b.set(0, 1, 0.9).unwrap();
        b.set(0, 2, 0.1).unwrap();
        b.set(2, 2, 0.5).unwrap();
        b.set(2, 3, 0.5).unwrap();
        b.mark_absorbing(1).unwrap();
        b.mark_absorbing(3).unwrap();
        let chain = b.build().unwrap();
        let result = propagate(&chain, 0).unwrap();
        assert_eq!(result.stop, StopReason::MassFloor);
        assert_eq!(result.steps, 100);
        let by_state = |s| {
            result
                .summaries
                .iter()
                .find(|sum: &&AbsorptionSummary| sum.state == s)
                .copied()
                .unwrap()
        };
        let fast = by_state(1);
        assert_eq!(fast.min_step, Some(1));
        assert_eq!(fast.max_step, Some(1));
        assert!((fast.cumulative - 0.9).abs() < 1e-12);
        let slow = by_state(3);
        assert_eq!(slow.min_step, Some(2));
        assert!((slow.cumulative - 0.1).abs() < 1e-12);
    }

    #[test]
    fn no_absorption_still_terminates() {
        // 0 ↔ 2 forever; sink 1 never reached. Masses are all below the
        // floor from the start, so the run stops at the minimum step count.
        let mut b = ChainBuilder::new(3);
        b.set(0, 2, 1.0).unwrap();
        b.set(2, 0, 1.0).unwrap();
        b.mark_absorbing(1).unwrap();
        let chain = b.build().unwrap();
        let result = propagate(&chain, 0).unwrap();
        assert_eq!(result.stop, StopReason::MassFloor);
        assert_eq!(result.steps, 100);
        assert_eq!(result.summaries[0].min_step, None);
        assert_eq!(result.summaries[0].cumulative, 0.0);
    }

    #[test]
    fn absorbing_start_is_rejected() {
        // The solver answers the already-finished case (0 expected steps,
        // indicator probabilities); propagation has no step-0 record to
        // carry it and must refuse instead of reporting zero absorption.
        let chain = geometric();
        assert!(matches!(
            propagate(&chain, 1),
            Err(ChainError::Configuration(_))
        ));
    }

    #[test]
    fn propagator_is_restartable() {
        let chain = geometric();
        let first = propagate(&chain, 0).unwrap();
        let second = propagate(&chain, 0).unwrap();
        assert_eq!(first.steps, second.steps);
        assert_eq!(first.records, second.records);
    }
}
