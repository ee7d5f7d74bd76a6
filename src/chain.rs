//! Chain representation and the transition-matrix builder.
//!
//! [`ChainBuilder`] assembles a dense row-stochastic matrix from movement
//! rules, applies shortcut overrides in list order, and validates the
//! result into an immutable [`Chain`]. Shortcut application is the one
//! behavioral subtlety here: pairs are applied strictly in the order given,
//! and a destination written by an earlier pair may act as the source of a
//! later pair in the same call (self-composition), so reordering the list
//! changes the chain.

use nalgebra::DMatrix;

use crate::constants::ROW_SUM_TOLERANCE;
use crate::error::ChainError;

/// An immutable absorbing Markov chain: a row-stochastic transition matrix
/// plus the sorted set of absorbing states.
///
/// Absorbing rows are stored as pure self-loops (probability 1 to self).
/// Consumers that need a different convention restate those rows
/// themselves; the built matrix never changes.
#[derive(Debug, Clone)]
pub struct Chain {
    transitions: DMatrix<f64>,
    absorbing: Vec<usize>,
}

impl Chain {
    /// Number of states.
    pub fn len(&self) -> usize {
        self.transitions.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.nrows() == 0
    }

    /// The transition matrix T. Row i, column j holds P(i → j).
    pub fn transitions(&self) -> &DMatrix<f64> {
        &self.transitions
    }

    /// Absorbing states, sorted ascending.
    pub fn absorbing(&self) -> &[usize] {
        &self.absorbing
    }

    pub fn is_absorbing(&self, state: usize) -> bool {
        self.absorbing.binary_search(&state).is_ok()
    }
}

/// Builds a [`Chain`]: set transition mass, mark absorbing states, apply
/// shortcuts, then [`build`](ChainBuilder::build).
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    matrix: DMatrix<f64>,
    absorbing: Vec<usize>,
}

impl ChainBuilder {
    /// A builder over `n` states with no transitions and no absorbing set.
    pub fn new(n: usize) -> Self {
        Self {
            matrix: DMatrix::zeros(n, n),
            absorbing: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    /// Set P(from → to) = prob, replacing any previous value.
    pub fn set(&mut self, from: usize, to: usize, prob: f64) -> Result<&mut Self, ChainError> {
        let n = self.len();
        if from >= n {
            return Err(ChainError::state_index("transition source", from, n));
        }
        if to >= n {
            return Err(ChainError::state_index("transition target", to, n));
        }
        if !(0.0..=1.0).contains(&prob) {
            return Err(ChainError::probability("transition", prob));
        }
        self.matrix[(from, to)] = prob;
        Ok(self)
    }

    /// Add `prob` to P(from → to).
    pub fn add(&mut self, from: usize, to: usize, prob: f64) -> Result<&mut Self, ChainError> {
        let current = if from < self.len() && to < self.len() {
            self.matrix[(from, to)]
        } else {
            0.0
        };
        self.set(from, to, current + prob)
    }

    /// Declare `state` absorbing. Its row is forced to a pure self-loop at
    /// [`build`](ChainBuilder::build) time.
    pub fn mark_absorbing(&mut self, state: usize) -> Result<&mut Self, ChainError> {
        let n = self.len();
        if state >= n {
            return Err(ChainError::state_index("absorbing", state, n));
        }
        if !self.absorbing.contains(&state) {
            self.absorbing.push(state);
        }
        Ok(self)
    }

    /// Apply one shortcut: move every row's mass aimed at column `src` to
    /// column `dst`, preserving each row's total mass exactly.
    ///
    /// A pair whose source is absorbing is suppressed — mass that already
    /// reached a goal is never rerouted away. `src == dst` is a no-op.
    pub fn apply_shortcut(&mut self, src: usize, dst: usize) -> Result<&mut Self, ChainError> {
        let n = self.len();
        if src >= n {
            return Err(ChainError::state_index("shortcut source", src, n));
        }
        if dst >= n {
            return Err(ChainError::state_index("shortcut destination", dst, n));
        }
        if src == dst || self.absorbing.contains(&src) {
            return Ok(self);
        }
        for row in 0..n {
            let mass = self.matrix[(row, src)];
            if mass > 0.0 {
                self.matrix[(row, src)] = 0.0;
                self.matrix[(row, dst)] += mass;
            }
        }
        Ok(self)
    }

    /// Apply shortcuts in list order. Order matters: see the module docs on
    /// self-composition.
    pub fn apply_shortcuts(&mut self, pairs: &[(usize, usize)]) -> Result<&mut Self, ChainError> {
        for &(src, dst) in pairs {
            self.apply_shortcut(src, dst)?;
        }
        Ok(self)
    }

    /// Finalize: force absorbing rows to self-loops, verify every
    /// non-absorbing row is stochastic, and freeze the chain.
    pub fn build(mut self) -> Result<Chain, ChainError> {
        self.absorbing.sort_unstable();
        for &f in &self.absorbing {
            for j in 0..self.len() {
                self.matrix[(f, j)] = 0.0;
            }
            self.matrix[(f, f)] = 1.0;
        }
        for row in 0..self.len() {
            if self.absorbing.binary_search(&row).is_ok() {
                continue;
            }
            let sum: f64 = self.matrix.row(row).iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(ChainError::Configuration(format!(
                    "row {row} sums to {sum}, expected 1"
                )));
            }
        }
        Ok(Chain {
            transitions: self.matrix,
            absorbing: self.absorbing,
        })
    }
}
