//! # Absorbing — exact analysis of absorbing Markov chains for games of chance
//!
//! Models simple games (a Pong-like rally and the classic 100-square
//! Snakes-and-Ladders board) as discrete-time absorbing Markov chains and
//! answers two questions about each: *how long does a game last* and *who
//! wins, and after how many moves*.
//!
//! ## Pipeline overview
//!
//! | Stage | Rust module | Description |
//! |-------|-------------|-------------|
//! | Build | [`chain`], [`games`] | Construct the dense transition matrix from game rules, then apply shortcut overrides (snakes, ladders) in list order |
//! | Solve | [`solver`] | Reduce to `(I - T)·x = b` and LU-solve for expected hitting time or per-sink absorption probability — one exact scalar |
//! | Propagate | [`propagation`] | Advance the state distribution `v ← v·T` step by step, recording the mass absorbed per sink per step until convergence; derive min/max/modal hitting times |
//! | Sweep | [`sweep`] | Run build+solve+propagate over a grid of rule parameters in parallel |
//!
//! The solver and the propagator are independent consumers of the same
//! built [`chain::Chain`]; the worked examples cross-validate them (the
//! solver's expectation must equal Σ n·P(n) over the propagated
//! distribution).
//!
//! ## Conventions
//!
//! States are `0..N`. A built matrix is row-stochastic with absorbing rows
//! stored as pure self-loops; the solver and the propagator each restate
//! those rows for their own formulation (identity rows in the reduced
//! system, zeroed rows during propagation so that `v[f]` after a step is
//! exactly the newly absorbed mass). All probabilities are `f64`; matrices
//! are dense (`nalgebra`), which is ample for N ≤ ~101.

pub mod chain;
pub mod constants;
pub mod env_config;
pub mod error;
pub mod games;
pub mod propagation;
pub mod solver;
pub mod sweep;

pub use chain::{Chain, ChainBuilder};
pub use error::ChainError;
