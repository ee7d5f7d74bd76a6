//! Convergence thresholds, numeric tolerances, and classic board data.
//!
//! The three propagation thresholds work together: a run ends either when
//! every sink's cumulative absorbed mass clears [`CONVERGENCE_THRESHOLD`],
//! or when at least [`MIN_STEPS_BEFORE_FLOOR`] steps have elapsed and every
//! sink's per-step mass has decayed below [`MASS_FLOOR`].

/// Cumulative absorbed probability treated as "effectively 1".
pub const CONVERGENCE_THRESHOLD: f64 = 0.99999;

/// Steps that must elapse before the negligible-mass floor may stop a run.
pub const MIN_STEPS_BEFORE_FLOOR: u32 = 100;

/// Per-step absorbing mass below which a sink is considered drained.
pub const MASS_FLOOR: f64 = 1e-16;

/// Tolerance for the row-stochasticity check on built matrices.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Number of playing squares on the classic board (states 0..=100).
pub const CLASSIC_SQUARES: usize = 100;

/// Faces on the classic die.
pub const CLASSIC_DIE_FACES: usize = 6;

/// The nine snakes of the classic board, in application order.
pub const CLASSIC_SNAKES: [(usize, usize); 9] = [
    (11, 7),
    (18, 13),
    (28, 12),
    (36, 34),
    (77, 16),
    (47, 26),
    (83, 39),
    (92, 75),
    (99, 70),
];

/// The nine ladders of the classic board, in application order.
pub const CLASSIC_LADDERS: [(usize, usize); 9] = [
    (3, 19),
    (15, 37),
    (22, 42),
    (25, 64),
    (41, 73),
    (53, 74),
    (63, 86),
    (76, 91),
    (84, 98),
];
