//! Closed-form absorption quantities via the reduced linear system.
//!
//! For a chain with matrix T and absorbing set F, form A = I − T on
//! non-absorbing rows with absorbing rows forced to identity. Then
//! `A·x = 1` (ones on non-absorbing rows, zeros on absorbing rows) gives
//! the expected hitting time per start state, and `A·x = e_f` (indicator
//! of a target sink) gives the probability of ultimately being absorbed in
//! f. Both are solved exactly by dense LU — this is the one-shot path; the
//! full time distribution comes from [`crate::propagation`].

use nalgebra::{DMatrix, DVector};

use crate::chain::Chain;
use crate::error::ChainError;

/// Expected number of steps from `start` until absorption.
pub fn expected_hitting_time(chain: &Chain, start: usize) -> Result<f64, ChainError> {
    check_start(chain, start)?;
    let n = chain.len();
    let mut b = DVector::zeros(n);
    for row in 0..n {
        if !chain.is_absorbing(row) {
            b[row] = 1.0;
        }
    }
    let x = solve_reduced(chain, b)?;
    Ok(x[start])
}

/// Probability of ultimately being absorbed in `target` when starting from
/// `start`. `target` must be absorbing.
pub fn absorption_probability(
    chain: &Chain,
    target: usize,
    start: usize,
) -> Result<f64, ChainError> {
    check_start(chain, start)?;
    if target >= chain.len() {
        return Err(ChainError::state_index("target", target, chain.len()));
    }
    if !chain.is_absorbing(target) {
        return Err(ChainError::Configuration(format!(
            "target state {target} is not absorbing"
        )));
    }
    let mut b = DVector::zeros(chain.len());
    b[target] = 1.0;
    let x = solve_reduced(chain, b)?;
    Ok(x[start])
}

fn check_start(chain: &Chain, start: usize) -> Result<(), ChainError> {
    if start >= chain.len() {
        return Err(ChainError::state_index("start", start, chain.len()));
    }
    Ok(())
}

/// Build A from the chain and LU-solve `A·x = b`.
fn solve_reduced(chain: &Chain, b: DVector<f64>) -> Result<DVector<f64>, ChainError> {
    let n = chain.len();
    let t = chain.transitions();
    let mut a = DMatrix::zeros(n, n);
    for i in 0..n {
        if chain.is_absorbing(i) {
            a[(i, i)] = 1.0;
        } else {
            for j in 0..n {
                a[(i, j)] = if i == j { 1.0 - t[(i, j)] } else { -t[(i, j)] };
            }
        }
    }
    a.lu().solve(&b).ok_or_else(|| ChainError::SingularSystem {
        unreachable: unreachable_states(chain),
    })
}

/// Non-absorbing states with no positive-probability path to any absorbing
/// state — the structural cause of a singular reduced system. Reverse BFS
/// from the absorbing set over positive transitions.
fn unreachable_states(chain: &Chain) -> Vec<usize> {
    let n = chain.len();
    let t = chain.transitions();
    let mut reaches = vec![false; n];
    let mut queue: Vec<usize> = chain.absorbing().to_vec();
    for &f in chain.absorbing() {
        reaches[f] = true;
    }
    while let Some(to) = queue.pop() {
        for from in 0..n {
            if !reaches[from] && t[(from, to)] > 0.0 {
                reaches[from] = true;
                queue.push(from);
            }
        }
    }
    (0..n).filter(|&s| !reaches[s]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainBuilder;

    fn coin_flip() -> Chain {
        let mut b = ChainBuilder::new(3);
        b.set(0, 1, 0.5).unwrap();
        b.set(0, 2, 0.5).unwrap();
        b.mark_absorbing(1).unwrap();
        b.mark_absorbing(2).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn coin_flip_expected_one_step() {
        let chain = coin_flip();
        let steps = expected_hitting_time(&chain, 0).unwrap();
        assert!((steps - 1.0).abs() < 1e-12, "steps = {steps}");
    }

    #[test]
    fn coin_flip_even_absorption() {
        let chain = coin_flip();
        for sink in [1, 2] {
            let p = absorption_probability(&chain, sink, 0).unwrap();
            assert!((p - 0.5).abs() < 1e-12, "p({sink}) = {p}");
        }
    }

    #[test]
    fn absorption_from_a_sink_is_indicator() {
        let chain = coin_flip();
        assert_eq!(absorption_probability(&chain, 1, 1).unwrap(), 1.0);
        assert_eq!(absorption_probability(&chain, 1, 2).unwrap(), 0.0);
    }

    #[test]
    fn non_absorbing_target_rejected() {
        let chain = coin_flip();
        assert!(matches!(
            absorption_probability(&chain, 0, 0),
            Err(ChainError::Configuration(_))
        ));
    }

    #[test]
    fn isolated_component_reports_unreachable_states() {
        // 0 ↔ 1 closed loop, sink 2 unreachable.
        let mut b = ChainBuilder::new(3);
        b.set(0, 1, 1.0).unwrap();
        b.set(1, 0, 1.0).unwrap();
        b.mark_absorbing(2).unwrap();
        let chain = b.build().unwrap();
        match expected_hitting_time(&chain, 0) {
            Err(ChainError::SingularSystem { unreachable }) => {
                assert_eq!(unreachable, vec![0, 1]);
            }
            other => panic!("expected SingularSystem, got {other:?}"),
        }
    }
}
