//! The Snakes-and-Ladders board chain.
//!
//! States are squares `0..=squares`, with the goal square absorbing. From
//! square s each die face advances the token by its value with probability
//! `1/die_faces`. House rule: the goal does not require an exact landing —
//! every face that reaches *or passes* the goal contributes its share to
//! the goal transition, so the last `die_faces - 1` squares carry a
//! linearly increasing goal probability (1/6, 2/6, … 6/6 on the classic
//! board).
//!
//! Snakes and ladders are shortcut overrides applied in list order after
//! the base movement rule; see [`crate::chain::ChainBuilder::apply_shortcuts`]
//! for the ordering semantics.

use serde::{Deserialize, Serialize};

use crate::chain::{Chain, ChainBuilder};
use crate::constants::{CLASSIC_DIE_FACES, CLASSIC_SNAKES, CLASSIC_SQUARES};
use crate::error::ChainError;

/// Board topology parameters. `Default` is the classic board:
/// 100 squares, a six-sided die, and the nine snakes (no ladders).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRules {
    /// Number of playing squares; the goal is square `squares` and the
    /// chain has `squares + 1` states.
    pub squares: usize,
    /// Faces on the die, each rolled with equal probability.
    pub die_faces: usize,
    /// Shortcut overrides `(from, to)`, applied in order. Snakes point
    /// down, ladders point up; the builder treats both identically.
    pub shortcuts: Vec<(usize, usize)>,
}

impl Default for BoardRules {
    fn default() -> Self {
        Self {
            squares: CLASSIC_SQUARES,
            die_faces: CLASSIC_DIE_FACES,
            shortcuts: CLASSIC_SNAKES.to_vec(),
        }
    }
}

impl BoardRules {
    /// The classic board with no shortcuts at all.
    pub fn bare(squares: usize, die_faces: usize) -> Self {
        Self {
            squares,
            die_faces,
            shortcuts: Vec::new(),
        }
    }

    /// The goal state index.
    pub fn goal(&self) -> usize {
        self.squares
    }

    /// Build the board chain.
    pub fn build(&self) -> Result<Chain, ChainError> {
        if self.squares == 0 || self.die_faces == 0 {
            return Err(ChainError::Configuration(format!(
                "board needs at least one square and one die face (got {} squares, {} faces)",
                self.squares, self.die_faces
            )));
        }
        let goal = self.goal();
        let face_prob = 1.0 / self.die_faces as f64;
        let mut b = ChainBuilder::new(goal + 1);
        for square in 0..goal {
            for face in 1..=self.die_faces {
                let landing = square + face;
                // Reach-or-pass: every overshooting face feeds the goal.
                b.add(square, landing.min(goal), face_prob)?;
            }
        }
        b.mark_absorbing(goal)?;
        b.apply_shortcuts(&self.shortcuts)?;
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_board_dimensions() {
        let chain = BoardRules::default().build().unwrap();
        assert_eq!(chain.len(), 101);
        assert_eq!(chain.absorbing(), &[100]);
    }

    #[test]
    fn house_rule_goal_shares_increase_linearly() {
        // From square 100 - k, the faces k..=6 reach or pass, so 7 - k of
        // the six faces feed the goal: 1/6 from square 94 up to 6/6 from 99.
        let chain = BoardRules::bare(100, 6).build().unwrap();
        let t = chain.transitions();
        for k in 1..=6usize {
            let share = t[(100 - k, 100)];
            assert!(
                (share - (7 - k) as f64 / 6.0).abs() < 1e-12,
                "square {}: goal share {} != {}/6",
                100 - k,
                share,
                7 - k
            );
        }
    }

    #[test]
    fn snake_squares_receive_no_mass() {
        let chain = BoardRules::default().build().unwrap();
        let t = chain.transitions();
        for &(head, _) in &CLASSIC_SNAKES {
            for row in 0..chain.len() {
                assert_eq!(t[(row, head)], 0.0, "mass into snake head {head}");
            }
        }
    }

    #[test]
    fn snake_tails_receive_redirected_mass() {
        let chain = BoardRules::default().build().unwrap();
        let t = chain.transitions();
        // Squares 5..=10 roll onto 11 and must slide to 7 instead.
        for from in 5..=10usize {
            assert!(t[(from, 7)] >= 1.0 / 6.0, "no slide from {from}");
        }
    }

    #[test]
    fn out_of_range_shortcut_rejected() {
        let rules = BoardRules {
            shortcuts: vec![(250, 3)],
            ..BoardRules::default()
        };
        assert!(matches!(
            rules.build(),
            Err(ChainError::Configuration(_))
        ));
    }

    #[test]
    fn shortcut_into_goal_is_allowed() {
        // A ladder straight to the goal: its mass lands on the goal column
        // and the goal row stays a pure self-loop.
        let rules = BoardRules {
            shortcuts: vec![(50, 100)],
            ..BoardRules::bare(100, 6)
        };
        let chain = rules.build().unwrap();
        let t = chain.transitions();
        assert!(t[(49, 100)] > 0.0);
        assert_eq!(t[(100, 100)], 1.0);
    }
}
