//! The Pong rally chain: five states, two competing sinks.
//!
//! A point is a rally between two players. From the serve, the ball goes to
//! player one's side with probability `serve` (their opponent must return
//! it) and to player two's side otherwise. A player facing the ball returns
//! it with their return probability (`p` for player one, `q` for player
//! two) or misses, ending the point in the opponent's favor.
//!
//! States:
//!
//! | # | Meaning |
//! |---|---------|
//! | 0 | serve |
//! | 1 | ball at player one |
//! | 2 | ball at player two |
//! | 3 | player one wins (absorbing) |
//! | 4 | player two wins (absorbing) |

use serde::{Deserialize, Serialize};

use crate::chain::{Chain, ChainBuilder};
use crate::error::ChainError;

pub const STATE_SERVE: usize = 0;
pub const STATE_P1_TO_RETURN: usize = 1;
pub const STATE_P2_TO_RETURN: usize = 2;
pub const STATE_P1_WINS: usize = 3;
pub const STATE_P2_WINS: usize = 4;

/// Branching probabilities for one rally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PongRules {
    /// Probability the serve lands on player one's side.
    pub serve: f64,
    /// Player one's return probability.
    pub p: f64,
    /// Player two's return probability.
    pub q: f64,
}

impl Default for PongRules {
    fn default() -> Self {
        Self {
            serve: 0.5,
            p: 0.5,
            q: 0.5,
        }
    }
}

impl PongRules {
    pub fn new(p: f64, q: f64) -> Self {
        Self { serve: 0.5, p, q }
    }

    /// Build the five-state rally chain.
    pub fn build(&self) -> Result<Chain, ChainError> {
        for (name, value) in [("serve", self.serve), ("p", self.p), ("q", self.q)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ChainError::probability(name, value));
            }
        }
        let mut b = ChainBuilder::new(5);
        b.set(STATE_SERVE, STATE_P1_TO_RETURN, self.serve)?;
        b.set(STATE_SERVE, STATE_P2_TO_RETURN, 1.0 - self.serve)?;
        // Player one returns (ball passes to player two) or misses.
        b.set(STATE_P1_TO_RETURN, STATE_P2_TO_RETURN, self.p)?;
        b.set(STATE_P1_TO_RETURN, STATE_P2_WINS, 1.0 - self.p)?;
        // Player two returns or misses.
        b.set(STATE_P2_TO_RETURN, STATE_P1_TO_RETURN, self.q)?;
        b.set(STATE_P2_TO_RETURN, STATE_P1_WINS, 1.0 - self.q)?;
        b.mark_absorbing(STATE_P1_WINS)?;
        b.mark_absorbing(STATE_P2_WINS)?;
        b.build()
    }
}
