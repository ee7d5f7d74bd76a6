//! Game topologies: rule parameters → built [`crate::chain::Chain`].

pub mod board;
pub mod pong;

pub use board::BoardRules;
pub use pong::PongRules;
