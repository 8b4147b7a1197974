//! Enemy AI: decision state machine + тактики архетипов.
//!
//! - brain: общий цикл решений (approach / go to pos / pause / knocked down)
//! - tactics: strategy enum (brawler, barrel seeker, rider, portal)
//! - rider, portal: специализированные state'ы, которые отключают ходьбу

pub mod brain;
pub mod portal;
pub mod rider;
pub mod tactics;

pub use brain::{AiState, EnemyBrain};
pub use portal::{PortalSpec, PortalState};
pub use rider::RiderState;
pub use tactics::Tactic;

#[cfg(test)]
mod brain_tests;
