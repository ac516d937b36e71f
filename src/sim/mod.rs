//! Simulation module
//!
//! All gameplay logic lives here. Each game is a closed loop:
//! - Fixed ticks only (score-dependent interval for snake)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod memory;
pub mod reflex;
pub mod runner;
pub mod shooter;
pub mod snake;
pub mod state;

pub use collision::Aabb;
pub use memory::{Card, MemoryGame, Symbol};
pub use reflex::{ReflexGame, Target};
pub use runner::{Obstacle, RunnerGame};
pub use shooter::{Enemy, Projectile, ShooterGame};
pub use snake::{Cell, Direction, SnakeGame};
pub use state::{Entity, GamePhase, ScoreState};

use crate::catalog::GameId;
use crate::consts::FRAME_MS;
use crate::input::ControlState;

/// When the render step has to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawPolicy {
    /// Physics games: every animation frame while playing
    EveryFrame,
    /// Tick-driven games: only after the state changed
    OnChange,
}

/// Common contract of the five mini-games
pub trait MiniGame {
    /// Catalog identifier (also the persistence key prefix)
    fn id(&self) -> GameId;

    fn phase(&self) -> GamePhase;

    fn score(&self) -> &ScoreState;

    fn score_mut(&mut self) -> &mut ScoreState;

    /// Start or restart: resets entities and the current score, enters Playing
    fn start(&mut self);

    /// Advance by one tick. Returns the new phase when a transition happened.
    fn step(&mut self, controls: &ControlState) -> Option<GamePhase>;

    /// Milliseconds between ticks
    fn tick_interval_ms(&self) -> f64 {
        FRAME_MS
    }

    fn redraw_policy(&self) -> RedrawPolicy {
        RedrawPolicy::EveryFrame
    }
}
