//! Game catalog
//!
//! The five games offered by the portal, their display metadata and a
//! factory for fresh instances.

use serde::{Deserialize, Serialize};

use crate::renderer::ArcadeGame;
use crate::sim::{MemoryGame, ReflexGame, RunnerGame, ShooterGame, SnakeGame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Snake,
    Runner,
    Memory,
    Shooter,
    Reflex,
}

impl GameId {
    pub const ALL: [GameId; 5] = [
        GameId::Snake,
        GameId::Runner,
        GameId::Memory,
        GameId::Shooter,
        GameId::Reflex,
    ];

    /// Stable identifier (DOM data attributes, storage keys)
    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Snake => "snake",
            GameId::Runner => "runner",
            GameId::Memory => "memory",
            GameId::Shooter => "shooter",
            GameId::Reflex => "reflex",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "snake" => Some(GameId::Snake),
            "runner" => Some(GameId::Runner),
            "memory" => Some(GameId::Memory),
            "shooter" => Some(GameId::Shooter),
            "reflex" => Some(GameId::Reflex),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameId::Snake => "Cyber Snake",
            GameId::Runner => "Velocity Run",
            GameId::Memory => "Brain Match",
            GameId::Shooter => "Galaxy Guard",
            GameId::Reflex => "Neon Reflex",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameId::Snake => "Classic arcade snake with a neon twist. Grow long and stay alive!",
            GameId::Runner => "Jump over obstacles and run as far as you can in this endless runner.",
            GameId::Memory => "Test your memory by matching pairs of cards in record time.",
            GameId::Shooter => "Protect your ship from incoming space invaders.",
            GameId::Reflex => "Tap the glowing targets before they vanish. Fast fingers win!",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            GameId::Snake => "Arcade",
            GameId::Runner => "Runner",
            GameId::Memory => "Puzzle",
            GameId::Shooter => "Shooting",
            GameId::Reflex => "Reflex",
        }
    }

    /// Drawing surface size in pixels (width, height)
    pub fn surface_size(&self) -> (u32, u32) {
        match self {
            GameId::Runner => (600, 300),
            _ => (400, 400),
        }
    }

    /// Fresh game instance in the Start phase
    pub fn create(&self, seed: u64) -> Box<dyn ArcadeGame> {
        match self {
            GameId::Snake => Box::new(SnakeGame::new(seed)),
            GameId::Runner => Box::new(RunnerGame::new(seed)),
            GameId::Memory => Box::new(MemoryGame::new(seed)),
            GameId::Shooter => Box::new(ShooterGame::new(seed)),
            GameId::Reflex => Box::new(ReflexGame::new(seed)),
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Titles of every game, in catalog order
pub fn titles() -> Vec<&'static str> {
    GameId::ALL.iter().map(GameId::title).collect()
}
