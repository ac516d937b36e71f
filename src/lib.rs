//! Neon Arcade - mini-game core for a browser gaming portal
//!
//! Core modules:
//! - `sim`: Per-game simulation steps (snake, runner, memory, shooter, reflex)
//! - `input`: Raw device events to logical actions
//! - `runtime`: Fixed-step driver shared by every game
//! - `renderer`: 2D drawing surface abstraction and per-game scenes
//! - `persistence`: Key-value store (LocalStorage on web)
//! - `platform`: Browser frame loop and listener guards
//!
//! Portal services: `catalog`, `highscores`, `settings`, `assistant`.

pub mod assistant;
pub mod catalog;
pub mod highscores;
pub mod input;
pub mod persistence;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod renderer;
pub mod runtime;
pub mod settings;
pub mod sim;

pub use catalog::GameId;
pub use runtime::GameRuntime;
pub use settings::{Language, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep for frame-driven games (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap fed into the accumulator (tab switches etc.)
    pub const MAX_FRAME_GAP_MS: f64 = 250.0;
}
