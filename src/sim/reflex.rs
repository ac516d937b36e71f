//! Reflex tap
//!
//! One target, a fixed countdown. Every hit moves the target somewhere new.
//! Positions are percentages of the play area so the host can lay the
//! target out at any size.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GamePhase, ScoreState, seeded_rng};
use super::MiniGame;
use crate::catalog::GameId;
use crate::input::ControlState;

/// Round length in seconds
pub const ROUND_SECONDS: u32 = 30;
/// Ticks per countdown second
pub const TICKS_PER_SECOND: u32 = 60;
/// Targets stay inside [MARGIN, 100 - MARGIN] percent
pub const MARGIN_PERCENT: f32 = 10.0;
pub const SURFACE_SIZE: f32 = 400.0;
/// Hit radius in surface pixels
pub const TARGET_RADIUS: f32 = 32.0;

/// The tap target, positioned in percent of the play area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub center: Vec2,
}

impl Target {
    pub const fn centered() -> Self {
        Self {
            center: Vec2::splat(50.0),
        }
    }

    /// Centre in pixels on a square surface of side `size`
    pub fn on_surface(&self, size: f32) -> Vec2 {
        self.center / 100.0 * size
    }

    pub fn contains(&self, point: Vec2, size: f32) -> bool {
        point.distance(self.on_surface(size)) <= TARGET_RADIUS
    }
}

#[derive(Debug, Clone)]
pub struct ReflexGame {
    phase: GamePhase,
    score: ScoreState,
    target: Target,
    time_left: u32,
    /// Ticks into the current countdown second
    subsecond_ticks: u32,
    rng: Pcg32,
}

impl ReflexGame {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Start,
            score: ScoreState::default(),
            target: Target::centered(),
            time_left: ROUND_SECONDS,
            subsecond_ticks: 0,
            rng: seeded_rng(seed),
        }
    }

    /// Target centre in percent of the play area
    pub fn target(&self) -> Vec2 {
        self.target.center
    }

    /// Target centre in surface pixels
    pub fn target_on_surface(&self) -> Vec2 {
        self.target.on_surface(SURFACE_SIZE)
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Register a hit on the target. Ignored unless playing.
    pub fn tap(&mut self) -> bool {
        if !self.phase.is_playing() {
            return false;
        }
        self.score.add(1);
        let span = 100.0 - 2.0 * MARGIN_PERCENT;
        self.target.center = Vec2::new(
            self.rng.random::<f32>() * span + MARGIN_PERCENT,
            self.rng.random::<f32>() * span + MARGIN_PERCENT,
        );
        true
    }

    /// Whether a surface point lands on the target
    pub fn hits_target(&self, point: Vec2) -> bool {
        self.target.contains(point, SURFACE_SIZE)
    }
}

impl MiniGame for ReflexGame {
    fn id(&self) -> GameId {
        GameId::Reflex
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn score(&self) -> &ScoreState {
        &self.score
    }

    fn score_mut(&mut self) -> &mut ScoreState {
        &mut self.score
    }

    fn start(&mut self) {
        if !self.phase.transition(GamePhase::Playing) {
            return;
        }
        self.target = Target::centered();
        self.time_left = ROUND_SECONDS;
        self.subsecond_ticks = 0;
        self.score.reset_current();
    }

    fn step(&mut self, controls: &ControlState) -> Option<GamePhase> {
        if !self.phase.is_playing() {
            return None;
        }

        if let Some(point) = controls.pointer() {
            if self.hits_target(point) {
                self.tap();
            }
        }

        self.subsecond_ticks += 1;
        if self.subsecond_ticks >= TICKS_PER_SECOND {
            self.subsecond_ticks = 0;
            self.time_left = self.time_left.saturating_sub(1);
            if self.time_left == 0 {
                self.phase.transition(GamePhase::GameOver);
                log::info!("Reflex round over: {} hits", self.score.current());
                return Some(GamePhase::GameOver);
            }
        }
        None
    }
}
