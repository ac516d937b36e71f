//! Shared game state types
//!
//! Phase machine, score bookkeeping and the generic moving entity used by
//! the physics games.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start action
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Run ended (collision, timer expiry, or puzzle solved)
    GameOver,
}

impl GamePhase {
    /// Whether `self -> next` is one of the allowed transitions
    pub fn can_enter(self, next: GamePhase) -> bool {
        matches!(
            (self, next),
            (GamePhase::Start, GamePhase::Playing)
                | (GamePhase::Playing, GamePhase::GameOver)
                | (GamePhase::GameOver, GamePhase::Playing)
        )
    }

    /// Move to `next` if the transition is valid. Returns whether it happened.
    pub fn transition(&mut self, next: GamePhase) -> bool {
        if self.can_enter(next) {
            *self = next;
            true
        } else {
            log::debug!("Ignoring phase transition {:?} -> {:?}", self, next);
            false
        }
    }

    pub fn is_playing(self) -> bool {
        self == GamePhase::Playing
    }
}

/// Current and best score for one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreState {
    current: u32,
    best: u32,
}

impl ScoreState {
    pub fn new(best: u32) -> Self {
        Self { current: 0, best }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Reset the running score (start / restart)
    pub fn reset_current(&mut self) {
        self.current = 0;
    }

    pub fn add(&mut self, points: u32) {
        self.current = self.current.saturating_add(points);
    }

    /// Raise the known best without touching `current` (e.g. a value
    /// loaded after construction). Never lowers it.
    pub fn seed_best(&mut self, best: u32) {
        self.best = self.best.max(best);
    }

    /// Promote `current` to `best` when it beats it.
    ///
    /// Returns the new best when a promotion happened, which is the only case
    /// the caller should persist.
    pub fn promote(&mut self) -> Option<u32> {
        if self.current > self.best {
            self.best = self.current;
            Some(self.best)
        } else {
            None
        }
    }
}

/// A moving rectangle: player, obstacle, enemy or projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Entity {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            vel: Vec2::ZERO,
        }
    }

    pub fn with_velocity(mut self, dx: f32, dy: f32) -> Self {
        self.vel = Vec2::new(dx, dy);
        self
    }

    /// Advance by one tick of velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Seeded per-game RNG
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_phase_transitions() {
        let mut phase = GamePhase::default();
        assert_eq!(phase, GamePhase::Start);

        assert!(!phase.transition(GamePhase::GameOver));
        assert_eq!(phase, GamePhase::Start);

        assert!(phase.transition(GamePhase::Playing));
        assert!(!phase.transition(GamePhase::Start));
        assert!(phase.transition(GamePhase::GameOver));
        assert!(!phase.transition(GamePhase::GameOver));
        assert!(phase.transition(GamePhase::Playing));
    }

    #[test]
    fn test_promote_only_when_beaten() {
        let mut score = ScoreState::new(20);
        score.add(10);
        assert_eq!(score.promote(), None);
        assert_eq!(score.best(), 20);

        score.add(15);
        assert_eq!(score.promote(), Some(25));
        assert_eq!(score.best(), 25);

        // Second promotion of the same run is a no-op
        assert_eq!(score.promote(), None);
    }

    #[test]
    fn test_reset_keeps_best() {
        let mut score = ScoreState::new(5);
        score.add(50);
        score.promote();
        score.reset_current();
        assert_eq!(score.current(), 0);
        assert_eq!(score.best(), 50);
    }

    #[test]
    fn test_entity_integrate() {
        let mut e = Entity::new(10.0, 20.0, 4.0, 4.0).with_velocity(-2.0, 3.0);
        e.integrate();
        assert_eq!(e.pos, Vec2::new(8.0, 23.0));
        assert_eq!(e.right(), 12.0);
        assert_eq!(e.bottom(), 27.0);
    }

    proptest! {
        #[test]
        fn prop_best_never_decreases(runs in proptest::collection::vec(0u32..500, 1..30)) {
            let mut score = ScoreState::new(0);
            let mut previous_best = 0;
            for run in runs {
                score.reset_current();
                score.add(run);
                score.promote();
                prop_assert!(score.best() >= previous_best);
                prop_assert!(score.best() >= run);
                previous_best = score.best();
            }
        }
    }
}
