//! Endless runner
//!
//! Vertical physics on the player, obstacles scrolling in from the right.
//! Every obstacle that leaves the left edge scores a point and nudges the
//! scroll speed up.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Entity, GamePhase, ScoreState, seeded_rng};
use super::MiniGame;
use crate::catalog::GameId;
use crate::input::{Actions, ControlState};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 300.0;
pub const GROUND_HEIGHT: f32 = 40.0;
/// Top of the ground strip
pub const GROUND_Y: f32 = HEIGHT - GROUND_HEIGHT;

pub const PLAYER_X: f32 = 50.0;
pub const PLAYER_SIZE: f32 = 40.0;
pub const JUMP_VELOCITY: f32 = -12.0;
pub const GRAVITY: f32 = 0.6;

pub const OBSTACLE_WIDTH: f32 = 20.0;
pub const OBSTACLE_HEIGHT: f32 = 40.0;

pub const START_SPEED: f32 = 5.0;
/// Speed added per obstacle cleared
pub const SPEED_STEP: f32 = 0.05;
/// Frames until the first obstacle
pub const FIRST_SPAWN_FRAMES: u32 = 100;
/// Shortest spawn gap in frames
pub const MIN_SPAWN_FRAMES: u32 = 40;

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub body: Entity,
}

#[derive(Debug, Clone)]
pub struct RunnerGame {
    phase: GamePhase,
    score: ScoreState,
    player: Entity,
    airborne: bool,
    obstacles: Vec<Obstacle>,
    speed: f32,
    /// Frames since the last spawn
    frames: u32,
    next_obstacle: u32,
    rng: Pcg32,
}

impl RunnerGame {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Start,
            score: ScoreState::default(),
            player: Self::grounded_player(),
            airborne: false,
            obstacles: Vec::new(),
            speed: START_SPEED,
            frames: 0,
            next_obstacle: FIRST_SPAWN_FRAMES,
            rng: seeded_rng(seed),
        }
    }

    fn grounded_player() -> Entity {
        Entity::new(PLAYER_X, GROUND_Y - PLAYER_SIZE, PLAYER_SIZE, PLAYER_SIZE)
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    /// Spawn gap after an obstacle appears, shrinking with speed
    pub fn spawn_gap(speed: f32) -> u32 {
        let shrink = (speed * 2.0).floor() as u32;
        FIRST_SPAWN_FRAMES.saturating_sub(shrink).max(MIN_SPAWN_FRAMES)
    }

    fn jump(&mut self) {
        if !self.airborne {
            self.player.vel.y = JUMP_VELOCITY;
            self.airborne = true;
        }
    }

    fn update_player(&mut self) {
        self.player.vel.y += GRAVITY;
        self.player.integrate();

        let floor = GROUND_Y - self.player.size.y;
        if self.player.pos.y > floor {
            self.player.pos.y = floor;
            self.player.vel.y = 0.0;
            self.airborne = false;
        }
    }

    fn spawn_obstacles(&mut self) {
        self.frames += 1;
        if self.frames < self.next_obstacle {
            return;
        }
        let lift: f32 = self.rng.random_range(20.0..60.0);
        let body = Entity::new(WIDTH, GROUND_Y - lift, OBSTACLE_WIDTH, OBSTACLE_HEIGHT)
            .with_velocity(-self.speed, 0.0);
        self.obstacles.push(Obstacle { body });
        self.frames = 0;
        self.next_obstacle = Self::spawn_gap(self.speed);
        log::trace!("Runner obstacle spawned, next in {} frames", self.next_obstacle);
    }
}

impl MiniGame for RunnerGame {
    fn id(&self) -> GameId {
        GameId::Runner
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
        self.player = Self::grounded_player();
        self.airborne = false;
        self.obstacles.clear();
        self.speed = START_SPEED;
        self.frames = 0;
        self.next_obstacle = FIRST_SPAWN_FRAMES;
        self.score.reset_current();
    }

    fn step(&mut self, controls: &ControlState) -> Option<GamePhase> {
        if !self.phase.is_playing() {
            return None;
        }

        if controls.was_pressed(Actions::PRIMARY | Actions::UP) {
            self.jump();
        }
        self.update_player();
        self.spawn_obstacles();

        let speed = self.speed;
        for obstacle in &mut self.obstacles {
            obstacle.body.vel.x = -speed;
            obstacle.body.integrate();
        }

        let player = self.player.aabb();
        if self.obstacles.iter().any(|o| o.body.aabb().overlaps(&player)) {
            self.phase.transition(GamePhase::GameOver);
            log::info!("Runner over: score {}, speed {:.2}", self.score.current(), self.speed);
            return Some(GamePhase::GameOver);
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.body.right() >= 0.0);
        let cleared = (before - self.obstacles.len()) as u32;
        if cleared > 0 {
            self.score.add(cleared);
            self.speed += SPEED_STEP * cleared as f32;
        }
        None
    }
}
