//! Vertical shooter
//!
//! The ship slides along the bottom and fires automatically. Enemies drop
//! from the top at random speeds. Hits are resolved against a snapshot of
//! positions for the tick, then dead entities are swept in one pass.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Entity, GamePhase, ScoreState, seeded_rng};
use super::MiniGame;
use crate::catalog::GameId;
use crate::input::{Actions, ControlState};

pub const WIDTH: f32 = 400.0;
pub const HEIGHT: f32 = 400.0;

pub const PLAYER_SIZE: f32 = 40.0;
pub const PLAYER_START_X: f32 = 180.0;
pub const PLAYER_Y: f32 = 340.0;
pub const PLAYER_SPEED: f32 = 5.0;

/// Ticks between shots
pub const FIRE_INTERVAL: u64 = 15;
pub const PROJECTILE_WIDTH: f32 = 4.0;
pub const PROJECTILE_HEIGHT: f32 = 10.0;
pub const PROJECTILE_SPEED: f32 = 7.0;

/// Ticks between enemy spawns
pub const ENEMY_INTERVAL: u64 = 60;
pub const ENEMY_SIZE: f32 = 30.0;
pub const ENEMY_MIN_SPEED: f32 = 2.0;
pub const ENEMY_MAX_SPEED: f32 = 4.0;

/// Points per destroyed enemy
pub const KILL_POINTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub body: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub body: Entity,
}

#[derive(Debug, Clone)]
pub struct ShooterGame {
    phase: GamePhase,
    score: ScoreState,
    player: Entity,
    projectiles: Vec<Projectile>,
    enemies: Vec<Enemy>,
    frames: u64,
    rng: Pcg32,
}

impl ShooterGame {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Start,
            score: ScoreState::default(),
            player: Self::start_player(),
            projectiles: Vec::new(),
            enemies: Vec::new(),
            frames: 0,
            rng: seeded_rng(seed),
        }
    }

    fn start_player() -> Entity {
        Entity::new(PLAYER_START_X, PLAYER_Y, PLAYER_SIZE, PLAYER_SIZE)
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Ticks since the round started
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn move_player(&mut self, controls: &ControlState) {
        let mut left = controls.is_held(Actions::LEFT);
        let mut right = controls.is_held(Actions::RIGHT);
        // A held touch steers toward its x, with a one-step dead zone
        if let Some(target) = controls.held_pointer() {
            let center = self.player.pos.x + self.player.size.x / 2.0;
            left |= target.x < center - PLAYER_SPEED;
            right |= target.x > center + PLAYER_SPEED;
        }

        let mut dx = 0.0;
        if left {
            dx -= PLAYER_SPEED;
        }
        if right {
            dx += PLAYER_SPEED;
        }
        self.player.pos.x = (self.player.pos.x + dx).clamp(0.0, WIDTH - self.player.size.x);
    }

    fn spawn(&mut self) {
        if self.frames % FIRE_INTERVAL == 0 {
            let x = self.player.pos.x + self.player.size.x / 2.0 - PROJECTILE_WIDTH / 2.0;
            let body = Entity::new(x, self.player.pos.y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
                .with_velocity(0.0, -PROJECTILE_SPEED);
            self.projectiles.push(Projectile { body });
        }

        if self.frames % ENEMY_INTERVAL == 0 {
            let x = self.rng.random_range(0.0..WIDTH - ENEMY_SIZE);
            let speed = self.rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED);
            let body = Entity::new(x, -ENEMY_SIZE, ENEMY_SIZE, ENEMY_SIZE).with_velocity(0.0, speed);
            self.enemies.push(Enemy { body });
            log::trace!("Enemy spawned at x={:.0}, speed {:.2}", x, speed);
        }
    }

    /// Pair each enemy with at most one projectile. Returns (enemy, projectile)
    /// index pairs; no index appears twice.
    fn find_hits(&self) -> Vec<(usize, usize)> {
        let mut used = vec![false; self.projectiles.len()];
        let mut hits = Vec::new();
        for (ei, enemy) in self.enemies.iter().enumerate() {
            let enemy_box = enemy.body.aabb();
            let hit = self
                .projectiles
                .iter()
                .enumerate()
                .find(|(pi, p)| !used[*pi] && p.body.aabb().overlaps(&enemy_box));
            if let Some((pi, _)) = hit {
                used[pi] = true;
                hits.push((ei, pi));
            }
        }
        hits
    }
}

/// Remove the flagged entries, keeping order
fn sweep<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !dead[index];
        index += 1;
        keep
    });
}

impl MiniGame for ShooterGame {
    fn id(&self) -> GameId {
        GameId::Shooter
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
        self.player = Self::start_player();
        self.projectiles.clear();
        self.enemies.clear();
        self.frames = 0;
        self.score.reset_current();
    }

    fn step(&mut self, controls: &ControlState) -> Option<GamePhase> {
        if !self.phase.is_playing() {
            return None;
        }

        self.move_player(controls);
        self.frames += 1;
        self.spawn();

        for projectile in &mut self.projectiles {
            projectile.body.integrate();
        }
        for enemy in &mut self.enemies {
            enemy.body.integrate();
        }

        let player = self.player.aabb();
        if self.enemies.iter().any(|e| e.body.aabb().overlaps(&player)) {
            self.phase.transition(GamePhase::GameOver);
            log::info!("Shooter over: score {}", self.score.current());
            return Some(GamePhase::GameOver);
        }

        let mut dead_enemies: Vec<bool> = self.enemies.iter().map(|e| e.body.pos.y > HEIGHT).collect();
        let mut dead_projectiles: Vec<bool> = self.projectiles.iter().map(|p| p.body.pos.y < 0.0).collect();
        for (ei, pi) in self.find_hits() {
            if !dead_enemies[ei] && !dead_projectiles[pi] {
                dead_enemies[ei] = true;
                dead_projectiles[pi] = true;
                self.score.add(KILL_POINTS);
            }
        }
        sweep(&mut self.enemies, &dead_enemies);
        sweep(&mut self.projectiles, &dead_projectiles);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> ShooterGame {
        let mut game = ShooterGame::new(21);
        game.start();
        game
    }

    fn holding(action: Actions) -> ControlState {
        let mut controls = ControlState::new();
        controls.press(action);
        controls
    }

    #[test]
    fn test_player_clamped_to_bounds() {
        let mut game = playing();
        let left = holding(Actions::LEFT);
        for _ in 0..40 {
            game.step(&left);
        }
        assert_eq!(game.player().pos.x, 0.0);

        let right = holding(Actions::RIGHT);
        for _ in 0..80 {
            game.step(&right);
        }
        assert_eq!(game.player().pos.x, WIDTH - PLAYER_SIZE);
    }

    #[test]
    fn test_touch_hold_moves_ship() {
        use crate::input::InputEvent;
        use glam::Vec2;

        let mut game = playing();
        let mut controls = ControlState::new();
        controls.apply(&InputEvent::PointerDown(Vec2::new(5.0, 380.0)));
        for _ in 0..20 {
            game.step(&controls);
            controls.end_tick();
        }
        assert_eq!(game.player().pos.x, PLAYER_START_X - 20.0 * PLAYER_SPEED);

        // Dragging right of the ship reverses it; reaching the finger stops it
        controls.apply(&InputEvent::PointerMove(Vec2::new(300.0, 380.0)));
        for _ in 0..100 {
            game.step(&controls);
            controls.end_tick();
        }
        let center = game.player().pos.x + PLAYER_SIZE / 2.0;
        assert!((center - 300.0).abs() <= PLAYER_SPEED);

        controls.apply(&InputEvent::PointerUp(Vec2::new(300.0, 380.0)));
        let x = game.player().pos.x;
        game.step(&controls);
        assert_eq!(game.player().pos.x, x);
    }

    #[test]
    fn test_auto_fire_interval() {
        let mut game = playing();
        let idle = ControlState::new();
        for _ in 0..FIRE_INTERVAL - 1 {
            game.step(&idle);
        }
        assert!(game.projectiles().is_empty());
        game.step(&idle);
        assert_eq!(game.projectiles().len(), 1);
        let shot = game.projectiles()[0].body;
        assert_eq!(shot.pos.x, PLAYER_START_X + PLAYER_SIZE / 2.0 - PROJECTILE_WIDTH / 2.0);
        assert_eq!(shot.pos.y, PLAYER_Y - PROJECTILE_SPEED);
    }

    #[test]
    fn test_enemy_spawn() {
        let mut game = playing();
        let idle = ControlState::new();
        for _ in 0..ENEMY_INTERVAL {
            game.step(&idle);
        }
        assert_eq!(game.enemies().len(), 1);
        let enemy = game.enemies()[0].body;
        assert!(enemy.pos.x >= 0.0 && enemy.pos.x <= WIDTH - ENEMY_SIZE);
        assert!(enemy.vel.y >= ENEMY_MIN_SPEED && enemy.vel.y < ENEMY_MAX_SPEED);
    }

    #[test]
    fn test_projectile_destroys_enemy() {
        let mut game = playing();
        game.enemies.push(Enemy {
            body: Entity::new(100.0, 100.0, ENEMY_SIZE, ENEMY_SIZE),
        });
        game.projectiles.push(Projectile {
            body: Entity::new(110.0, 112.0, PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
        });
        game.projectiles.push(Projectile {
            body: Entity::new(112.0, 114.0, PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
        });
        game.step(&ControlState::new());
        assert!(game.enemies().is_empty());
        // One enemy consumes exactly one projectile
        assert_eq!(game.projectiles().len(), 1);
        assert_eq!(game.score().current(), KILL_POINTS);
    }

    #[test]
    fn test_one_projectile_kills_one_enemy() {
        let mut game = playing();
        game.enemies.push(Enemy {
            body: Entity::new(100.0, 100.0, ENEMY_SIZE, ENEMY_SIZE),
        });
        game.enemies.push(Enemy {
            body: Entity::new(105.0, 105.0, ENEMY_SIZE, ENEMY_SIZE),
        });
        game.projectiles.push(Projectile {
            body: Entity::new(110.0, 115.0, PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
        });
        game.step(&ControlState::new());
        assert_eq!(game.enemies().len(), 1);
        assert!(game.projectiles().is_empty());
        assert_eq!(game.score().current(), KILL_POINTS);
    }

    #[test]
    fn test_enemy_hits_player() {
        let mut game = playing();
        game.enemies.push(Enemy {
            body: Entity::new(PLAYER_START_X, PLAYER_Y - 10.0, ENEMY_SIZE, ENEMY_SIZE),
        });
        assert_eq!(game.step(&ControlState::new()), Some(GamePhase::GameOver));
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = playing();
        let left = holding(Actions::LEFT);
        for _ in 0..FIRE_INTERVAL {
            game.step(&left);
        }
        game.score.add(KILL_POINTS);
        game.enemies.push(Enemy {
            body: Entity::new(game.player().pos.x, PLAYER_Y - 10.0, ENEMY_SIZE, ENEMY_SIZE),
        });
        assert_eq!(game.step(&ControlState::new()), Some(GamePhase::GameOver));
        assert!(!game.projectiles().is_empty());

        game.start();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.score().current(), 0);
        assert!(game.enemies().is_empty());
        assert!(game.projectiles().is_empty());
        assert_eq!(game.frames(), 0);
        assert_eq!(game.player().pos.x, PLAYER_START_X);
    }

    #[test]
    fn test_offscreen_entities_removed() {
        let mut game = playing();
        game.enemies.push(Enemy {
            body: Entity::new(0.0, HEIGHT - 1.0, ENEMY_SIZE, ENEMY_SIZE).with_velocity(0.0, 3.0),
        });
        game.projectiles.push(Projectile {
            body: Entity::new(300.0, 2.0, PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
                .with_velocity(0.0, -PROJECTILE_SPEED),
        });
        game.step(&ControlState::new());
        assert!(game.enemies().is_empty());
        assert!(game.projectiles().is_empty());
        assert_eq!(game.score().current(), 0);
    }

    #[test]
    fn test_long_run_respects_removal_edges() {
        let mut game = playing();
        let left = holding(Actions::LEFT);
        for _ in 0..3000 {
            if game.step(&left).is_some() {
                break;
            }
            assert!(game.enemies().iter().all(|e| e.body.pos.y <= HEIGHT));
            assert!(game.projectiles().iter().all(|p| p.body.pos.y >= 0.0));
        }
    }
}
