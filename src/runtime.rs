//! Fixed-step game driver
//!
//! Owns one mounted game plus everything around it: control state, the
//! frame-time accumulator, the pause flag and the best-score reconciliation
//! with the store. Platform code only feeds it events and frame times.

use crate::catalog::GameId;
use crate::consts::{MAX_FRAME_GAP_MS, MAX_SUBSTEPS};
use crate::highscores;
use crate::input::{Actions, ControlState, InputEvent};
use crate::persistence::KeyValueStore;
use crate::renderer::{ArcadeGame, Surface};
use crate::sim::{GamePhase, RedrawPolicy, ScoreState};

pub struct GameRuntime {
    game: Box<dyn ArcadeGame>,
    controls: ControlState,
    accumulator_ms: f64,
    paused: bool,
    /// State changed since the last render
    dirty: bool,
}

impl GameRuntime {
    pub fn new(game: Box<dyn ArcadeGame>) -> Self {
        Self {
            game,
            controls: ControlState::new(),
            accumulator_ms: 0.0,
            paused: false,
            dirty: true,
        }
    }

    /// Create a game from the catalog and seed its best score from the store
    pub fn load(id: GameId, seed: u64, store: &dyn KeyValueStore) -> Self {
        let mut game = id.create(seed);
        let best = highscores::load_best(store, id);
        game.score_mut().seed_best(best);
        log::info!("Loaded {} (best {})", id, best);
        Self::new(game)
    }

    pub fn id(&self) -> GameId {
        self.game.id()
    }

    pub fn phase(&self) -> GamePhase {
        self.game.phase()
    }

    pub fn score(&self) -> &ScoreState {
        self.game.score()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn game(&self) -> &dyn ArcadeGame {
        self.game.as_ref()
    }

    /// Start or restart the round
    pub fn start(&mut self) {
        self.controls.clear();
        self.accumulator_ms = 0.0;
        self.paused = false;
        self.game.start();
        self.dirty = true;
        log::info!("{} started", self.game.id());
    }

    /// Feed one raw device event. Pause toggles immediately; everything else
    /// is recorded for the next tick.
    pub fn handle_input(&mut self, event: &InputEvent) {
        let pause = match event {
            InputEvent::KeyDown(code) => Actions::from_key(code) == Some(Actions::PAUSE),
            InputEvent::ActionDown(action) => *action == Actions::PAUSE,
            _ => false,
        };
        if pause && !self.controls.is_held(Actions::PAUSE) {
            self.toggle_pause();
        }
        self.controls.apply(event);
    }

    /// Force a repaint on the next `render` (display settings changed)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn toggle_pause(&mut self) {
        if !self.game.phase().is_playing() {
            return;
        }
        self.paused = !self.paused;
        self.accumulator_ms = 0.0;
        self.dirty = true;
        log::debug!("{} paused: {}", self.game.id(), self.paused);
    }

    /// Advance by `dt_ms` of wall time. Runs as many fixed ticks as fit (at
    /// most `MAX_SUBSTEPS`) and returns the phase entered, if any.
    pub fn update(&mut self, dt_ms: f64, store: &mut dyn KeyValueStore) -> Option<GamePhase> {
        if self.paused || !self.game.phase().is_playing() {
            return None;
        }

        self.accumulator_ms += dt_ms.clamp(0.0, MAX_FRAME_GAP_MS);
        let interval = self.game.tick_interval_ms();

        let mut substeps = 0;
        let mut entered = None;
        while self.accumulator_ms >= interval && substeps < MAX_SUBSTEPS {
            let transition = self.game.step(&self.controls);
            self.controls.end_tick();
            self.accumulator_ms -= interval;
            substeps += 1;
            self.dirty = true;

            if let Some(phase) = transition {
                log::info!("{} -> {:?} (score {})", self.game.id(), phase, self.game.score().current());
                entered = Some(phase);
                if phase == GamePhase::GameOver {
                    self.finish(store);
                    break;
                }
            }
        }

        // Drop backlog we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator_ms = self.accumulator_ms.min(interval);
        }
        entered
    }

    fn finish(&mut self, store: &mut dyn KeyValueStore) {
        self.accumulator_ms = 0.0;
        self.controls.clear();
        if let Some(best) = self.game.score_mut().promote() {
            if let Err(e) = highscores::save_best(store, self.game.id(), best) {
                log::warn!("Could not save best score: {}", e);
            }
        }
    }

    /// Draw if the redraw policy asks for it. Returns whether anything was drawn.
    pub fn render(&mut self, surface: &mut dyn Surface) -> bool {
        let every_frame = self.game.redraw_policy() == RedrawPolicy::EveryFrame
            && self.game.phase().is_playing()
            && !self.paused;
        if !every_frame && !self.dirty {
            return false;
        }
        self.game.draw(surface);
        self.dirty = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::persistence::MemoryStore;
    use crate::renderer::CommandBuffer;

    fn key(code: &str) -> InputEvent {
        InputEvent::KeyDown(code.to_string())
    }

    /// Run whole frames until the game ends or `limit` frames pass
    fn run_to_game_over(runtime: &mut GameRuntime, store: &mut MemoryStore, limit: usize) {
        for _ in 0..limit {
            if runtime.update(FRAME_MS, store) == Some(GamePhase::GameOver) {
                return;
            }
        }
        panic!("game did not end in {} frames", limit);
    }

    #[test]
    fn test_load_seeds_best() {
        let mut store = MemoryStore::new();
        store.set_item("runner_highscore", "42").unwrap();
        let runtime = GameRuntime::load(GameId::Runner, 1, &store);
        assert_eq!(runtime.score().best(), 42);
        assert_eq!(runtime.score().current(), 0);
        assert_eq!(runtime.phase(), GamePhase::Start);
    }

    #[test]
    fn test_malformed_store_reads_zero() {
        let mut store = MemoryStore::new();
        store.set_item("snake_highscore", "lots").unwrap();
        let runtime = GameRuntime::load(GameId::Snake, 1, &store);
        assert_eq!(runtime.score().best(), 0);
    }

    #[test]
    fn test_no_ticks_before_start() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Shooter, 1, &store);
        for _ in 0..100 {
            assert_eq!(runtime.update(FRAME_MS, &mut store), None);
        }
        assert_eq!(runtime.phase(), GamePhase::Start);
    }

    #[test]
    fn test_best_saved_on_game_over() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Reflex, 9, &store);
        runtime.start();

        // Tap the target a few times
        for _ in 0..3 {
            let target = runtime_reflex_target(&runtime);
            runtime.handle_input(&InputEvent::PointerDown(target));
            runtime.update(FRAME_MS, &mut store);
        }
        assert_eq!(runtime.score().current(), 3);

        run_to_game_over(&mut runtime, &mut store, 31 * 60);
        assert_eq!(runtime.score().best(), 3);
        assert_eq!(store.get_item("reflex_highscore").as_deref(), Some("3"));
    }

    fn runtime_reflex_target(runtime: &GameRuntime) -> glam::Vec2 {
        // Draw the scene and read back the target circle
        let mut buffer = CommandBuffer::new(400.0, 400.0);
        runtime.game().draw(&mut buffer);
        buffer
            .commands()
            .iter()
            .find_map(|c| match c {
                crate::renderer::DrawCommand::Circle { x, y, .. } => Some(glam::Vec2::new(*x, *y)),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_lower_score_keeps_stored_best() {
        let mut store = MemoryStore::new();
        store.set_item("snake_highscore", "500").unwrap();
        let mut runtime = GameRuntime::load(GameId::Snake, 1, &store);
        runtime.start();
        // Straight up into the wall without eating
        run_to_game_over(&mut runtime, &mut store, 600);
        assert_eq!(runtime.score().best(), 500);
        assert_eq!(store.get_item("snake_highscore").as_deref(), Some("500"));
    }

    #[test]
    fn test_snake_ticks_on_its_own_interval() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Snake, 1, &store);
        runtime.start();
        let mut buffer = CommandBuffer::new(400.0, 400.0);
        assert!(runtime.render(&mut buffer));

        // 100ms is less than one 150ms tick: nothing to redraw
        runtime.update(100.0, &mut store);
        assert!(!runtime.render(&mut buffer));

        runtime.update(60.0, &mut store);
        assert!(runtime.render(&mut buffer));
        assert!(!runtime.render(&mut buffer));
    }

    #[test]
    fn test_physics_game_redraws_every_frame() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Runner, 1, &store);
        runtime.start();
        let mut buffer = CommandBuffer::new(600.0, 300.0);
        runtime.update(FRAME_MS, &mut store);
        assert!(runtime.render(&mut buffer));
        assert!(runtime.render(&mut buffer));
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Runner, 1, &store);
        runtime.start();
        runtime.handle_input(&key("KeyP"));
        assert!(runtime.is_paused());

        let mut buffer = CommandBuffer::new(600.0, 300.0);
        assert!(runtime.render(&mut buffer));
        for _ in 0..1000 {
            runtime.update(FRAME_MS, &mut store);
        }
        assert_eq!(runtime.phase(), GamePhase::Playing);
        assert!(!runtime.render(&mut buffer));

        // Key repeat while held does not toggle again
        runtime.handle_input(&key("KeyP"));
        assert!(runtime.is_paused());
        runtime.handle_input(&InputEvent::KeyUp("KeyP".into()));
        runtime.handle_input(&key("KeyP"));
        assert!(!runtime.is_paused());
    }

    #[test]
    fn test_pause_button_toggles() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Snake, 1, &store);
        runtime.start();
        runtime.handle_input(&InputEvent::ActionDown(Actions::PAUSE));
        assert!(runtime.is_paused());
        runtime.update(1000.0, &mut store);
        assert_eq!(runtime.score().current(), 0);
        runtime.handle_input(&InputEvent::ActionUp(Actions::PAUSE));
        runtime.handle_input(&InputEvent::ActionDown(Actions::PAUSE));
        assert!(!runtime.is_paused());
    }

    #[test]
    fn test_touch_hold_steers_shooter() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Shooter, 1, &store);
        runtime.start();
        runtime.handle_input(&InputEvent::PointerDown(glam::Vec2::new(5.0, 380.0)));
        for _ in 0..20 {
            runtime.update(FRAME_MS, &mut store);
        }
        let mut buffer = CommandBuffer::new(400.0, 400.0);
        runtime.render(&mut buffer);
        // Ship polygon starts at its nose; it has left the start column
        let nose_x = buffer
            .commands()
            .iter()
            .find_map(|c| match c {
                crate::renderer::DrawCommand::Polygon(points) => points.first().map(|p| p.x),
                _ => None,
            })
            .unwrap();
        assert!(nose_x < 200.0 - 50.0);
    }

    #[test]
    fn test_mark_dirty_forces_redraw() {
        let store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Memory, 1, &store);
        let mut buffer = CommandBuffer::new(400.0, 400.0);
        assert!(runtime.render(&mut buffer));
        assert!(!runtime.render(&mut buffer));
        runtime.mark_dirty();
        assert!(runtime.render(&mut buffer));
    }

    #[test]
    fn test_pause_ignored_outside_play() {
        let store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Memory, 1, &store);
        runtime.handle_input(&key("Escape"));
        assert!(!runtime.is_paused());
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Snake, 1, &store);
        runtime.start();
        runtime.handle_input(&key("KeyZ"));
        runtime.handle_input(&key("F5"));
        runtime.update(150.0, &mut store);
        assert_eq!(runtime.phase(), GamePhase::Playing);
        assert!(!runtime.is_paused());
    }

    #[test]
    fn test_long_frame_gap_is_clamped() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Reflex, 1, &store);
        runtime.start();
        // A ten second stall must not eat ten seconds of the countdown
        runtime.update(10_000.0, &mut store);
        runtime.update(0.0, &mut store);
        let mut buffer = CommandBuffer::new(400.0, 400.0);
        runtime.render(&mut buffer);
        assert_eq!(runtime.phase(), GamePhase::Playing);
        // Timer bar still full
        assert!(buffer.commands().iter().any(|c| matches!(
            c,
            crate::renderer::DrawCommand::Rect { y, w, h, .. } if *y == 0.0 && *h == 4.0 && *w == 400.0
        )));
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut store = MemoryStore::new();
        let mut runtime = GameRuntime::load(GameId::Snake, 1, &store);
        runtime.start();
        run_to_game_over(&mut runtime, &mut store, 600);
        assert_eq!(runtime.phase(), GamePhase::GameOver);
        runtime.start();
        assert_eq!(runtime.phase(), GamePhase::Playing);
        assert_eq!(runtime.score().current(), 0);
    }
}
