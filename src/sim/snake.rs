//! Snake on a fixed grid
//!
//! The head advances one cell per tick. The tick interval shrinks as the
//! score grows, so the runtime asks for it after every step.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GamePhase, ScoreState, seeded_rng};
use super::{MiniGame, RedrawPolicy};
use crate::catalog::GameId;
use crate::input::{Actions, ControlState};

/// Cells per side
pub const GRID_SIZE: i32 = 20;
/// Tick interval at score 0 (ms)
pub const INITIAL_INTERVAL_MS: f64 = 150.0;
/// Fastest allowed tick interval (ms)
pub const MIN_INTERVAL_MS: f64 = 50.0;
/// Points per food
pub const FOOD_POINTS: u32 = 10;

const START_HEAD: Cell = Cell { x: 10, y: 10 };
const START_FOOD: Cell = Cell { x: 15, y: 15 };

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn offset(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    fn from_action(action: Actions) -> Option<Direction> {
        if action == Actions::UP {
            Some(Direction::Up)
        } else if action == Actions::DOWN {
            Some(Direction::Down)
        } else if action == Actions::LEFT {
            Some(Direction::Left)
        } else if action == Actions::RIGHT {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    phase: GamePhase,
    score: ScoreState,
    /// Body cells, head first
    body: Vec<Cell>,
    /// Direction used by the last executed tick
    direction: Direction,
    food: Cell,
    rng: Pcg32,
}

impl SnakeGame {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Start,
            score: ScoreState::default(),
            body: vec![START_HEAD],
            direction: Direction::Up,
            food: START_FOOD,
            rng: seeded_rng(seed),
        }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Tick interval for a given score: 5 ms faster per 50 points, floored
    pub fn interval_for_score(score: u32) -> f64 {
        let speedup = ((score / 50) * 5).min(100) as f64;
        (INITIAL_INTERVAL_MS - speedup).max(MIN_INTERVAL_MS)
    }

    /// Pick a uniformly random free cell, or None when the board is full
    fn place_food(&mut self) -> Option<Cell> {
        let free: Vec<Cell> = (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }

    /// Direction to use this tick: the requested turn unless it would
    /// reverse along the axis travelled last tick
    fn resolve_turn(&self, requested: Option<Direction>) -> Direction {
        match requested {
            Some(dir) if dir.is_vertical() != self.direction.is_vertical() => dir,
            _ => self.direction,
        }
    }

    fn game_over(&mut self) -> Option<GamePhase> {
        self.phase.transition(GamePhase::GameOver);
        log::info!("Snake over: length {}, score {}", self.body.len(), self.score.current());
        Some(GamePhase::GameOver)
    }
}

impl MiniGame for SnakeGame {
    fn id(&self) -> GameId {
        GameId::Snake
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
        self.body = vec![START_HEAD];
        self.direction = Direction::Up;
        self.food = START_FOOD;
        self.score.reset_current();
    }

    fn step(&mut self, controls: &ControlState) -> Option<GamePhase> {
        if !self.phase.is_playing() {
            return None;
        }

        let requested = controls.last_direction().and_then(Direction::from_action);
        self.direction = self.resolve_turn(requested);

        let head = self.head().offset(self.direction);
        if !head.in_bounds() {
            return self.game_over();
        }
        // Tail included: it has not moved yet
        if self.body.iter().skip(1).any(|part| *part == head) {
            return self.game_over();
        }

        self.body.insert(0, head);
        if head == self.food {
            self.score.add(FOOD_POINTS);
            match self.place_food() {
                Some(food) => self.food = food,
                None => return self.game_over(),
            }
        } else {
            self.body.pop();
        }
        None
    }

    fn tick_interval_ms(&self) -> f64 {
        Self::interval_for_score(self.score.current())
    }

    fn redraw_policy(&self) -> RedrawPolicy {
        RedrawPolicy::OnChange
    }
}
