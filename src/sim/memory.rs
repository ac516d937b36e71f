//! Memory match
//!
//! A shuffled double deck. Two face-up cards stay visible for a fixed delay,
//! then either join the solved set or flip back.

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use glam::Vec2;

use super::state::{GamePhase, ScoreState, seeded_rng};
use super::MiniGame;
use crate::catalog::GameId;
use crate::consts::FRAME_MS;
use crate::input::ControlState;

/// Visible time for a resolved pair (ms)
pub const REVEAL_DELAY_MS: f64 = 800.0;
/// The same delay in ticks
pub const REVEAL_DELAY_TICKS: u32 = (REVEAL_DELAY_MS / FRAME_MS) as u32;
/// Points per matched pair
pub const PAIR_POINTS: u32 = 10;

pub const COLUMNS: usize = 4;
pub const SURFACE_SIZE: f32 = 400.0;
pub const CARD_GAP: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Gamepad,
    Rocket,
    Fire,
    Gem,
    Bolt,
    Rainbow,
    Puzzle,
    Saucer,
}

impl Symbol {
    pub const ALL: [Symbol; 8] = [
        Symbol::Gamepad,
        Symbol::Rocket,
        Symbol::Fire,
        Symbol::Gem,
        Symbol::Bolt,
        Symbol::Rainbow,
        Symbol::Puzzle,
        Symbol::Saucer,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub id: usize,
    pub symbol: Symbol,
}

/// Why a selection was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotPlaying,
    OutOfRange,
    PairPending,
    AlreadyFaceUp,
    AlreadySolved,
}

#[derive(Debug, Clone)]
pub struct MemoryGame {
    phase: GamePhase,
    score: ScoreState,
    deck: Vec<Card>,
    /// Indices currently face-up and unresolved (at most two)
    flipped: Vec<usize>,
    solved: Vec<usize>,
    moves: u32,
    /// Ticks left before the face-up pair resolves
    reveal_ticks: u32,
    rng: Pcg32,
}

impl MemoryGame {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            phase: GamePhase::Start,
            score: ScoreState::default(),
            deck: Vec::new(),
            flipped: Vec::with_capacity(2),
            solved: Vec::new(),
            moves: 0,
            reveal_ticks: 0,
            rng: seeded_rng(seed),
        };
        game.deal();
        game
    }

    fn deal(&mut self) {
        let mut symbols: Vec<Symbol> = Symbol::ALL.iter().chain(Symbol::ALL.iter()).copied().collect();
        symbols.shuffle(&mut self.rng);
        self.deck = symbols
            .into_iter()
            .enumerate()
            .map(|(id, symbol)| Card { id, symbol })
            .collect();
        self.flipped.clear();
        self.solved.clear();
        self.moves = 0;
        self.reveal_ticks = 0;
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn flipped(&self) -> &[usize] {
        &self.flipped
    }

    pub fn solved(&self) -> &[usize] {
        &self.solved
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_face_up(&self, index: usize) -> bool {
        self.flipped.contains(&index) || self.solved.contains(&index)
    }

    /// Flip a card face-up
    pub fn select(&mut self, index: usize) -> Result<(), Rejection> {
        if !self.phase.is_playing() {
            return Err(Rejection::NotPlaying);
        }
        if index >= self.deck.len() {
            return Err(Rejection::OutOfRange);
        }
        if self.flipped.len() >= 2 {
            return Err(Rejection::PairPending);
        }
        if self.solved.contains(&index) {
            return Err(Rejection::AlreadySolved);
        }
        if self.flipped.contains(&index) {
            return Err(Rejection::AlreadyFaceUp);
        }

        self.flipped.push(index);
        if self.flipped.len() == 2 {
            self.moves += 1;
            self.reveal_ticks = REVEAL_DELAY_TICKS;
        }
        Ok(())
    }

    /// Grid cell under a point on the 400x400 surface
    pub fn card_at(&self, point: Vec2) -> Option<usize> {
        (0..self.deck.len()).find(|&i| {
            let (min, size) = card_rect(i);
            point.x >= min.x && point.x < min.x + size.x && point.y >= min.y && point.y < min.y + size.y
        })
    }

    fn resolve_pair(&mut self) -> Option<GamePhase> {
        let (first, second) = (self.flipped[0], self.flipped[1]);
        self.flipped.clear();
        if self.deck[first].symbol != self.deck[second].symbol {
            return None;
        }

        self.solved.extend([first, second]);
        self.score.add(PAIR_POINTS);
        if self.solved.len() == self.deck.len() {
            self.phase.transition(GamePhase::GameOver);
            log::info!("Memory solved in {} moves", self.moves);
            return Some(GamePhase::GameOver);
        }
        None
    }
}

/// Top-left corner and size of card `index` in the 4x4 layout
pub fn card_rect(index: usize) -> (Vec2, Vec2) {
    let cols = COLUMNS as f32;
    let side = (SURFACE_SIZE - CARD_GAP * (cols + 1.0)) / cols;
    let col = (index % COLUMNS) as f32;
    let row = (index / COLUMNS) as f32;
    let min = Vec2::new(
        CARD_GAP + col * (side + CARD_GAP),
        CARD_GAP + row * (side + CARD_GAP),
    );
    (min, Vec2::splat(side))
}

impl MiniGame for MemoryGame {
    fn id(&self) -> GameId {
        GameId::Memory
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
        self.deal();
        self.score.reset_current();
    }

    fn step(&mut self, controls: &ControlState) -> Option<GamePhase> {
        if !self.phase.is_playing() {
            return None;
        }

        let mut resolved = None;
        if self.flipped.len() == 2 {
            self.reveal_ticks = self.reveal_ticks.saturating_sub(1);
            if self.reveal_ticks == 0 {
                resolved = self.resolve_pair();
            }
        }
        if resolved == Some(GamePhase::GameOver) {
            return resolved;
        }

        if let Some(index) = controls.pointer().and_then(|p| self.card_at(p)) {
            if let Err(reason) = self.select(index) {
                log::trace!("Card {} not selectable: {:?}", index, reason);
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn playing(seed: u64) -> MemoryGame {
        let mut game = MemoryGame::new(seed);
        game.start();
        game
    }

    fn run_delay(game: &mut MemoryGame) -> Option<GamePhase> {
        let idle = ControlState::new();
        let mut result = None;
        for _ in 0..REVEAL_DELAY_TICKS {
            if let Some(phase) = game.step(&idle) {
                result = Some(phase);
            }
        }
        result
    }

    /// First index whose symbol differs from card 0
    fn mismatch_for_zero(game: &MemoryGame) -> usize {
        let symbol = game.deck()[0].symbol;
        game.deck().iter().position(|c| c.symbol != symbol).unwrap()
    }

    fn partner(game: &MemoryGame, index: usize) -> usize {
        let symbol = game.deck()[index].symbol;
        game.deck()
            .iter()
            .enumerate()
            .position(|(i, c)| i != index && c.symbol == symbol)
            .unwrap()
    }

    #[test]
    fn test_mismatch_flips_back() {
        let mut game = playing(3);
        // Reorder so cards 0 and 1 differ
        let other = mismatch_for_zero(&game);
        game.deck.swap(1, other);

        game.select(0).unwrap();
        game.select(1).unwrap();
        assert_eq!(game.moves(), 1);
        assert!(game.is_face_up(0) && game.is_face_up(1));

        assert_eq!(run_delay(&mut game), None);
        assert!(game.flipped().is_empty());
        assert!(game.solved().is_empty());
        assert!(!game.is_face_up(0) && !game.is_face_up(1));
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn test_match_is_solved_after_delay() {
        let mut game = playing(5);
        let mate = partner(&game, 0);
        game.select(0).unwrap();
        game.select(mate).unwrap();
        assert!(game.solved().is_empty());
        run_delay(&mut game);
        assert_eq!(game.solved().len(), 2);
        assert_eq!(game.score().current(), PAIR_POINTS);
    }

    #[test]
    fn test_selection_rejections() {
        let mut game = MemoryGame::new(9);
        assert_eq!(game.select(0), Err(Rejection::NotPlaying));
        game.start();

        assert_eq!(game.select(99), Err(Rejection::OutOfRange));
        game.select(0).unwrap();
        assert_eq!(game.select(0), Err(Rejection::AlreadyFaceUp));
        let other = if partner(&game, 0) == 1 { 2 } else { 1 };
        game.select(other).unwrap();
        assert_eq!(game.select(3), Err(Rejection::PairPending));
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn test_solved_card_rejected() {
        let mut game = playing(11);
        let mate = partner(&game, 0);
        game.select(0).unwrap();
        game.select(mate).unwrap();
        run_delay(&mut game);
        assert_eq!(game.select(0), Err(Rejection::AlreadySolved));
    }

    #[test]
    fn test_win_when_all_solved() {
        let mut game = playing(13);
        let mut result = None;
        for i in 0..game.deck().len() {
            if game.solved().contains(&i) {
                continue;
            }
            let mate = partner(&game, i);
            game.select(i).unwrap();
            game.select(mate).unwrap();
            result = run_delay(&mut game);
        }
        assert_eq!(result, Some(GamePhase::GameOver));
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.solved().len(), 16);
        assert_eq!(game.moves(), 8);
        // Score is per pair, so every finished board is worth the same
        assert_eq!(game.score().current(), 8 * PAIR_POINTS);
    }

    #[test]
    fn test_click_on_resolving_tick_is_kept() {
        let mut game = playing(3);
        let other = mismatch_for_zero(&game);
        game.deck.swap(1, other);
        game.select(0).unwrap();
        game.select(1).unwrap();

        let idle = ControlState::new();
        for _ in 1..REVEAL_DELAY_TICKS {
            game.step(&idle);
        }
        assert_eq!(game.flipped(), &[0, 1]);

        let (min, size) = card_rect(5);
        let mut click = ControlState::new();
        click.apply(&crate::input::InputEvent::PointerDown(min + size / 2.0));
        assert_eq!(game.step(&click), None);
        assert_eq!(game.flipped(), &[5]);
    }

    #[test]
    fn test_restart_redeals() {
        let mut game = playing(21);
        for i in 0..game.deck().len() {
            if game.solved().contains(&i) {
                continue;
            }
            let mate = partner(&game, i);
            game.select(i).unwrap();
            game.select(mate).unwrap();
            run_delay(&mut game);
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
        let finished: Vec<Symbol> = game.deck().iter().map(|c| c.symbol).collect();

        game.start();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.score().current(), 0);
        assert_eq!(game.score().best(), 0);
        assert_eq!(game.deck().len(), 16);
        assert!(game.solved().is_empty());
        assert!(game.flipped().is_empty());
        assert_eq!(game.moves(), 0);
        assert!(game.deck().iter().enumerate().all(|(i, c)| c.id == i));
        // Same rng stream continues, so the layout is a fresh shuffle
        let redealt: Vec<Symbol> = game.deck().iter().map(|c| c.symbol).collect();
        assert_ne!(finished, redealt);
    }

    #[test]
    fn test_pointer_selects_card() {
        let mut game = playing(17);
        let (min, size) = card_rect(5);
        let mut controls = ControlState::new();
        controls.apply(&crate::input::InputEvent::PointerDown(min + size / 2.0));
        game.step(&controls);
        assert_eq!(game.flipped(), &[5]);

        // Gap between cards hits nothing
        assert_eq!(game.card_at(Vec2::new(CARD_GAP / 2.0, CARD_GAP / 2.0)), None);
    }

    proptest! {
        #[test]
        fn prop_deck_has_pairs(seed in any::<u64>()) {
            let game = MemoryGame::new(seed);
            prop_assert_eq!(game.deck().len(), 16);
            let mut counts: HashMap<Symbol, usize> = HashMap::new();
            for card in game.deck() {
                *counts.entry(card.symbol).or_default() += 1;
            }
            prop_assert_eq!(counts.len(), 8);
            prop_assert!(counts.values().all(|&n| n == 2));
        }

        #[test]
        fn prop_solved_only_grows(seed in any::<u64>(), picks in proptest::collection::vec(0usize..16, 1..80)) {
            let mut game = playing(seed);
            let idle = ControlState::new();
            let mut previous = 0;
            for pick in picks {
                let _ = game.select(pick);
                for _ in 0..REVEAL_DELAY_TICKS {
                    game.step(&idle);
                    prop_assert!(game.solved().len() >= previous);
                    previous = game.solved().len();
                }
            }
            prop_assert_eq!(game.phase() == GamePhase::GameOver, game.solved().len() == 16);
        }
    }
}
