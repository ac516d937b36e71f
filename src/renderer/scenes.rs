//! Per-game scenes
//!
//! Each scene clears the surface, paints the static backdrop, then the
//! entities. Game state is only ever borrowed immutably here.

use glam::Vec2;

use super::{Color, Draw, Surface, palette};
use crate::sim::MiniGame;
use crate::sim::memory::{self, MemoryGame, Symbol};
use crate::sim::reflex::{self, ReflexGame};
use crate::sim::runner::{self, RunnerGame};
use crate::sim::shooter::ShooterGame;
use crate::sim::snake::{GRID_SIZE, SnakeGame};

const STAR_COUNT: usize = 24;

fn backdrop(surface: &mut dyn Surface) {
    let size = surface.size();
    surface.clear();
    surface.clear_glow();
    surface.set_fill_color(palette::BACKGROUND);
    surface.fill_rect(0.0, 0.0, size.x, size.y);
}

impl Draw for SnakeGame {
    fn draw(&self, surface: &mut dyn Surface) {
        backdrop(surface);
        let size = surface.size();
        let cell = size / GRID_SIZE as f32;

        surface.set_fill_color(palette::GRID);
        for i in 1..GRID_SIZE {
            let offset = i as f32;
            surface.fill_rect(offset * cell.x, 0.0, 0.5, size.y);
            surface.fill_rect(0.0, offset * cell.y, size.x, 0.5);
        }

        for (i, part) in self.body().iter().enumerate() {
            if i == 0 {
                surface.set_fill_color(palette::PLAYER);
                surface.set_glow(palette::PLAYER, 15.0);
            } else {
                surface.set_fill_color(palette::PLAYER_TRAIL);
                surface.clear_glow();
            }
            surface.fill_rect(
                part.x as f32 * cell.x + 1.0,
                part.y as f32 * cell.y + 1.0,
                cell.x - 2.0,
                cell.y - 2.0,
            );
        }

        let food = self.food();
        surface.set_fill_color(palette::HAZARD);
        surface.set_glow(palette::HAZARD, 10.0);
        surface.fill_circle(
            food.x as f32 * cell.x + cell.x / 2.0,
            food.y as f32 * cell.y + cell.y / 2.0,
            cell.x / 3.0,
        );
        surface.clear_glow();
    }
}

impl Draw for RunnerGame {
    fn draw(&self, surface: &mut dyn Surface) {
        backdrop(surface);
        let size = surface.size();

        surface.set_fill_color(palette::GROUND);
        surface.fill_rect(0.0, runner::GROUND_Y, size.x, runner::GROUND_HEIGHT);

        let p = self.player();
        surface.set_fill_color(palette::PLAYER);
        surface.set_glow(palette::PLAYER, 15.0);
        surface.fill_rect(p.pos.x, p.pos.y, p.size.x, p.size.y);

        surface.set_fill_color(palette::HAZARD);
        surface.set_glow(palette::HAZARD, 10.0);
        for obstacle in self.obstacles() {
            let b = &obstacle.body;
            surface.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y);
        }
        surface.clear_glow();
    }
}

/// Scrolling starfield positions, derived from the star index
fn star(index: usize, frames: u64, size: Vec2) -> Vec2 {
    // Cheap integer hash so stars are stable between frames
    let h = (index as u32).wrapping_mul(2_654_435_761);
    let x = (h % 1000) as f32 / 1000.0 * size.x;
    let base_y = ((h >> 10) % 1000) as f32 / 1000.0 * size.y;
    let speed = 0.2 + (index % 3) as f32 * 0.2;
    Vec2::new(x, (base_y + frames as f32 * speed) % size.y)
}

impl Draw for ShooterGame {
    fn draw(&self, surface: &mut dyn Surface) {
        backdrop(surface);
        let size = surface.size();

        surface.set_fill_color(palette::STAR);
        for i in 0..STAR_COUNT {
            let s = star(i, self.frames(), size);
            surface.fill_rect(s.x, s.y, 1.0, 1.0);
        }

        let p = self.player();
        surface.set_fill_color(palette::PLAYER);
        surface.set_glow(palette::PLAYER, 15.0);
        surface.fill_polygon(&[
            Vec2::new(p.pos.x + p.size.x / 2.0, p.pos.y),
            Vec2::new(p.pos.x, p.pos.y + p.size.y),
            Vec2::new(p.pos.x + p.size.x, p.pos.y + p.size.y),
        ]);

        surface.set_fill_color(palette::PLAYER_TRAIL);
        for shot in self.projectiles() {
            let b = &shot.body;
            surface.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y);
        }

        surface.set_fill_color(palette::HAZARD);
        surface.set_glow(palette::HAZARD, 15.0);
        for enemy in self.enemies() {
            let b = &enemy.body;
            surface.fill_rect(b.pos.x, b.pos.y, b.size.x, b.size.y);
        }
        surface.clear_glow();
    }
}

/// Face colour for each symbol
pub fn symbol_color(symbol: Symbol) -> Color {
    match symbol {
        Symbol::Gamepad => Color("#a855f7"),
        Symbol::Rocket => Color("#f97316"),
        Symbol::Fire => Color("#ef4444"),
        Symbol::Gem => Color("#22d3ee"),
        Symbol::Bolt => Color("#facc15"),
        Symbol::Rainbow => Color("#ec4899"),
        Symbol::Puzzle => Color("#22c55e"),
        Symbol::Saucer => Color("#e2e8f0"),
    }
}

impl Draw for MemoryGame {
    fn draw(&self, surface: &mut dyn Surface) {
        backdrop(surface);

        for (i, card) in self.deck().iter().enumerate() {
            let (min, side) = memory::card_rect(i);
            let centre = min + side / 2.0;
            if self.is_face_up(i) {
                surface.set_fill_color(palette::PLAYER);
                surface.set_glow(palette::PLAYER, 12.0);
                surface.fill_rect(min.x, min.y, side.x, side.y);
                surface.clear_glow();
                surface.set_fill_color(symbol_color(card.symbol));
                surface.fill_circle(centre.x, centre.y, side.x / 4.0);
            } else {
                surface.set_fill_color(palette::CARD_BACK);
                surface.fill_rect(min.x, min.y, side.x, side.y);
                surface.set_fill_color(palette::CARD_MARK);
                surface.fill_circle(centre.x, centre.y, side.x / 10.0);
            }
        }
    }
}

impl Draw for ReflexGame {
    fn draw(&self, surface: &mut dyn Surface) {
        backdrop(surface);
        let size = surface.size();

        // Countdown bar along the top edge
        let remaining = self.time_left() as f32 / reflex::ROUND_SECONDS as f32;
        let color = if self.time_left() < 10 { palette::TIMER_LOW } else { palette::TIMER };
        surface.set_fill_color(color);
        surface.fill_rect(0.0, 0.0, size.x * remaining, 4.0);

        if self.phase().is_playing() {
            let target = self.target() / 100.0 * size;
            surface.set_fill_color(palette::PLAYER);
            surface.set_glow(palette::PLAYER, 20.0);
            surface.fill_circle(target.x, target.y, reflex::TARGET_RADIUS);
            surface.clear_glow();
        }
    }
}
