//! 2D rendering module
//!
//! Scenes draw through the `Surface` trait, which only needs rectangle,
//! circle and polygon fills plus a glow toggle:
//! - `CommandBuffer` records commands (native demo, tests)
//! - `CanvasSurface` drives a `CanvasRenderingContext2d` (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scenes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::sim::MiniGame;

/// CSS colour string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub &'static str);

/// Neon palette
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color("#020617");
    pub const GROUND: Color = Color("#1e293b");
    pub const GRID: Color = Color("#1e293b");
    pub const CARD_BACK: Color = Color("#1e293b");
    pub const CARD_MARK: Color = Color("#475569");
    pub const PLAYER: Color = Color("#3b82f6");
    pub const PLAYER_TRAIL: Color = Color("#60a5fa");
    pub const HAZARD: Color = Color("#ef4444");
    pub const STAR: Color = Color("#ffffff");
    pub const TIMER: Color = Color("#3b82f6");
    pub const TIMER_LOW: Color = Color("#ef4444");
}

/// One recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillColor(Color),
    Rect { x: f32, y: f32, w: f32, h: f32 },
    Circle { x: f32, y: f32, r: f32 },
    Polygon(Vec<Vec2>),
    Glow { color: Color, blur: f32 },
    NoGlow,
}

/// Minimal 2D drawing target
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> Vec2;

    fn clear(&mut self);

    fn set_fill_color(&mut self, color: Color);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn fill_circle(&mut self, x: f32, y: f32, r: f32);

    /// Closed polygon through `points`
    fn fill_polygon(&mut self, points: &[Vec2]);

    /// Blur subsequent fills with a coloured glow
    fn set_glow(&mut self, color: Color, blur: f32);

    fn clear_glow(&mut self);
}

/// Render step: a read-only view of the game state painted onto a surface
pub trait Draw {
    fn draw(&self, surface: &mut dyn Surface);
}

/// A game the runtime can both simulate and draw
pub trait ArcadeGame: MiniGame + Draw {}

impl<T: MiniGame + Draw> ArcadeGame for T {}

/// Surface that records commands instead of drawing
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    size: Vec2,
    glow_enabled: bool,
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            glow_enabled: true,
            commands: Vec::new(),
        }
    }

    pub fn with_glow(mut self, enabled: bool) -> Self {
        self.glow_enabled = enabled;
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop everything recorded so far
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Number of filled shapes (rects, circles, polygons)
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. } | DrawCommand::Circle { .. } | DrawCommand::Polygon(_)))
            .count()
    }
}

impl Surface for CommandBuffer {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::Rect { x, y, w, h });
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32) {
        self.commands.push(DrawCommand::Circle { x, y, r });
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        self.commands.push(DrawCommand::Polygon(points.to_vec()));
    }

    fn set_glow(&mut self, color: Color, blur: f32) {
        if self.glow_enabled {
            self.commands.push(DrawCommand::Glow { color, blur });
        }
    }

    fn clear_glow(&mut self) {
        if self.glow_enabled {
            self.commands.push(DrawCommand::NoGlow);
        }
    }
}
