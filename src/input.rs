//! Input layer
//!
//! Raw device events become logical actions recorded in a `ControlState`.
//! Nothing here touches game state; the simulation step reads the control
//! state and the runtime clears the edge-triggered part after each tick.

use bitflags::bitflags;
use glam::Vec2;

bitflags! {
    /// Set of logical actions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Actions: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        /// Jump / fire / tap
        const PRIMARY = 1 << 4;
        const PAUSE = 1 << 5;
    }
}

impl Actions {
    pub const DIRECTIONS: Actions = Actions::LEFT
        .union(Actions::RIGHT)
        .union(Actions::UP)
        .union(Actions::DOWN);

    /// Map a `KeyboardEvent.code` (or `.key` for the arrows/space) to an action
    pub fn from_key(code: &str) -> Option<Actions> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Actions::LEFT),
            "ArrowRight" | "KeyD" => Some(Actions::RIGHT),
            "ArrowUp" | "KeyW" => Some(Actions::UP),
            "ArrowDown" | "KeyS" => Some(Actions::DOWN),
            "Space" | " " | "Enter" => Some(Actions::PRIMARY),
            "KeyP" | "Escape" => Some(Actions::PAUSE),
            _ => None,
        }
    }

    /// Map an on-screen button's `data-action` value to an action
    pub fn from_button(name: &str) -> Option<Actions> {
        match name {
            "left" => Some(Actions::LEFT),
            "right" => Some(Actions::RIGHT),
            "up" => Some(Actions::UP),
            "down" => Some(Actions::DOWN),
            "fire" | "jump" | "tap" => Some(Actions::PRIMARY),
            "pause" => Some(Actions::PAUSE),
            _ => None,
        }
    }
}

/// A raw device event, already stripped of platform types
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    /// Pointer, mouse or touch press at surface coordinates
    PointerDown(Vec2),
    /// Pointer moved; only tracked while pressed
    PointerMove(Vec2),
    PointerUp(Vec2),
    /// On-screen control button pressed or released
    ActionDown(Actions),
    ActionUp(Actions),
}

/// Mutable control record shared between input handlers and the simulation
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    held: Actions,
    pressed: Actions,
    last_direction: Option<Actions>,
    pointer: Option<Vec2>,
    /// Where the pointer is while it stays pressed
    held_pointer: Option<Vec2>,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one raw event. Unmapped keys are ignored.
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(code) => {
                if let Some(action) = Actions::from_key(code) {
                    self.press(action);
                }
            }
            InputEvent::KeyUp(code) => {
                if let Some(action) = Actions::from_key(code) {
                    self.release(action);
                }
            }
            InputEvent::PointerDown(pos) => {
                self.press(Actions::PRIMARY);
                self.pointer = Some(*pos);
                self.held_pointer = Some(*pos);
            }
            InputEvent::PointerMove(pos) => {
                if self.held_pointer.is_some() {
                    self.held_pointer = Some(*pos);
                }
            }
            InputEvent::PointerUp(_) => {
                self.release(Actions::PRIMARY);
                self.held_pointer = None;
            }
            InputEvent::ActionDown(action) => self.press(*action),
            InputEvent::ActionUp(action) => self.release(*action),
        }
    }

    /// Mark an action held. Only a released -> held transition counts as a
    /// press, so key auto-repeat never queues extra actions.
    pub fn press(&mut self, action: Actions) {
        if self.held.contains(action) {
            return;
        }
        self.held.insert(action);
        self.pressed.insert(action);
        if Actions::DIRECTIONS.contains(action) {
            self.last_direction = Some(action);
        }
    }

    pub fn release(&mut self, action: Actions) {
        self.held.remove(action);
    }

    /// Continuous state (shooter movement)
    pub fn is_held(&self, action: Actions) -> bool {
        self.held.intersects(action)
    }

    /// Edge-triggered since the last executed tick
    pub fn was_pressed(&self, action: Actions) -> bool {
        self.pressed.intersects(action)
    }

    /// Most recent directional press since the last executed tick
    pub fn last_direction(&self) -> Option<Actions> {
        self.last_direction
    }

    /// Position of the last pointer-down since the last executed tick
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Current position of a pressed pointer. Survives tick boundaries.
    pub fn held_pointer(&self) -> Option<Vec2> {
        self.held_pointer
    }

    /// Drop edge-triggered input after a tick consumed it
    pub fn end_tick(&mut self) {
        self.pressed = Actions::empty();
        self.last_direction = None;
        self.pointer = None;
    }

    /// Forget everything, including held keys (restart, unmount)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
