//! Platform abstraction layer
//!
//! Browser events arrive as key names and client coordinates. This module
//! turns them into simulation input so the host stays a thin shell.

use glam::Vec2;

use crate::sim::{Directions, TickInput};

/// One-shot commands bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Restart,
}

/// Map a `KeyboardEvent.key` value to a command
pub fn command_for(key: &str) -> Option<Command> {
    match key {
        "Escape" => Some(Command::TogglePause),
        "r" | "R" | "Enter" => Some(Command::Restart),
        _ => None,
    }
}

/// Held keys and pointer position, accumulated between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keys: Directions,
    /// Pointer position in canvas coordinates
    pub pointer: Vec2,
    /// Pause toggle waiting for the next tick
    pub pause: bool,
}

impl InputState {
    /// Record a key press or release. Returns true if the key steers the
    /// player (arrow keys or WASD).
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowUp" | "w" | "W" => &mut self.keys.up,
            "ArrowDown" | "s" | "S" => &mut self.keys.down,
            "ArrowLeft" | "a" | "A" => &mut self.keys.left,
            "ArrowRight" | "d" | "D" => &mut self.keys.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Drop all held keys (focus lost, keyups will never arrive)
    pub fn release_all(&mut self) {
        self.keys = Directions::default();
    }

    /// Pointer position from client coordinates and the canvas' top-left
    pub fn set_pointer(&mut self, client: Vec2, canvas_origin: Vec2) {
        self.pointer = client - canvas_origin;
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            keys: self.keys,
            pause: self.pause,
        }
    }

    /// Clear one-shot inputs after they were consumed by a tick
    pub fn clear_one_shots(&mut self) {
        self.pause = false;
    }
}
