//! Keyboard to intent mapping
//!
//! Arrows steer. W/A/S/D fire up/left/down/right on the key-down edge and,
//! like the arrows, also steer while held.

use std::collections::HashSet;

use crate::sim::{Direction, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    W,
    A,
    S,
    D,
}

impl Key {
    /// Parse a DOM-style key name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "arrowleft" => Some(Key::ArrowLeft),
            "arrowright" => Some(Key::ArrowRight),
            "arrowup" => Some(Key::ArrowUp),
            "arrowdown" => Some(Key::ArrowDown),
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            _ => None,
        }
    }

    /// Fire direction bound to this key
    pub fn fire_direction(self) -> Option<Direction> {
        match self {
            Key::W => Some(Direction::Up),
            Key::D => Some(Direction::Right),
            Key::S => Some(Direction::Down),
            Key::A => Some(Direction::Left),
            _ => None,
        }
    }
}

/// Tracks held keys between frames and produces one intent per tick
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    held: HashSet<Key>,
    pending_fire: Vec<Direction>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed. Auto-repeat presses of a held key are ignored.
    pub fn key_down(&mut self, key: Key) {
        if !self.held.insert(key) {
            return;
        }
        if let Some(dir) = key.fire_direction() {
            self.pending_fire.push(dir);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Forward a named key event; unknown keys are ignored
    pub fn key_event(&mut self, name: &str, pressed: bool) {
        let Some(key) = Key::from_name(name) else {
            return;
        };
        if pressed {
            self.key_down(key);
        } else {
            self.key_up(key);
        }
    }

    /// Drop all held keys (e.g. window lost focus)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Intent for the next tick: steering from held keys, plus every fire
    /// edge since the last call
    pub fn take_intent(&mut self) -> TickInput {
        let held = |a: Key, b: Key| self.held.contains(&a) || self.held.contains(&b);
        let mut input = TickInput {
            move_left: held(Key::ArrowLeft, Key::A),
            move_right: held(Key::ArrowRight, Key::D),
            move_up: held(Key::ArrowUp, Key::W),
            move_down: held(Key::ArrowDown, Key::S),
            ..Default::default()
        };
        for dir in self.pending_fire.drain(..) {
            match dir {
                Direction::Up => input.fire_up = true,
                Direction::Right => input.fire_right = true,
                Direction::Down => input.fire_down = true,
                Direction::Left => input.fire_left = true,
            }
        }
        input
    }
}
