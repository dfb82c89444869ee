use std::collections::HashSet;

use crate::window::{Input, Key};

/// Held keys plus the keys that went down during the current frame.
#[derive(Debug, Default)]
pub struct KeyboardState {
    keys_down: HashSet<Key>,
    keys_pressed: HashSet<Key>,
}

impl KeyboardState {
    /// Clears per-frame transitions. Call before feeding the frame's events.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    pub fn press(&mut self, key: Key) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.keys_down.remove(&key);
    }

    /// Drops every held key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.keys_pressed.clear();
    }
}

impl Input for KeyboardState {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
