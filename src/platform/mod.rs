//! Platform abstraction layer
//!
//! The simulation reads input through [`InputSource`]: a queue of key
//! transitions plus a query for keys currently held down. Window plumbing
//! lives behind it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Abstract key codes the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Left,
    Right,
}

/// Key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

/// Source of input events, drained once per tick
pub trait InputSource {
    /// Next pending event, if any
    fn poll_event(&mut self) -> Option<KeyEvent>;
    /// Whether `key` is physically held right now
    fn is_held(&self, key: Key) -> bool;
}

/// Input scripted ahead of time
///
/// Held state follows the pushed events as they are queued.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<KeyEvent>,
    held: [bool; 3],
}

fn slot(key: Key) -> usize {
    match key {
        Key::Up => 0,
        Key::Left => 1,
        Key::Right => 2,
    }
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(k) => self.held[slot(k)] = true,
            KeyEvent::Up(k) => self.held[slot(k)] = false,
        }
        self.queue.push_back(event);
    }

    pub fn press(&mut self, key: Key) {
        self.push(KeyEvent::Down(key));
    }

    pub fn release(&mut self, key: Key) {
        self.push(KeyEvent::Up(key));
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll_event(&mut self) -> Option<KeyEvent> {
        self.queue.pop_front()
    }

    fn is_held(&self, key: Key) -> bool {
        self.held[slot(key)]
    }
}

/// Demo driver: runs right and hops at a fixed period
#[derive(Debug, Clone)]
pub struct Autopilot {
    inner: ScriptedInput,
    period: u32,
    ticks: u32,
}

impl Autopilot {
    pub fn new(period: u32) -> Self {
        let mut inner = ScriptedInput::new();
        inner.press(Key::Right);
        Self {
            inner,
            period: period.max(1),
            ticks: 0,
        }
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(45)
    }
}

impl InputSource for Autopilot {
    fn poll_event(&mut self) -> Option<KeyEvent> {
        if let Some(event) = self.inner.poll_event() {
            return Some(event);
        }
        // Queue drained: this tick's input is done, schedule the next one
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % self.period == 0 {
            self.inner.press(Key::Up);
            self.inner.release(Key::Up);
        }
        None
    }

    fn is_held(&self, key: Key) -> bool {
        self.inner.is_held(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(input: &mut dyn InputSource) -> Vec<KeyEvent> {
        std::iter::from_fn(|| input.poll_event()).collect()
    }

    #[test]
    fn test_scripted_tracks_held_keys() {
        let mut input = ScriptedInput::new();
        input.press(Key::Left);
        input.press(Key::Right);
        input.release(Key::Left);
        assert!(!input.is_held(Key::Left));
        assert!(input.is_held(Key::Right));
        assert_eq!(input.pending(), 3);
        assert_eq!(
            drain(&mut input),
            vec![
                KeyEvent::Down(Key::Left),
                KeyEvent::Down(Key::Right),
                KeyEvent::Up(Key::Left)
            ]
        );
    }

    #[test]
    fn test_autopilot_holds_right_and_jumps() {
        let mut pilot = Autopilot::new(2);
        assert_eq!(drain(&mut pilot), vec![KeyEvent::Down(Key::Right)]);
        assert!(pilot.is_held(Key::Right));

        let mut jumps = 0;
        for _ in 0..10 {
            jumps += drain(&mut pilot)
                .iter()
                .filter(|e| **e == KeyEvent::Down(Key::Up))
                .count();
        }
        assert_eq!(jumps, 5);
        assert!(!pilot.is_held(Key::Up));
        assert!(pilot.is_held(Key::Right));
    }
}
