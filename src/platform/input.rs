//! Keyboard and touch controls
//!
//! Engines are level-triggered (held keys, held pointers). Reset is
//! edge-triggered and stays latched until `end_frame()`, which the loop calls
//! only after a simulation step has consumed it.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    Q,
    E,
    R,
    Enter,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "ShiftLeft" => Some(Key::ShiftLeft),
            "ShiftRight" => Some(Key::ShiftRight),
            "KeyQ" => Some(Key::Q),
            "KeyE" => Some(Key::E),
            "KeyR" => Some(Key::R),
            "Enter" => Some(Key::Enter),
            _ => None,
        }
    }

    /// Keys whose browser default (scrolling) should be suppressed
    pub fn is_flight_key(&self) -> bool {
        matches!(self, Key::Left | Key::Right | Key::ShiftLeft | Key::ShiftRight)
    }
}

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive on all edges
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// On-screen button placement for touch devices
#[derive(Debug, Clone, PartialEq)]
pub struct TouchLayout {
    pub thrust_left: Rect,
    pub thrust_right: Rect,
    pub pitch_left: Rect,
    pub pitch_right: Rect,
    /// Only live once the flight is over
    pub restart: Rect,
}

impl TouchLayout {
    const MARGIN: f32 = 20.0;
    const THRUST_SIZE: f32 = 100.0;
    const PITCH_SIZE: f32 = 60.0;
    const GAP: f32 = 10.0;

    pub fn new(width: f32, height: f32) -> Self {
        let thrust_y = height - Self::THRUST_SIZE - Self::MARGIN;
        let thrust_left = Rect::new(Self::MARGIN, thrust_y, Self::THRUST_SIZE, Self::THRUST_SIZE);
        let thrust_right = Rect::new(
            width - Self::THRUST_SIZE - Self::MARGIN,
            thrust_y,
            Self::THRUST_SIZE,
            Self::THRUST_SIZE,
        );

        // Pitch buttons sit centred above their thrust button
        let pitch_above = |thrust: &Rect| {
            Rect::new(
                thrust.x + (Self::THRUST_SIZE - Self::PITCH_SIZE) / 2.0,
                thrust.y - Self::PITCH_SIZE - Self::GAP,
                Self::PITCH_SIZE,
                Self::PITCH_SIZE,
            )
        };

        Self {
            pitch_left: pitch_above(&thrust_left),
            pitch_right: pitch_above(&thrust_right),
            thrust_left,
            thrust_right,
            restart: Rect::new(width / 2.0 - 50.0, height - 200.0, 100.0, 40.0),
        }
    }

    /// The four flight buttons, for drawing
    pub fn flight_buttons(&self) -> [Rect; 4] {
        [self.thrust_left, self.thrust_right, self.pitch_left, self.pitch_right]
    }
}

/// Accumulated input state between simulation steps
#[derive(Debug, Clone)]
pub struct Controls {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    /// Active pointers by id, in playfield coordinates
    pointers: HashMap<i32, Vec2>,
    pub layout: TouchLayout,
}

impl Controls {
    pub fn new(layout: TouchLayout) -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            pointers: HashMap::new(),
            layout,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn pointer_down(&mut self, id: i32, pos: Vec2) {
        self.pointers.insert(id, pos);
    }

    /// Moves are ignored for pointers that are not down
    pub fn pointer_move(&mut self, id: i32, pos: Vec2) {
        if let Some(p) = self.pointers.get_mut(&id) {
            *p = pos;
        }
    }

    pub fn pointer_up(&mut self, id: i32) {
        self.pointers.remove(&id);
    }

    /// Drop all held state (focus loss, level reset)
    pub fn clear(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
        self.pointers.clear();
    }

    fn keyboard_input(&self) -> TickInput {
        TickInput {
            left: self.is_held(Key::Left) || self.is_held(Key::ShiftLeft),
            right: self.is_held(Key::Right) || self.is_held(Key::ShiftRight),
            pitch_left: self.is_held(Key::Q),
            pitch_right: self.is_held(Key::E),
            reset: self.just_pressed.contains(&Key::R) || self.just_pressed.contains(&Key::Enter),
        }
    }

    fn touch_input(&self, flight_over: bool) -> TickInput {
        let mut input = TickInput::default();
        for &pos in self.pointers.values() {
            if flight_over && self.layout.restart.contains(pos) {
                input.reset = true;
                continue;
            }
            let layout = &self.layout;
            input.left |= layout.thrust_left.contains(pos);
            input.right |= layout.thrust_right.contains(pos);
            input.pitch_left |= layout.pitch_left.contains(pos);
            input.pitch_right |= layout.pitch_right.contains(pos);
        }
        input
    }

    /// Input for the next simulation step
    pub fn tick_input(&self, flight_over: bool) -> TickInput {
        self.keyboard_input().merge(self.touch_input(flight_over))
    }

    /// Forget edge-triggered presses once a step has consumed them
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl Default for Controls {
    fn default() -> Self {
        use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
        Self::new(TouchLayout::new(SCREEN_WIDTH, SCREEN_HEIGHT))
    }
}
