//! Platform abstraction layer
//!
//! Turns raw keyboard and pointer events into simulation input. Event
//! delivery itself (DOM listeners) lives in the binary.

pub mod input;

pub use input::{Controls, Key, Rect, TouchLayout};
