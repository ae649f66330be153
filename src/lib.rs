//! Rocket Lander - descend through rough terrain and settle on the pad
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rocket physics, particles, terrain, landing)
//! - `tuning`: Data-driven physics constants
//! - `platform`: Keyboard/touch input mapping
//! - `renderer`: WebGPU rendering pipeline

pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{ControlScheme, ExhaustDirection, TerrainCollision, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions (screen units, y grows downward)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;
}

/// Degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

/// Rotate a vector by an angle in degrees (standard 2D rotation matrix)
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(deg_to_rad(degrees)).rotate(v)
}

/// Unit vector pointing along an angle in radians
#[inline]
pub fn direction(radians: f32) -> Vec2 {
    Vec2::new(radians.cos(), radians.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_deg_quarter_turn() {
        // Screen space: +90° turns +x into +y (downward)
        let v = rotate_deg(Vec2::new(1.0, 0.0), 90.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_deg_matches_matrix() {
        let p = Vec2::new(10.0, 10.0);
        let rad = deg_to_rad(30.0);
        let expected = Vec2::new(
            p.x * rad.cos() - p.y * rad.sin(),
            p.x * rad.sin() + p.y * rad.cos(),
        );
        assert!((rotate_deg(p, 30.0) - expected).length() < 1e-5);
    }
}
