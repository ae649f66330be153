//! Game state: one rocket, one terrain, and the RNG that shaped them

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::rocket::{FlightState, Rocket};
use super::terrain::Terrain;
use crate::tuning::Tuning;

/// Approach readout shown next to the controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub vertical_speed: f32,
    pub horizontal_drift: f32,
    /// Degrees
    pub tilt: f32,
    pub vertical_safe: bool,
    pub drift_safe: bool,
    pub tilt_safe: bool,
}

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rocket: Rocket,
    pub terrain: Terrain,
    /// Simulation tick counter (across resets)
    pub time_ticks: u64,
    /// How many times the level has been regenerated
    pub resets: u32,
    /// Particle jitter and terrain shape both draw from this stream
    rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = Terrain::generate(&tuning, &mut rng);
        Self {
            seed,
            rocket: Rocket::new(tuning.spawn),
            terrain,
            tuning,
            time_ticks: 0,
            resets: 0,
            rng,
        }
    }

    /// Replace the rocket and regenerate the terrain.
    ///
    /// The RNG stream continues, so each level differs while a whole session
    /// still replays from its seed.
    pub fn reset(&mut self) {
        self.rocket = Rocket::new(self.tuning.spawn);
        self.terrain = Terrain::generate(&self.tuning, &mut self.rng);
        self.resets += 1;
        log::info!("Level reset #{} (seed {})", self.resets, self.seed);
    }

    /// Split borrow for code that mutates the rocket while drawing randomness
    pub fn rocket_and_rng(&mut self) -> (&mut Rocket, &Tuning, &mut Pcg32) {
        (&mut self.rocket, &self.tuning, &mut self.rng)
    }

    pub fn telemetry(&self) -> Telemetry {
        let vel = self.rocket.vel;
        let limit = self.tuning.safe_landing_velocity;
        Telemetry {
            vertical_speed: vel.y,
            horizontal_drift: vel.x,
            tilt: self.rocket.angle,
            vertical_safe: vel.y.abs() < limit,
            drift_safe: vel.x.abs() < limit,
            tilt_safe: self.rocket.angle.abs() < self.tuning.safe_landing_angle,
        }
    }

    /// Overlay message once the flight is over
    pub fn status_text(&self) -> Option<&'static str> {
        match self.rocket.state {
            FlightState::Flying => None,
            FlightState::Landed => Some("LANDED! Press R to reset"),
            FlightState::Crashed => Some("CRASHED! Press R to reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_new_state_spawns_at_rest() {
        let state = GameState::new(12345, Tuning::default());
        assert_eq!(state.rocket.pos, Vec2::new(640.0, 100.0));
        assert_eq!(state.rocket.vel, Vec2::ZERO);
        assert_eq!(state.rocket.angle, 0.0);
        assert_eq!(state.rocket.angular_vel, 0.0);
        assert!(state.rocket.is_flying());
        assert!(state.terrain.landing_pad.is_some());
        assert_eq!(state.status_text(), None);
    }

    #[test]
    fn test_reset_restores_spawn_and_regenerates() {
        let mut state = GameState::new(99, Tuning::default());
        let first = state.terrain.points.clone();

        state.rocket.pos = Vec2::new(1.0, 2.0);
        state.rocket.vel = Vec2::new(3.0, 4.0);
        state.rocket.angle = 400.0;
        state.rocket.angular_vel = -9.0;
        state.rocket.state = FlightState::Crashed;
        assert_eq!(state.status_text(), Some("CRASHED! Press R to reset"));

        state.reset();
        assert_eq!(state.rocket.pos, state.tuning.spawn);
        assert_eq!(state.rocket.vel, Vec2::ZERO);
        assert_eq!(state.rocket.angle, 0.0);
        assert_eq!(state.rocket.angular_vel, 0.0);
        assert!(state.rocket.is_flying());
        assert!(state.rocket.particles.is_empty());
        assert_eq!(state.resets, 1);

        assert_ne!(state.terrain.points, first);
        let pad = state.terrain.landing_pad.expect("pad after reset");
        assert!(pad.x_start >= 1280.0 / 3.0 - 1e-3 && pad.x_start <= 640.0 + 1e-3);
    }

    #[test]
    fn test_telemetry_flags() {
        let mut state = GameState::new(1, Tuning::default());
        state.rocket.vel = Vec2::new(-10.0, 75.0);
        state.rocket.angle = -12.0;
        let t = state.telemetry();
        assert_eq!(t.vertical_speed, 75.0);
        assert_eq!(t.horizontal_drift, -10.0);
        assert!(!t.vertical_safe);
        assert!(t.drift_safe);
        assert!(t.tilt_safe);
    }

    #[test]
    fn test_same_seed_same_levels() {
        let mut a = GameState::new(7, Tuning::default());
        let mut b = GameState::new(7, Tuning::default());
        a.reset();
        b.reset();
        assert_eq!(a.terrain.points, b.terrain.points);
    }
}
