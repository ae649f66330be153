//! Fixed timestep simulation tick
//!
//! Per tick: reset (if requested) → engines → integration → touchdown check.

use super::landing::{self, Touchdown};
use super::rocket::Engine;
use super::state::GameState;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Bottom left engine
    pub left: bool,
    /// Bottom right engine
    pub right: bool,
    /// Top left pitch thruster
    pub pitch_left: bool,
    /// Top right pitch thruster
    pub pitch_right: bool,
    /// Regenerate the level
    pub reset: bool,
}

impl TickInput {
    /// Engines held this tick, in a fixed order
    pub fn engines(&self) -> impl Iterator<Item = Engine> + '_ {
        Engine::ALL.into_iter().filter(move |engine| match engine {
            Engine::BottomLeft => self.left,
            Engine::BottomRight => self.right,
            Engine::TopLeft => self.pitch_left,
            Engine::TopRight => self.pitch_right,
        })
    }

    /// Combine two input sources (keyboard + touch)
    pub fn merge(self, other: TickInput) -> TickInput {
        TickInput {
            left: self.left || other.left,
            right: self.right || other.right,
            pitch_left: self.pitch_left || other.pitch_left,
            pitch_right: self.pitch_right || other.pitch_right,
            reset: self.reset || other.reset,
        }
    }
}

/// Advance the game state by one fixed timestep.
///
/// Returns the touchdown on the tick the flight ends.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Option<Touchdown> {
    if input.reset {
        state.reset();
    }

    state.time_ticks += 1;

    if !state.rocket.is_flying() {
        return None;
    }

    {
        let (rocket, tuning, rng) = state.rocket_and_rng();
        for engine in input.engines() {
            rocket.fire(engine, tuning, rng, dt);
        }
        rocket.integrate(tuning, dt);
    }

    let rocket = &state.rocket;
    let touchdown = landing::evaluate(
        rocket.bottom_point(),
        rocket.vel,
        rocket.angle,
        &state.terrain,
        &state.tuning,
    )?;

    state.rocket.state = touchdown.state();
    match touchdown {
        Touchdown::Landed => log::info!(
            "Landed successfully after {} ticks (vel {:.1}, {:.1}; angle {:.1})",
            state.time_ticks,
            state.rocket.vel.x,
            state.rocket.vel.y,
            state.rocket.angle
        ),
        Touchdown::HardLanding => log::info!(
            "Crash landing (vel {:.1}, {:.1}; angle {:.1})",
            state.rocket.vel.x,
            state.rocket.vel.y,
            state.rocket.angle
        ),
        Touchdown::TerrainImpact { segment } => {
            log::info!("Crashed on rough terrain (segment {})", segment)
        }
    }

    Some(touchdown)
}
