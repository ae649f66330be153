//! Touchdown evaluation: landed, crashed, or still flying
//!
//! Only the hull's bottom midpoint is tested. Off the pad, the default ground
//! test compares against each segment's left endpoint rather than the
//! segment line, so descending slopes and the pad edges can be missed; the
//! `Interpolated` mode tests the line itself.

use glam::Vec2;

use super::rocket::FlightState;
use super::terrain::{Terrain, segment_height};
use crate::tuning::{TerrainCollision, Tuning};

/// Why a flight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Touchdown {
    /// Gentle, level contact with the pad
    Landed,
    /// Pad contact outside the safe envelope
    HardLanding,
    /// Bottom point went under rough terrain
    TerrainImpact { segment: usize },
}

impl Touchdown {
    pub fn state(&self) -> FlightState {
        match self {
            Touchdown::Landed => FlightState::Landed,
            Touchdown::HardLanding | Touchdown::TerrainImpact { .. } => FlightState::Crashed,
        }
    }
}

/// True when every component is inside the safe landing envelope
pub fn is_safe_landing(vel: Vec2, angle: f32, tuning: &Tuning) -> bool {
    vel.y.abs() < tuning.safe_landing_velocity
        && vel.x.abs() < tuning.safe_landing_velocity
        && angle.abs() < tuning.safe_landing_angle
}

/// Classify the rocket's contact with the ground this tick.
///
/// `bottom` is the hull's bottom midpoint in world space; `angle` is in degrees.
/// Returns `None` while airborne.
pub fn evaluate(
    bottom: Vec2,
    vel: Vec2,
    angle: f32,
    terrain: &Terrain,
    tuning: &Tuning,
) -> Option<Touchdown> {
    if let Some(pad) = terrain.landing_pad.filter(|pad| pad.contains_x(bottom.x)) {
        // Over the pad the rough terrain is never consulted
        if (bottom.y - pad.y).abs() < tuning.touchdown_tolerance {
            return Some(if is_safe_landing(vel, angle, tuning) {
                Touchdown::Landed
            } else {
                Touchdown::HardLanding
            });
        }
        return None;
    }

    terrain
        .segments_over(bottom.x)
        .find(|&(_, p1, p2)| match tuning.terrain_collision {
            TerrainCollision::LeftEndpoint => bottom.y > p1.y,
            TerrainCollision::Interpolated => bottom.y >= segment_height(p1, p2, bottom.x),
        })
        .map(|(segment, _, _)| Touchdown::TerrainImpact { segment })
}
