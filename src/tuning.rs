//! Physics tuning
//!
//! Every constant the simulation reads lives here and is handed to
//! `GameState` at construction. Tuning files are JSON; missing fields fall back
//! to the defaults below.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// How engine input turns into linear and angular velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlScheme {
    /// Each bottom engine pushes along the rocket axis and adds a fixed torque
    Differential,
    /// Engines are offset points on the hull; torque comes from offset × thrust
    #[default]
    OffsetEngines,
}

impl ControlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlScheme::Differential => "Differential",
            ControlScheme::OffsetEngines => "OffsetEngines",
        }
    }

}

impl FromStr for ControlScheme {
    type Err = TuningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "differential" | "simple" => Ok(ControlScheme::Differential),
            "offset" | "offsetengines" | "offset-engines" => Ok(ControlScheme::OffsetEngines),
            _ => Err(TuningError::Invalid("control", "unknown control scheme")),
        }
    }
}

/// Ground test used when the rocket is not over the pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TerrainCollision {
    /// Crash when the sample is below the segment's left endpoint
    #[default]
    LeftEndpoint,
    /// Crash when the sample is at or below the segment line at its x
    Interpolated,
}

/// Heading of exhaust particles relative to the rocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExhaustDirection {
    /// Rocket angle + π; an upright rocket sprays exhaust toward -x
    #[default]
    Reversed,
    /// Rocket angle + π/2, straight back along the thrust axis
    ThrustAxis,
}

impl ExhaustDirection {
    /// Offset added to the rocket angle (radians)
    pub fn offset(&self) -> f32 {
        match self {
            ExhaustDirection::Reversed => std::f32::consts::PI,
            ExhaustDirection::ThrustAxis => std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Error raised when a tuning file cannot be used
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON for `Tuning`
    Parse(serde_json::Error),
    /// A value is out of range (field name, reason)
    Invalid(&'static str, &'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning parse error: {e}"),
            TuningError::Invalid(field, reason) => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(..) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Immutable physics configuration for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Where a fresh rocket appears
    pub spawn: Vec2,

    // === Rigid body ===
    /// Downward acceleration (units/s²), shared by rocket and particles
    pub gravity: f32,
    pub thrust_power: f32,
    /// Differential scheme torque (deg/s²)
    pub torque: f32,
    /// Linear velocity decay per second
    pub drag: f32,
    /// Angular velocity decay per second
    pub angular_drag: f32,
    pub control: ControlScheme,

    // === Offset engines ===
    /// Bottom engine offset in the hull frame (mirrored for the left engine)
    pub bottom_engine_offset: Vec2,
    /// Top engine offset in the hull frame (mirrored for the left engine)
    pub top_engine_offset: Vec2,
    /// Fraction of `thrust_power` a single bottom engine produces
    pub bottom_thrust_scale: f32,
    /// Multiple of `thrust_power` used for the pitch lever arm
    pub pitch_thrust_scale: f32,
    pub bottom_torque_divisor: f32,
    pub pitch_torque_divisor: f32,

    // === Landing ===
    pub safe_landing_velocity: f32,
    /// Degrees
    pub safe_landing_angle: f32,
    /// Vertical distance to the pad that counts as touching it
    pub touchdown_tolerance: f32,
    pub terrain_collision: TerrainCollision,

    // === Particles ===
    pub particle_speed_min: f32,
    pub particle_speed_max: f32,
    pub particle_lifetime_min: f32,
    pub particle_lifetime_max: f32,
    /// Radians either side of the exhaust direction
    pub particle_jitter: f32,
    pub exhaust_direction: ExhaustDirection,

    // === Terrain ===
    /// Pad height as a fraction of screen height
    pub pad_height: f32,
    pub pad_width: f32,
    /// Pad trigger window as fractions of screen width
    pub pad_window: (f32, f32),
    /// Rough terrain height range as fractions of screen height
    pub rough_height: (f32, f32),
    /// Horizontal advance between rough points
    pub rough_step: (f32, f32),
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            spawn: Vec2::new(SCREEN_WIDTH / 2.0, 100.0),

            gravity: 60.0,
            thrust_power: 150.0,
            torque: 200.0,
            drag: 0.1,
            angular_drag: 0.2,
            control: ControlScheme::OffsetEngines,

            bottom_engine_offset: Vec2::new(10.0, 10.0),
            top_engine_offset: Vec2::new(5.0, -20.0),
            bottom_thrust_scale: 0.5,
            pitch_thrust_scale: 25.0,
            bottom_torque_divisor: 100.0,
            pitch_torque_divisor: 200.0,

            safe_landing_velocity: 50.0,
            safe_landing_angle: 20.0,
            touchdown_tolerance: 5.0,
            terrain_collision: TerrainCollision::LeftEndpoint,

            particle_speed_min: 50.0,
            particle_speed_max: 100.0,
            particle_lifetime_min: 0.2,
            particle_lifetime_max: 0.5,
            particle_jitter: 0.2,
            exhaust_direction: ExhaustDirection::Reversed,

            pad_height: 0.7,
            pad_width: 100.0,
            pad_window: (1.0 / 3.0, 0.5),
            rough_height: (0.6, 0.8),
            rough_step: (20.0, 50.0),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning file
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("pad_width", self.pad_width),
            ("bottom_torque_divisor", self.bottom_torque_divisor),
            ("pitch_torque_divisor", self.pitch_torque_divisor),
            ("touchdown_tolerance", self.touchdown_tolerance),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid(field, "must be finite and > 0"));
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("thrust_power", self.thrust_power),
            ("torque", self.torque),
            ("drag", self.drag),
            ("angular_drag", self.angular_drag),
            ("safe_landing_velocity", self.safe_landing_velocity),
            ("safe_landing_angle", self.safe_landing_angle),
            ("particle_jitter", self.particle_jitter),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid(field, "must be finite and >= 0"));
            }
        }

        let ranges = [
            ("particle_speed", (self.particle_speed_min, self.particle_speed_max)),
            ("particle_lifetime", (self.particle_lifetime_min, self.particle_lifetime_max)),
            ("pad_window", self.pad_window),
            ("rough_height", self.rough_height),
            ("rough_step", self.rough_step),
        ];
        for (field, (lo, hi)) in ranges {
            if !lo.is_finite() || !hi.is_finite() || lo > hi || lo < 0.0 {
                return Err(TuningError::Invalid(field, "expected 0 <= min <= max"));
            }
        }

        // Zero-width steps would never leave the generator loop
        if self.rough_step.0 <= 0.0 {
            return Err(TuningError::Invalid("rough_step", "minimum step must be > 0"));
        }
        if !self.spawn.is_finite() {
            return Err(TuningError::Invalid("spawn", "must be finite"));
        }

        Ok(())
    }

    /// Pad surface height in screen units
    pub fn pad_y(&self) -> f32 {
        self.screen_height * self.pad_height
    }

    /// Fade reference for particle alpha (the longest possible lifetime)
    pub fn particle_fade(&self) -> f32 {
        self.particle_lifetime_max.max(f32::EPSILON)
    }
}
