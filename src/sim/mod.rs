//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod landing;
pub mod particle;
pub mod rocket;
pub mod state;
pub mod terrain;
pub mod tick;

pub use landing::{Touchdown, evaluate, is_safe_landing};
pub use particle::Particle;
pub use rocket::{Engine, FlightState, HULL, Rocket};
pub use state::{GameState, Telemetry};
pub use terrain::{LandingPad, Terrain};
pub use tick::{TickInput, tick};
