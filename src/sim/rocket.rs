//! The player's rocket: pose, engines and per-tick integration

use glam::Vec2;
use rand::Rng;

use super::particle::{Particle, update_particles};
use crate::tuning::{ControlScheme, Tuning};
use crate::{deg_to_rad, rotate_deg};

/// Hull triangle in the rocket frame: nose, bottom right, bottom left
pub const HULL: [Vec2; 3] = [
    Vec2::new(0.0, -20.0),
    Vec2::new(10.0, 10.0),
    Vec2::new(-10.0, 10.0),
];

/// Flight outcome; both non-flying states are terminal until reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightState {
    #[default]
    Flying,
    Landed,
    Crashed,
}

/// One of the four thrusters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    BottomLeft,
    BottomRight,
    /// Pitch thruster near the nose
    TopLeft,
    TopRight,
}

impl Engine {
    pub const ALL: [Engine; 4] = [
        Engine::BottomLeft,
        Engine::BottomRight,
        Engine::TopLeft,
        Engine::TopRight,
    ];

    /// -1 for the left side, +1 for the right
    pub fn side(&self) -> f32 {
        match self {
            Engine::BottomLeft | Engine::TopLeft => -1.0,
            Engine::BottomRight | Engine::TopRight => 1.0,
        }
    }

    pub fn is_pitch(&self) -> bool {
        matches!(self, Engine::TopLeft | Engine::TopRight)
    }

    /// Mount point in the rocket frame
    pub fn offset(&self, tuning: &Tuning) -> Vec2 {
        let base = if self.is_pitch() {
            tuning.top_engine_offset
        } else {
            tuning.bottom_engine_offset
        };
        Vec2::new(base.x.abs() * self.side(), base.y)
    }
}

/// The rocket rigid body and its exhaust
#[derive(Debug, Clone)]
pub struct Rocket {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees, clockwise on screen, not normalized
    pub angle: f32,
    /// Degrees per second
    pub angular_vel: f32,
    pub particles: Vec<Particle>,
    pub state: FlightState,
}

impl Rocket {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            particles: Vec::new(),
            state: FlightState::Flying,
        }
    }

    pub fn is_flying(&self) -> bool {
        self.state == FlightState::Flying
    }

    pub fn crashed(&self) -> bool {
        self.state == FlightState::Crashed
    }

    pub fn landed(&self) -> bool {
        self.state == FlightState::Landed
    }

    /// Rotate and translate a rocket-frame point into the world
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        rotate_deg(local, self.angle) + self.pos
    }

    /// Hull in world space (same order as `HULL`)
    pub fn hull(&self) -> [Vec2; 3] {
        HULL.map(|p| self.to_world(p))
    }

    /// Midpoint of the two rear hull corners, used for ground contact
    pub fn bottom_point(&self) -> Vec2 {
        let hull = self.hull();
        (hull[1] + hull[2]) / 2.0
    }

    /// Fire one engine for a tick: apply its force and emit one particle
    pub fn fire<R: Rng>(&mut self, engine: Engine, tuning: &Tuning, rng: &mut R, dt: f32) {
        if !self.is_flying() {
            return;
        }
        if tuning.control == ControlScheme::Differential && engine.is_pitch() {
            return;
        }
        self.apply_engine(engine, tuning, dt);
        self.emit_exhaust(engine, tuning, rng);
    }

    /// Velocity and spin change from one engine over `dt`
    pub fn apply_engine(&mut self, engine: Engine, tuning: &Tuning, dt: f32) {
        if !self.is_flying() {
            return;
        }

        match tuning.control {
            ControlScheme::Differential => {
                if engine.is_pitch() {
                    return;
                }
                let local = Vec2::new(0.0, -tuning.thrust_power * tuning.bottom_thrust_scale);
                self.vel += rotate_deg(local, self.angle) * dt;
                self.angular_vel += tuning.torque * engine.side() * dt;
            }
            ControlScheme::OffsetEngines => {
                let (scale, divisor) = if engine.is_pitch() {
                    (tuning.pitch_thrust_scale, tuning.pitch_torque_divisor)
                } else {
                    (tuning.bottom_thrust_scale, tuning.bottom_torque_divisor)
                };
                let thrust = rotate_deg(Vec2::new(0.0, -tuning.thrust_power * scale), self.angle);

                // Pitch thrusters only turn the rocket
                if !engine.is_pitch() {
                    self.vel += thrust * dt;
                }

                let offset = rotate_deg(engine.offset(tuning), self.angle);
                let torque = offset.perp_dot(thrust);
                self.angular_vel += torque / divisor * dt;
            }
        }
    }

    /// Spawn one exhaust particle at the engine nozzle
    pub fn emit_exhaust<R: Rng>(&mut self, engine: Engine, tuning: &Tuning, rng: &mut R) {
        let nozzle = self.to_world(engine.offset(tuning));
        let exhaust = deg_to_rad(self.angle) + tuning.exhaust_direction.offset();
        self.particles.push(Particle::emit(nozzle, exhaust, tuning, rng));
    }

    /// Integrate one tick. A landed or crashed rocket does not move.
    pub fn integrate(&mut self, tuning: &Tuning, dt: f32) {
        if !self.is_flying() {
            return;
        }

        self.vel.y += tuning.gravity * dt;
        self.pos += self.vel * dt;
        self.angle += self.angular_vel * dt;

        self.vel *= 1.0 - tuning.drag * dt;
        self.angular_vel *= 1.0 - tuning.angular_drag * dt;

        update_particles(&mut self.particles, tuning.gravity, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::ExhaustDirection;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_hull_at_rest() {
        let rocket = Rocket::new(Vec2::new(100.0, 50.0));
        let hull = rocket.hull();
        assert_eq!(hull[0], Vec2::new(100.0, 30.0));
        assert_eq!(rocket.bottom_point(), Vec2::new(100.0, 60.0));
    }

    #[test]
    fn test_hull_rotated() {
        let mut rocket = Rocket::new(Vec2::ZERO);
        rocket.angle = 90.0;
        // Nose (0,-20) swings to (+20, 0)
        let nose = rocket.hull()[0];
        assert_close(nose.x, 20.0);
        assert_close(nose.y, 0.0);
        // Bottom midpoint (0,10) swings to (-10, 0)
        let bottom = rocket.bottom_point();
        assert_close(bottom.x, -10.0);
        assert_close(bottom.y, 0.0);
    }

    #[test]
    fn test_free_fall_matches_closed_form() {
        let tuning = Tuning {
            gravity: 100.0,
            drag: 0.1,
            ..Default::default()
        };
        let mut rocket = Rocket::new(Vec2::ZERO);

        // v_{n+1} = (v_n + g·dt)(1 - drag·dt)  =>  v_n = g·dt·k·(1 - k^n)/(1 - k)
        let dt = 1.0f64 / 60.0;
        let k = 1.0 - 0.1 * dt;
        for n in 1..=10 {
            rocket.integrate(&tuning, DT);
            let expected = 100.0 * dt * k * (1.0 - k.powi(n)) / (1.0 - k);
            assert!((rocket.vel.y as f64 - expected).abs() < 1e-4 * expected.max(1.0));
        }
        assert_eq!(rocket.vel.x, 0.0);
        assert_eq!(rocket.angle, 0.0);
    }

    #[test]
    fn test_integrate_order() {
        let tuning = Tuning::default();
        let mut rocket = Rocket::new(Vec2::ZERO);
        rocket.vel = Vec2::new(6.0, 0.0);
        rocket.angular_vel = 60.0;
        rocket.integrate(&tuning, DT);

        // Gravity lands before the position update, drag after
        assert_close(rocket.pos.x, 0.1);
        assert_close(rocket.pos.y, 60.0 * DT * DT);
        assert_close(rocket.angle, 1.0);
        assert_close(rocket.vel.x, 6.0 * (1.0 - 0.1 * DT));
        assert_close(rocket.angular_vel, 60.0 * (1.0 - 0.2 * DT));
    }

    #[test]
    fn test_bottom_engine_offset_torque() {
        let tuning = Tuning::default();
        let mut rocket = Rocket::new(Vec2::ZERO);
        rocket.apply_engine(Engine::BottomLeft, &tuning, DT);

        // Thrust (0,-75) at (-10,10): torque = -10·-75 - 10·0 = 750
        assert_close(rocket.vel.x, 0.0);
        assert_close(rocket.vel.y, -75.0 * DT);
        assert_close(rocket.angular_vel, 7.5 * DT);

        let mut rocket = Rocket::new(Vec2::ZERO);
        rocket.apply_engine(Engine::BottomRight, &tuning, DT);
        assert_close(rocket.angular_vel, -7.5 * DT);
    }

    #[test]
    fn test_pitch_engine_is_pure_torque() {
        let tuning = Tuning::default();
        let mut rocket = Rocket::new(Vec2::ZERO);
        rocket.angle = 30.0;
        rocket.apply_engine(Engine::TopRight, &tuning, DT);

        assert_eq!(rocket.vel, Vec2::ZERO);
        // Lever arm (5,-20) against thrust (0,-3750): torque = 5·-3750 = -18750
        assert_close(rocket.angular_vel, -18750.0 / 200.0 * DT);
    }

    #[test]
    fn test_differential_scheme() {
        let tuning = Tuning {
            control: ControlScheme::Differential,
            ..Default::default()
        };
        let mut rocket = Rocket::new(Vec2::ZERO);
        rocket.angle = 90.0;
        rocket.apply_engine(Engine::BottomRight, &tuning, DT);

        // Upward thrust rotated a quarter turn points along +x
        assert_close(rocket.vel.x, 75.0 * DT);
        assert_close(rocket.vel.y, 0.0);
        assert_close(rocket.angular_vel, 200.0 * DT);

        rocket.apply_engine(Engine::BottomLeft, &tuning, DT);
        assert_close(rocket.angular_vel, 0.0);

        let before = rocket.vel;
        rocket.apply_engine(Engine::TopLeft, &tuning, DT);
        assert_eq!(rocket.vel, before);
    }

    #[test]
    fn test_fire_emits_particle_at_nozzle() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut rocket = Rocket::new(Vec2::new(200.0, 100.0));
        rocket.fire(Engine::BottomLeft, &tuning, &mut rng, DT);

        assert_eq!(rocket.particles.len(), 1);
        let p = &rocket.particles[0];
        assert_eq!(p.pos, Vec2::new(190.0, 110.0));
    }

    #[test]
    fn test_default_exhaust_heading_reversed() {
        let tuning = Tuning {
            particle_jitter: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(2);
        let mut rocket = Rocket::new(Vec2::new(300.0, 200.0));
        rocket.emit_exhaust(Engine::BottomLeft, &tuning, &mut rng);

        // Upright rocket: angle 0 + π points along -x
        let v = rocket.particles[0].vel;
        assert!((v.y.atan2(v.x).abs() - std::f32::consts::PI).abs() < 1e-5);
        assert!(v.x < 0.0);
    }

    #[test]
    fn test_thrust_axis_exhaust_heads_down() {
        let tuning = Tuning {
            particle_jitter: 0.0,
            exhaust_direction: ExhaustDirection::ThrustAxis,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(2);
        let mut rocket = Rocket::new(Vec2::new(300.0, 200.0));
        rocket.angle = 30.0;
        rocket.emit_exhaust(Engine::BottomRight, &tuning, &mut rng);

        let v = rocket.particles[0].vel;
        let expected = deg_to_rad(30.0) + std::f32::consts::FRAC_PI_2;
        assert!((v.y.atan2(v.x) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_differential_pitch_fire_is_ignored() {
        let tuning = Tuning {
            control: ControlScheme::Differential,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut rocket = Rocket::new(Vec2::ZERO);
        rocket.fire(Engine::TopLeft, &tuning, &mut rng, DT);
        assert!(rocket.particles.is_empty());
        assert_eq!(rocket.angular_vel, 0.0);
    }

    #[test]
    fn test_terminal_rocket_is_frozen() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);

        for state in [FlightState::Landed, FlightState::Crashed] {
            let mut rocket = Rocket::new(Vec2::new(10.0, 10.0));
            rocket.vel = Vec2::new(3.0, 4.0);
            rocket.angular_vel = 5.0;
            rocket.angle = 6.0;
            rocket.state = state;

            for engine in Engine::ALL {
                rocket.fire(engine, &tuning, &mut rng, DT);
            }
            rocket.integrate(&tuning, DT);

            assert_eq!(rocket.pos, Vec2::new(10.0, 10.0));
            assert_eq!(rocket.vel, Vec2::new(3.0, 4.0));
            assert_eq!(rocket.angle, 6.0);
            assert_eq!(rocket.angular_vel, 5.0);
            assert!(rocket.particles.is_empty());
        }
    }
}
