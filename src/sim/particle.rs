//! Thruster exhaust particles
//!
//! Purely visual: particles never collide and never feed back into the rocket.

use glam::Vec2;
use rand::Rng;

use crate::direction;
use crate::tuning::Tuning;

/// A single exhaust particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining; dead at or below zero
    pub lifetime: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, lifetime: f32) -> Self {
        Self { pos, vel, lifetime }
    }

    /// Emit from `pos` travelling roughly along `angle` (radians)
    pub fn emit<R: Rng>(pos: Vec2, angle: f32, tuning: &Tuning, rng: &mut R) -> Self {
        let jitter = tuning.particle_jitter;
        let angle = angle + rng.random_range(-jitter..=jitter);
        let speed = rng.random_range(tuning.particle_speed_min..=tuning.particle_speed_max);
        let lifetime =
            rng.random_range(tuning.particle_lifetime_min..=tuning.particle_lifetime_max);
        Self::new(pos, direction(angle) * speed, lifetime)
    }

    pub fn update(&mut self, gravity: f32, dt: f32) {
        self.pos += self.vel * dt;
        self.vel.y += gravity * dt;
        self.lifetime -= dt;
    }

    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// Opacity in [0, 1] relative to the longest lifetime a particle can have
    pub fn alpha(&self, fade: f32) -> f32 {
        (self.lifetime / fade).clamp(0.0, 1.0)
    }
}

/// Advance every particle one step and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>, gravity: f32, dt: f32) {
    for particle in particles.iter_mut() {
        particle.update(gravity, dt);
    }
    particles.retain(Particle::is_alive);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_emit_within_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let exhaust = std::f32::consts::PI;

        for _ in 0..500 {
            let p = Particle::emit(Vec2::new(5.0, 6.0), exhaust, &tuning, &mut rng);
            let speed = p.vel.length();
            assert!((50.0 - 1e-3..=100.0 + 1e-3).contains(&speed));
            assert!((0.2..=0.5).contains(&p.lifetime));

            // Heading wraps at ±π, so measure the angle between directions
            let off = crate::direction(exhaust).angle_to(p.vel);
            assert!(off.abs() <= 0.2 + 1e-4);
            assert_eq!(p.pos, Vec2::new(5.0, 6.0));
        }
    }

    #[test]
    fn test_update_falls_under_gravity() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(60.0, 0.0), 1.0);
        p.update(60.0, DT);
        // Position uses the pre-update velocity
        assert!((p.pos.x - 1.0).abs() < 1e-5);
        assert_eq!(p.pos.y, 0.0);
        assert!((p.vel.y - 1.0).abs() < 1e-5);
        assert!((p.lifetime - (1.0 - DT)).abs() < 1e-6);
    }

    #[test]
    fn test_pruned_after_ceil_lifetime_over_dt() {
        let mut particles = vec![Particle::new(Vec2::ZERO, Vec2::ZERO, 0.3)];
        let expected = (0.3f32 / DT).ceil() as usize;

        let mut updates = 0;
        while !particles.is_empty() {
            update_particles(&mut particles, 60.0, DT);
            updates += 1;
            assert!(updates <= expected + 1, "particle outlived its lifetime");
        }
        assert_eq!(updates, expected);
    }

    #[test]
    fn test_prune_only_dead() {
        let mut particles = vec![
            Particle::new(Vec2::ZERO, Vec2::ZERO, 0.01),
            Particle::new(Vec2::ZERO, Vec2::ZERO, 0.4),
            Particle::new(Vec2::ZERO, Vec2::ZERO, 0.001),
        ];
        update_particles(&mut particles, 60.0, DT);
        assert_eq!(particles.len(), 1);
        assert!(particles[0].lifetime > 0.3);
    }

    #[test]
    fn test_alpha_fades() {
        let p = Particle::new(Vec2::ZERO, Vec2::ZERO, 0.25);
        assert!((p.alpha(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(Particle::new(Vec2::ZERO, Vec2::ZERO, -0.1).alpha(0.5), 0.0);
        assert_eq!(Particle::new(Vec2::ZERO, Vec2::ZERO, 2.0).alpha(0.5), 1.0);
    }
}
