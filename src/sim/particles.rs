//! Particle system
//!
//! Purely cosmetic. Levels and the orchestrator emit bursts on
//! discrete events; nothing in here feeds back into game logic.

use glam::Vec2;

/// Maximum live particles; oldest are evicted first at the cap.
pub const MAX_PARTICLES: usize = 512;

/// Visual flavor of a particle, picked by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Explosion burst (destroyed asteroid/obstacle)
    Burst,
    /// Rocket exhaust
    Exhaust,
    /// Keystroke feedback
    Spark,
    /// Impact debris (player hit)
    Debris,
}

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub max_age: f32,
    pub kind: ParticleKind,
}

/// All live particles. Owned by the orchestrator's `GameState`.
#[derive(Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Emit `count` particles of `kind` at `pos`.
    ///
    /// Spread is derived from a hash of `seed` so emission is
    /// deterministic for a given tick, the same trick the spawn code
    /// uses elsewhere in the sim.
    pub fn emit(&mut self, kind: ParticleKind, pos: Vec2, count: usize, seed: u64) {
        let (speed_lo, speed_hi, age_lo, age_hi) = match kind {
            ParticleKind::Burst => (6.0, 18.0, 0.4, 0.9),
            ParticleKind::Exhaust => (3.0, 8.0, 0.5, 1.2),
            ParticleKind::Spark => (2.0, 6.0, 0.15, 0.4),
            ParticleKind::Debris => (4.0, 12.0, 0.3, 0.8),
        };

        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let hash = (seed as u32)
                .wrapping_mul(2654435761)
                .wrapping_add(i as u32 * 7919);
            let r1 = (hash % 1000) as f32 / 1000.0;
            let r2 = ((hash >> 10) % 1000) as f32 / 1000.0;
            let r3 = ((hash >> 20) % 1000) as f32 / 1000.0;

            let angle = match kind {
                // Exhaust blows downward in a narrow cone
                ParticleKind::Exhaust => {
                    std::f32::consts::FRAC_PI_2 + (r1 - 0.5) * 0.6
                }
                _ => r1 * std::f32::consts::TAU,
            };
            let speed = speed_lo + r2 * (speed_hi - speed_lo);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                age: 0.0,
                max_age: age_lo + r3 * (age_hi - age_lo),
                kind,
            });
        }
    }

    /// Age and move particles, dropping the expired.
    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel *= 0.97;
            p.age += dt;
        }
        self.particles.retain(|p| p.age < p.max_age);
    }
}
