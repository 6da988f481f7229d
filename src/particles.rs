//! Drifting background particle field.
//!
//! A fixed set of particles wanders across the window with toroidal
//! wraparound. While idle, nearby pairs are linked with faint lines; once
//! authorized the field accelerates and the links disappear.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::params::ParticleParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Pixels per reference frame
    pub velocity: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

pub struct ParticleField {
    params: ParticleParams,
    particles: Vec<Particle>,
    size: Vec2,
    authorized: bool,
}

impl ParticleField {
    /// Seed `params.count` particles inside a `width` × `height` surface
    pub fn new(params: ParticleParams, width: f32, height: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let size = Vec2::new(width.max(1.0), height.max(1.0));
        let speed = params.max_speed_px;
        let (min_radius, max_radius) = params.radius_range_px;

        let particles = (0..params.count)
            .map(|_| Particle {
                position: Vec2::new(rng.gen_range(0.0..size.x), rng.gen_range(0.0..size.y)),
                velocity: Vec2::new(rng.gen_range(-speed..speed), rng.gen_range(-speed..speed)),
                radius: rng.gen_range(min_radius..max_radius),
                opacity: rng.gen_range(0.0..params.max_opacity),
            })
            .collect();

        Self {
            params,
            particles,
            size,
            authorized: false,
        }
    }

    pub fn set_authorized(&mut self, authorized: bool) {
        self.authorized = authorized;
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Follow a window resize; particles are re-wrapped into the new bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width.max(1.0), height.max(1.0));
        let size = self.size;
        for particle in &mut self.particles {
            particle.position = wrap(particle.position, size);
        }
    }

    /// Current velocity multiplier
    pub fn speed_factor(&self) -> f32 {
        if self.authorized {
            self.params.accelerated_factor
        } else {
            1.0
        }
    }

    /// Advance by `dt_s` seconds
    pub fn update(&mut self, dt_s: f32) {
        let frames = dt_s / self.params.reference_frame_s;
        let factor = self.speed_factor() * frames;
        let size = self.size;
        for particle in &mut self.particles {
            particle.position = wrap(particle.position + particle.velocity * factor, size);
        }
    }

    /// Index pairs closer than the link distance; empty while authorized
    pub fn links(&self) -> Vec<(usize, usize)> {
        if self.authorized {
            return Vec::new();
        }
        let max_sq = self.params.link_distance_px * self.params.link_distance_px;
        let mut links = Vec::new();
        for (a, pa) in self.particles.iter().enumerate() {
            for (offset, pb) in self.particles[a + 1..].iter().enumerate() {
                if pa.position.distance_squared(pb.position) < max_sq {
                    links.push((a, a + 1 + offset));
                }
            }
        }
        links
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }
}

/// Wrap into [0, w) × [0, h)
fn wrap(position: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(wrap_axis(position.x, size.x), wrap_axis(position.y, size.y))
}

fn wrap_axis(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
