//! Water surface displacement.
//!
//! The surface is a disc tessellated into concentric rings. Each frame the
//! live height of every vertex is its rest height plus coherent noise
//! sampled at the rest position and the wave clock.

use crate::config::WaterConfig;
use crate::math::Vec3;
use noise::{NoiseFn, Simplex};
use rayon::prelude::*;
use std::f32::consts::TAU;

pub struct WaveField {
    noise: Simplex,
    rest: Vec<Vec3>,
    live: Vec<Vec3>,
    normals: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    clock: f32,
    noise_scale: f32,
    clock_rate: f32,
    noise_speed: f32,
    amplitude: f32,
}

impl WaveField {
    pub fn new(config: &WaterConfig, seed: u32) -> Self {
        let (rest, triangles) = build_disc(config.radius, config.rings, config.segments);
        let normals = vec![Vec3::Y; rest.len()];
        Self {
            noise: Simplex::new(seed),
            live: rest.clone(),
            rest,
            normals,
            triangles,
            clock: 0.0,
            noise_scale: config.noise_scale,
            clock_rate: config.clock_rate,
            noise_speed: config.noise_speed,
            amplitude: config.amplitude,
        }
    }

    /// Advance the wave clock by `delta_secs` and displace every vertex.
    pub fn update(&mut self, delta_secs: f32) {
        self.clock += delta_secs * self.clock_rate;
        self.displace();
        self.recompute_normals();
    }

    fn displace(&mut self) {
        let noise = &self.noise;
        let scale = self.noise_scale as f64;
        let t = (self.clock * self.noise_speed) as f64;
        let amplitude = self.amplitude;
        self.live
            .par_iter_mut()
            .zip(self.rest.par_iter())
            .for_each(|(live, rest)| {
                let n = noise.get([rest.x as f64 * scale, rest.z as f64 * scale, t]);
                let n = (n as f32).clamp(-1.0, 1.0);
                live.y = rest.y + n * amplitude;
            });
    }

    fn recompute_normals(&mut self) {
        self.normals.iter_mut().for_each(|n| *n = Vec3::ZERO);
        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let face = (self.live[b] - self.live[a]).cross(self.live[c] - self.live[a]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        self.normals
            .par_iter_mut()
            .for_each(|n| *n = n.try_normalize().unwrap_or(Vec3::Y));
    }

    /// Wave clock in seconds of wave time.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest
    }

    /// Displaced vertex positions, local to the water surface.
    pub fn positions(&self) -> &[Vec3] {
        &self.live
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.rest.len()
    }
}

/// Centre vertex first, then `rings` rings of `segments` vertices each.
/// Triangles wind counter-clockwise seen from +Y.
fn build_disc(radius: f32, rings: u32, segments: u32) -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let mut vertices = Vec::with_capacity(1 + (rings * segments) as usize);
    vertices.push(Vec3::ZERO);
    for ring in 1..=rings {
        let r = radius * ring as f32 / rings as f32;
        for s in 0..segments {
            let angle = TAU * s as f32 / segments as f32;
            vertices.push(Vec3::new(angle.cos() * r, 0.0, angle.sin() * r));
        }
    }

    let index = |ring: u32, s: u32| 1 + (ring - 1) * segments + (s % segments);
    let mut triangles = Vec::with_capacity((segments * (2 * rings - 1)) as usize);
    for s in 0..segments {
        triangles.push([0, index(1, s + 1), index(1, s)]);
    }
    for ring in 1..rings {
        for s in 0..segments {
            let a = index(ring, s);
            let b = index(ring, s + 1);
            let c = index(ring + 1, s);
            let d = index(ring + 1, s + 1);
            triangles.push([a, b, c]);
            triangles.push([b, d, c]);
        }
    }
    (vertices, triangles)
}
