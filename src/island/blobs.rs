use std::f64::consts::PI;

use noise::NoiseFn;

use crate::coherent::fbm;
use crate::config::IslandParams;
use crate::random::SeededRng;

/// Reference grid size that all blob dimensions are expressed against.
pub const REFERENCE_SIZE: f64 = 1024.0;

/// Blend factor applied to every blob's weighted influence.
const BLOB_BLEND: f64 = 0.8;

const REFERENCE_SIZE_FRACTION: f64 = 0.35;
const REFERENCE_ELONGATION: f64 = 2.0;

/// An elliptical influence field contributing to the base island shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Blob {
    pub x: f64,
    pub y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Weight in (0, 1]
    pub strength: f64,
    /// Rotation in radians (peninsulas only)
    pub rotation: Option<f64>,
}

/// Place one dominant elongated blob near the center, 2-3 secondary blobs and
/// 1-2 rotated peninsula blobs further out.
pub fn place_blobs(rng: &mut SeededRng, size: usize, params: &IslandParams) -> Vec<Blob> {
    let scale = size as f64 / REFERENCE_SIZE;
    let center = size as f64 / 2.0;
    let size_factor = (params.size_fraction / REFERENCE_SIZE_FRACTION).sqrt();
    let stretch = (params.elongation / REFERENCE_ELONGATION).sqrt();
    let mut blobs = Vec::with_capacity(6);

    let x = center + rng.range(-50.0, 50.0) * scale;
    let y = center + rng.range(-100.0, 100.0) * scale;
    let radius_x = rng.range(200.0, 280.0) * scale * size_factor / stretch;
    let radius_y = rng.range(350.0, 450.0) * scale * size_factor * stretch;
    blobs.push(Blob {
        x,
        y,
        radius_x,
        radius_y,
        strength: 1.0,
        rotation: None,
    });

    let secondary_count = rng.int_range(2, 3);
    for _ in 0..secondary_count {
        let angle = rng.range(0.0, PI * 2.0);
        let distance = rng.range(80.0, 180.0) * scale;
        let radius_x = rng.range(100.0, 160.0) * scale * size_factor;
        let radius_y = rng.range(140.0, 200.0) * scale * size_factor;
        let strength = rng.range(0.7, 0.9);
        blobs.push(Blob {
            x: center + angle.cos() * distance,
            y: center + angle.sin() * distance,
            radius_x,
            radius_y,
            strength,
            rotation: None,
        });
    }

    let peninsula_count = rng.int_range(1, 2);
    for _ in 0..peninsula_count {
        let angle = rng.range(0.0, PI * 2.0);
        let distance = rng.range(180.0, 280.0) * scale;
        let radius_x = rng.range(50.0, 90.0) * scale * size_factor;
        let radius_y = rng.range(120.0, 200.0) * scale * size_factor;
        let strength = rng.range(0.5, 0.7);
        blobs.push(Blob {
            x: center + angle.cos() * distance,
            y: center + angle.sin() * distance,
            radius_x,
            radius_y,
            strength,
            rotation: Some(angle),
        });
    }

    blobs
}

impl Blob {
    /// Falloff in `[0, 1]`: 1 at the center, 0 past the noise-perturbed edge.
    pub fn influence(
        &self,
        x: f64,
        y: f64,
        noise: &impl NoiseFn<f64, 2>,
        coastline_noise: f64,
    ) -> f64 {
        let mut dx = x - self.x;
        let mut dy = y - self.y;

        if let Some(rotation) = self.rotation {
            let (sin, cos) = (-rotation).sin_cos();
            let rot_x = dx * cos - dy * sin;
            let rot_y = dx * sin + dy * cos;
            dx = rot_x;
            dy = rot_y;
        }

        let dist_x = dx / self.radius_x;
        let dist_y = dy / self.radius_y;
        let distance = (dist_x * dist_x + dist_y * dist_y).sqrt();

        // Edge noise is sampled along the bearing from the center.
        let angle = dy.atan2(dx);
        let edge_noise = fbm(
            noise,
            self.x * 0.01 + angle.cos() * 3.0,
            self.y * 0.01 + angle.sin() * 3.0,
            3,
            0.5,
            0.5,
        );

        let threshold = 1.0 + edge_noise * coastline_noise;
        if threshold <= 0.0 {
            return 0.0;
        }
        ((threshold - distance) / threshold).max(0.0)
    }

    /// Weighted contribution of this blob to the accumulated raster.
    pub fn weighted_influence(
        &self,
        x: f64,
        y: f64,
        noise: &impl NoiseFn<f64, 2>,
        coastline_noise: f64,
    ) -> f64 {
        self.influence(x, y, noise, coastline_noise) * self.strength * BLOB_BLEND
    }
}
