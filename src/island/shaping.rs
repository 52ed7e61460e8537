//! Float-raster stages: blob accumulation, continental modulation and domain
//! warping. Each stage reads the raster produced by the one before it.

use noise::NoiseFn;

use crate::coherent::fbm;
use crate::config::IslandParams;
use crate::grid::Grid;

use super::blobs::{Blob, REFERENCE_SIZE};

/// Only cells already above this influence receive continental modulation
const CONTINENTAL_MIN_INFLUENCE: f32 = 0.1;
const CONTINENTAL_FREQUENCY: f64 = 0.003;
const CONTINENTAL_PERSISTENCE: f64 = 0.6;

// North-south ridge: sinusoid of amplitude 50 px swinging every ~628 rows
const RIDGE_SWING: f64 = 50.0;
const RIDGE_WAVE_FREQUENCY: f64 = 0.01;
const RIDGE_WIDTH: f64 = 100.0;
const RIDGE_PEAK: f64 = 0.2;

const WARP_FREQUENCY: f64 = 0.005;
const WARP_STRENGTH: f64 = 50.0;
const WARP_Y_OFFSET: f64 = 100.0;

/// Sum of every blob's weighted influence, clamped to at most 1.
pub fn accumulate_blobs(
    size: usize,
    blobs: &[Blob],
    noise: &impl NoiseFn<f64, 2>,
    params: &IslandParams,
) -> Grid<f32> {
    let mut influence = Grid::new_with(size, 0.0f32);

    for y in 0..size {
        for x in 0..size {
            let value: f64 = blobs
                .iter()
                .map(|blob| {
                    blob.weighted_influence(x as f64, y as f64, noise, params.coastline_noise)
                })
                .sum();
            influence.set(x, y, value.min(1.0) as f32);
        }
    }

    influence
}

/// Blend large-scale noise and a north-south ridge into cells that are
/// already land-ish. Reweights rather than multiplies, so the base shape
/// survives.
pub fn add_continental_features(
    influence: &mut Grid<f32>,
    noise: &impl NoiseFn<f64, 2>,
    params: &IslandParams,
) {
    let size = influence.size();
    let scale = size as f64 / REFERENCE_SIZE;
    let center = size as f64 / 2.0;

    for y in 0..size {
        for x in 0..size {
            let current = *influence.get(x, y);
            if current <= CONTINENTAL_MIN_INFLUENCE {
                continue;
            }

            let continental = fbm(
                noise,
                x as f64 * CONTINENTAL_FREQUENCY / scale,
                y as f64 * CONTINENTAL_FREQUENCY / scale,
                params.noise_octaves,
                CONTINENTAL_PERSISTENCE,
                1.0,
            );

            let swing = (y as f64 * RIDGE_WAVE_FREQUENCY / scale).sin();
            let ridge_x = center + swing * RIDGE_SWING * scale;
            let ridge_distance = (x as f64 - ridge_x).abs() / (RIDGE_WIDTH * scale);
            let ridge = (-ridge_distance * ridge_distance).exp() * RIDGE_PEAK;

            let value = current as f64 * 0.8 + continental * 0.1 + ridge * 0.1;
            influence.set(x, y, value as f32);
        }
    }
}

/// Resample the raster through a noise-driven displacement field.
///
/// Reads only the pre-warp raster. Cells whose source lands outside
/// `[0, size - 1)` keep their old value.
pub fn apply_domain_warp(influence: &Grid<f32>, noise: &impl NoiseFn<f64, 2>) -> Grid<f32> {
    let size = influence.size();
    let scale = size as f64 / REFERENCE_SIZE;
    let frequency = WARP_FREQUENCY / scale;
    let strength = WARP_STRENGTH * scale;
    let limit = (size - 1) as f64;
    let mut warped = influence.clone();

    for y in 0..size {
        for x in 0..size {
            let sx = x as f64 * frequency;
            let sy = y as f64 * frequency;
            let offset_x = fbm(noise, sx, sy, 2, 0.5, 1.0);
            let offset_y = fbm(noise, sx + WARP_Y_OFFSET, sy + WARP_Y_OFFSET, 2, 0.5, 1.0);

            let src_x = x as f64 + offset_x * strength;
            let src_y = y as f64 + offset_y * strength;

            if src_x >= 0.0 && src_x < limit && src_y >= 0.0 && src_y < limit {
                warped.set(x, y, influence.sample_bilinear(src_x, src_y));
            }
        }
    }

    warped
}

/// Summary statistics of an influence raster, for stage diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfluenceStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Fraction of cells with a positive value
    pub positive_fraction: f32,
}

pub fn influence_stats(influence: &Grid<f32>) -> InfluenceStats {
    let values = influence.as_slice();
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    let mut sum = 0.0f64;
    let mut positive = 0usize;

    for &v in values {
        min = min.min(v);
        max = max.max(v);
        sum += v as f64;
        if v > 0.0 {
            positive += 1;
        }
    }

    let n = values.len().max(1) as f64;
    InfluenceStats {
        min,
        max,
        mean: (sum / n) as f32,
        positive_fraction: (positive as f64 / n) as f32,
    }
}

/// Log raster statistics after a float stage.
pub fn log_stage(stage: &str, influence: &Grid<f32>) {
    let stats = influence_stats(influence);
    tracing::debug!(
        target: "islandgen::island",
        stage,
        min = stats.min,
        max = stats.max,
        mean = stats.mean,
        positive_pct = stats.positive_fraction * 100.0,
        "influence raster"
    );
}
