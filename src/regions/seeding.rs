//! Seed point placement and Lloyd relaxation.

use serde::Serialize;

use crate::error::Result;
use crate::island::Island;
use crate::random::SeededRng;

use super::partition::assign_nearest;
use super::round_half_up;

/// Stratified sampling is used up to this many requested points.
const STRATIFIED_LIMIT: usize = 20;
/// Spacing factors applied to `sqrt(land / count)`
const STRATIFIED_SPACING: f64 = 0.5;
const REJECTION_SPACING: f64 = 0.4;
const ATTEMPTS_PER_POINT: usize = 50;

/// Relaxation runs only when at least this share of requested points was placed.
const RELAX_MIN_SHARE: f64 = 0.8;
const RELAX_ROUNDS: usize = 2;
const RELAX_STEP: f64 = 0.5;

/// A land cell that grows into one region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SeedPoint {
    /// Placement order; stable for the lifetime of the point
    pub id: usize,
    pub x: usize,
    pub y: usize,
}

/// Place up to `count` seed points on land, spread apart by a spacing that
/// scales with the land area. May return fewer points than requested.
pub fn place_seed_points(
    island: &Island,
    rng: &mut SeededRng,
    count: usize,
    jitter: f64,
) -> Result<Vec<SeedPoint>> {
    let mut land = island.land_coordinates();
    if land.is_empty() || count == 0 {
        tracing::warn!(target: "islandgen::regions", count, "no land to place seed points on");
        return Ok(Vec::new());
    }

    tracing::debug!(
        target: "islandgen::regions",
        land_cells = land.len(),
        count,
        "placing seed points"
    );

    let area_spacing = (island.land_cells as f64 / count as f64).sqrt();
    let mut points: Vec<SeedPoint> = Vec::with_capacity(count);

    if count <= STRATIFIED_LIMIT {
        for i in (1..land.len()).rev() {
            let j = (rng.uniform() * (i + 1) as f64).floor() as usize;
            land.swap(i, j);
        }

        let stride = land.len() / count;
        let min_distance = area_spacing * STRATIFIED_SPACING;
        let mut i = 0;
        while i < count && i * stride < land.len() {
            let offset = rng.range(0.0, stride as f64 * jitter).floor() as usize;
            let (x, y) = land[(i * stride + offset).min(land.len() - 1)];
            if !too_close(&points, x, y, min_distance) {
                points.push(SeedPoint { id: points.len(), x, y });
            }
            i += 1;
        }
    }

    let mut attempts = 0;
    let min_distance = area_spacing * REJECTION_SPACING;
    while points.len() < count && attempts < count * ATTEMPTS_PER_POINT {
        attempts += 1;
        let (x, y) = land[rng.index(land.len())];
        if !too_close(&points, x, y, min_distance) {
            points.push(SeedPoint { id: points.len(), x, y });
        }
    }

    if points.len() as f64 >= count as f64 * RELAX_MIN_SHARE {
        relax_seed_points(&mut points, island, RELAX_ROUNDS)?;
    }

    tracing::debug!(
        target: "islandgen::regions",
        placed = points.len(),
        attempts,
        "seed points placed"
    );
    Ok(points)
}

fn too_close(points: &[SeedPoint], x: usize, y: usize, min_distance: f64) -> bool {
    points.iter().any(|p| {
        let dx = x as f64 - p.x as f64;
        let dy = y as f64 - p.y as f64;
        (dx * dx + dy * dy).sqrt() < min_distance
    })
}

/// Lloyd relaxation: move each point halfway toward the centroid of its
/// nearest-seed cell, but only onto land.
pub fn relax_seed_points(points: &mut [SeedPoint], island: &Island, rounds: usize) -> Result<()> {
    for _ in 0..rounds {
        let mut layout = assign_nearest(island, points);
        layout.compute_properties()?;

        for (point, region) in points.iter_mut().zip(&layout.regions) {
            if region.pixels == 0 {
                continue;
            }
            let (cx, cy) = region.centroid;
            let x = round_half_up(point.x as f64 + (cx as f64 - point.x as f64) * RELAX_STEP);
            let y = round_half_up(point.y as f64 + (cy as f64 - point.y as f64) * RELAX_STEP);
            if x < island.size && y < island.size && island.is_land(x, y) {
                point.x = x;
                point.y = y;
            }
        }
    }
    Ok(())
}
