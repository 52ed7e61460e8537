//! Island mask synthesis.
//!
//! Builds the binary land mask in nine fixed stages:
//! 1. Blob placement (one dominant ellipse plus secondary and peninsula blobs)
//! 2. Noise-perturbed blob accumulation into a float influence raster
//! 3. Continental modulation (large-scale noise and a north-south ridge)
//! 4. Domain warping
//! 5. Thresholding to a binary mask
//! 6. Small-island removal
//! 7. Small-hole filling
//! 8. Coastal detail
//! 9. Metrics
//!
//! Every stage expects the output of the previous one; none can be skipped.

pub mod blobs;
pub mod cleanup;
pub mod shaping;

use serde::Serialize;

use crate::coherent::CoherentNoise;
use crate::config::MapConfig;
use crate::grid::{extend_bounds, Bounds, Grid};
use crate::random::SeededRng;

pub use blobs::Blob;

/// A finished island: the land mask plus its derived metrics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Island {
    #[serde(skip)]
    pub mask: Grid<bool>,
    pub size: usize,
    pub land_cells: usize,
    /// Tight box around all land cells; `None` when there is no land
    pub bounds: Option<Bounds>,
    /// Land cells over total cells
    pub coverage: f64,
    pub effective_width: usize,
    pub effective_height: usize,
    /// Bounding-box height over width (> 1 means taller than wide)
    pub effective_elongation: f64,
}

impl Island {
    /// Derive all metrics from a finished mask.
    pub fn from_mask(mask: Grid<bool>) -> Self {
        let size = mask.size();
        let mut land_cells = 0;
        let mut bounds = None;
        for (x, y, &land) in mask.iter() {
            if land {
                land_cells += 1;
                extend_bounds(&mut bounds, x, y);
            }
        }

        let (effective_width, effective_height) =
            bounds.map_or((0, 0), |b| (b.width(), b.height()));
        let effective_elongation = if effective_width > 0 {
            effective_height as f64 / effective_width as f64
        } else {
            0.0
        };

        Self {
            mask,
            size,
            land_cells,
            bounds,
            coverage: land_cells as f64 / (size * size) as f64,
            effective_width,
            effective_height,
            effective_elongation,
        }
    }

    pub fn is_land(&self, x: usize, y: usize) -> bool {
        *self.mask.get(x, y)
    }

    /// Signed lookup treating everything off-grid as water.
    pub fn is_land_signed(&self, x: i64, y: i64) -> bool {
        self.mask.get_signed(x, y).copied().unwrap_or(false)
    }

    /// All land coordinates in row-major order.
    pub fn land_coordinates(&self) -> Vec<(usize, usize)> {
        let mut coords = Vec::with_capacity(self.land_cells);
        coords.extend(self.mask.iter().filter(|(_, _, land)| **land).map(|(x, y, _)| (x, y)));
        coords
    }
}

/// Run the full synthesis pipeline. The configuration must already be validated.
pub fn generate_island(config: &MapConfig, rng: &mut SeededRng) -> Island {
    let size = config.map_size;
    let params = &config.island;

    let noise = CoherentNoise::new(rng);

    let blobs = blobs::place_blobs(rng, size, params);
    for blob in &blobs {
        tracing::debug!(
            target: "islandgen::island",
            x = blob.x,
            y = blob.y,
            radius_x = blob.radius_x,
            radius_y = blob.radius_y,
            strength = blob.strength,
            rotated = blob.rotation.is_some(),
            "blob placed"
        );
    }

    let mut influence = shaping::accumulate_blobs(size, &blobs, &noise, params);
    shaping::log_stage("blobs", &influence);

    shaping::add_continental_features(&mut influence, &noise, params);
    shaping::log_stage("continental", &influence);

    let influence = shaping::apply_domain_warp(&influence, &noise);
    shaping::log_stage("warp", &influence);

    let mut mask = cleanup::binarize(&influence);
    drop(influence);
    tracing::debug!(target: "islandgen::island", land = mask.count_set(), "thresholded");

    cleanup::remove_small_islands(&mut mask, params.min_island_cells);
    cleanup::fill_small_holes(&mut mask, params.max_hole_cells);

    let mask = cleanup::add_coastal_detail(&mask, &noise);

    let island = Island::from_mask(mask);
    tracing::info!(
        target: "islandgen::island",
        land_cells = island.land_cells,
        coverage_pct = island.coverage * 100.0,
        elongation = island.effective_elongation,
        width = island.effective_width,
        height = island.effective_height,
        "island generated"
    );
    island
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: &str) -> MapConfig {
        MapConfig {
            map_size: 256,
            seed: seed.to_string(),
            ..MapConfig::default()
        }
    }

    #[test]
    fn test_metrics_from_mask() {
        let mut mask = Grid::new_with(10, false);
        mask.set(2, 1, true);
        mask.set(4, 7, true);
        mask.set(3, 3, true);
        let island = Island::from_mask(mask);
        assert_eq!(island.land_cells, 3);
        assert_eq!(island.bounds, Some(Bounds { min_x: 2, min_y: 1, max_x: 4, max_y: 7 }));
        assert_eq!(island.effective_width, 3);
        assert_eq!(island.effective_height, 7);
        assert!((island.coverage - 0.03).abs() < 1e-12);
        assert!((island.effective_elongation - 7.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_mask_metrics() {
        let island = Island::from_mask(Grid::new_with(8, false));
        assert_eq!(island.land_cells, 0);
        assert_eq!(island.bounds, None);
        assert_eq!(island.effective_elongation, 0.0);
        assert!(island.land_coordinates().is_empty());
    }

    #[test]
    fn test_generated_mask_consistent() {
        let config = small_config("consistency");
        let island = generate_island(&config, &mut SeededRng::new(&config.seed));
        assert_eq!(island.land_cells, island.mask.count_set());
        assert!(island.land_cells > 0);

        let b = island.bounds.unwrap();
        let mut edges = [false; 4];
        for (x, y, &land) in island.mask.iter() {
            if land {
                assert!(b.contains(x, y));
                edges[0] |= x == b.min_x;
                edges[1] |= x == b.max_x;
                edges[2] |= y == b.min_y;
                edges[3] |= y == b.max_y;
            }
        }
        assert!(edges.iter().all(|&e| e));
    }

    #[test]
    fn test_generation_deterministic() {
        let config = small_config("repeat");
        let a = generate_island(&config, &mut SeededRng::new(&config.seed));
        let b = generate_island(&config, &mut SeededRng::new(&config.seed));
        assert_eq!(a, b);
    }

    #[test]
    fn test_signed_lookup_off_grid_is_water() {
        let island = Island::from_mask(Grid::new_with(4, true));
        assert!(island.is_land_signed(0, 0));
        assert!(!island.is_land_signed(-1, 2));
        assert!(!island.is_land_signed(2, 4));
    }
}
