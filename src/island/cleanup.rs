//! Binary-mask stages: thresholding, morphological cleanup and coastal detail.

use noise::NoiseFn;

use crate::coherent::fbm;
use crate::components::label_components;
use crate::grid::{Grid, NEIGHBORS_8};

/// Influence above which a cell becomes land
pub const LAND_THRESHOLD: f32 = 0.05;

/// Components smaller than this share of the largest one are candidates for removal.
const MINOR_COMPONENT_SHARE: f64 = 0.1;

/// Chebyshev radius within which a cell counts as coastal
const COAST_RADIUS: i64 = 2;

const ISLET_NOISE_FREQUENCY: f64 = 0.05;
const ISLET_NOISE_CUTOFF: f64 = 0.4;
const INLET_NOISE_FREQUENCY: f64 = 0.02;
const INLET_NOISE_CUTOFF: f64 = -0.3;

pub fn binarize(influence: &Grid<f32>) -> Grid<bool> {
    let mut mask = Grid::new_with(influence.size(), false);
    for (dst, &v) in mask.as_mut_slice().iter_mut().zip(influence.as_slice()) {
        *dst = v > LAND_THRESHOLD;
    }
    mask
}

/// Delete every land component smaller than both `min_cells` and 10% of the
/// largest component. Returns the number of components removed.
pub fn remove_small_islands(mask: &mut Grid<bool>, min_cells: usize) -> usize {
    let land = label_components(mask, true);
    let Some(largest) = land.components.iter().map(|c| c.cells).max() else {
        return 0;
    };
    let floor = largest as f64 * MINOR_COMPONENT_SHARE;

    let doomed: Vec<bool> = land
        .components
        .iter()
        .map(|c| c.cells < min_cells && (c.cells as f64) < floor)
        .collect();

    for (cell, &label) in mask.as_mut_slice().iter_mut().zip(land.labels.as_slice()) {
        if *cell && doomed[label as usize] {
            *cell = false;
        }
    }

    let removed = doomed.iter().filter(|&&d| d).count();
    tracing::debug!(
        target: "islandgen::island",
        components = land.components.len(),
        removed,
        largest,
        "small islands removed"
    );
    removed
}

/// Convert enclosed water bodies smaller than `max_cells` to land. Water
/// touching the grid ring is never filled. Returns the number of holes filled.
pub fn fill_small_holes(mask: &mut Grid<bool>, max_cells: usize) -> usize {
    let water = label_components(mask, false);
    let fill: Vec<bool> = water
        .components
        .iter()
        .map(|c| !c.touches_border && c.cells < max_cells)
        .collect();

    for (cell, &label) in mask.as_mut_slice().iter_mut().zip(water.labels.as_slice()) {
        if !*cell && fill[label as usize] {
            *cell = true;
        }
    }

    let filled = fill.iter().filter(|&&f| f).count();
    tracing::debug!(target: "islandgen::island", filled, "small holes filled");
    filled
}

/// Roughen the coastline with small-scale noise. Near-coast water cells that
/// already touch land may become islets; near-coast land cells that already
/// touch water may become inlets. Reads the old mask and writes a new one.
pub fn add_coastal_detail(mask: &Grid<bool>, noise: &impl NoiseFn<f64, 2>) -> Grid<bool> {
    let size = mask.size();
    let mut detailed = mask.clone();

    for y in 1..size.saturating_sub(1) {
        for x in 1..size - 1 {
            if !is_near_coast(mask, x, y) {
                continue;
            }

            let is_land = *mask.get(x, y);
            let small = fbm(
                noise,
                x as f64 * ISLET_NOISE_FREQUENCY,
                y as f64 * ISLET_NOISE_FREQUENCY,
                2,
                0.5,
                1.0,
            );
            let medium = fbm(
                noise,
                x as f64 * INLET_NOISE_FREQUENCY,
                y as f64 * INLET_NOISE_FREQUENCY,
                2,
                0.5,
                1.0,
            );

            if small > ISLET_NOISE_CUTOFF && !is_land {
                if has_neighbor(mask, x, y, true) {
                    detailed.set(x, y, true);
                }
            } else if medium < INLET_NOISE_CUTOFF && is_land && has_neighbor(mask, x, y, false) {
                detailed.set(x, y, false);
            }
        }
    }

    detailed
}

/// True if the 5×5 neighborhood holds a cell of the other class.
fn is_near_coast(mask: &Grid<bool>, x: usize, y: usize) -> bool {
    let current = *mask.get(x, y);
    for dy in -COAST_RADIUS..=COAST_RADIUS {
        for dx in -COAST_RADIUS..=COAST_RADIUS {
            if dx == 0 && dy == 0 {
                continue;
            }
            if let Some(&v) = mask.get_signed(x as i64 + dx, y as i64 + dy) {
                if v != current {
                    return true;
                }
            }
        }
    }
    false
}

/// True if any 8-neighbor has value `land`.
pub fn has_neighbor(mask: &Grid<bool>, x: usize, y: usize, land: bool) -> bool {
    NEIGHBORS_8
        .iter()
        .any(|&(dx, dy)| mask.get_signed(x as i64 + dx, y as i64 + dy) == Some(&land))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coherent::CoherentNoise;
    use crate::random::SeededRng;

    fn square(size: usize, from: usize, to: usize) -> Grid<bool> {
        let mut mask = Grid::new_with(size, false);
        for y in from..to {
            for x in from..to {
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[test]
    fn test_binarize_threshold() {
        let mut raster = Grid::new_with(2, 0.0f32);
        raster.set(0, 0, 0.05);
        raster.set(1, 0, 0.051);
        let mask = binarize(&raster);
        assert!(!*mask.get(0, 0));
        assert!(*mask.get(1, 0));
    }

    #[test]
    fn test_removes_only_minor_islands() {
        let mut mask = square(64, 10, 50); // 1600 cells
        mask.set(2, 2, true); // 1-cell speck
        for x in 55..62 {
            for y in 55..62 {
                mask.set(x, y, true); // 49 cells: below 100 but also below 160
            }
        }
        let removed = remove_small_islands(&mut mask, 100);
        assert_eq!(removed, 2);
        assert!(!*mask.get(2, 2));
        assert!(!*mask.get(58, 58));
        assert_eq!(mask.count_set(), 1600);
    }

    #[test]
    fn test_keeps_component_above_share() {
        let mut mask = square(40, 5, 15); // 100 cells
        for x in 20..25 {
            for y in 20..24 {
                mask.set(x, y, true); // 20 cells >= 10% of 100
            }
        }
        assert_eq!(remove_small_islands(&mut mask, 100), 0);
        assert_eq!(mask.count_set(), 120);
    }

    #[test]
    fn test_fills_enclosed_holes_only() {
        let mut mask = square(32, 4, 28);
        mask.set(10, 10, false);
        mask.set(11, 10, false);
        let before = mask.count_set();
        assert_eq!(fill_small_holes(&mut mask, 50), 1);
        assert_eq!(mask.count_set(), before + 2);
        // Surrounding ocean touches the ring and stays water.
        assert!(!*mask.get(0, 0));
    }

    #[test]
    fn test_large_hole_kept() {
        let mut mask = square(32, 2, 30);
        for y in 8..20 {
            for x in 8..20 {
                mask.set(x, y, false);
            }
        }
        assert_eq!(fill_small_holes(&mut mask, 50), 0);
        assert!(!*mask.get(12, 12));
    }

    #[test]
    fn test_coastal_detail_only_touches_coast() {
        let noise = CoherentNoise::new(&mut SeededRng::new("coast"));
        let mask = square(96, 20, 76);
        let detailed = add_coastal_detail(&mask, &noise);
        for y in 0..96 {
            for x in 0..96 {
                if detailed.get(x, y) != mask.get(x, y) {
                    assert!(is_near_coast(&mask, x, y));
                }
            }
        }
        // Deep interior and open ocean are untouched.
        assert!(*detailed.get(48, 48));
        assert!(!*detailed.get(3, 3));
    }
}
