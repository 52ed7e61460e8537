//! Settlement site search.
//!
//! Distances are estimated by marching rays outward at fixed angular steps
//! rather than by an exact distance transform.

use std::f64::consts::TAU;

use crate::grid::Grid;
use crate::island::Island;
use crate::regions::{Region, RegionId};

const SEARCH_RADIUS: i64 = 30;
const MIN_BORDER_DISTANCE: u32 = 10;
const MIN_WATER_DISTANCE: u32 = 5;
const WATER_WEIGHT: f64 = 0.5;
/// Candidates scoring within this of the best compete on centroid distance.
const SCORE_TIE: f64 = 1.0;

const BORDER_MAX_RADIUS: u32 = 50;
const BORDER_ANGLE_STEP: f64 = 0.2;
const WATER_MAX_RADIUS: u32 = 30;
const WATER_ANGLE_STEP: f64 = 0.3;

/// Round half-up, as grid sampling does everywhere else.
fn round_cell(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Sample points on a ring of `radius` cells, stepping the angle from 0 by
/// `step` while it stays below a full turn.
fn ring(x: usize, y: usize, radius: u32, step: f64) -> impl Iterator<Item = (i64, i64)> {
    let (cx, cy, r) = (x as f64, y as f64, radius as f64);
    std::iter::successors(Some(0.0f64), move |a| Some(a + step))
        .take_while(|&a| a < TAU)
        .map(move |a| (round_cell(cx + a.cos() * r), round_cell(cy + a.sin() * r)))
}

/// Approximate distance to the nearest cell outside `region`. Leaving the grid
/// counts as reaching a border.
pub fn distance_to_border(map: &Grid<RegionId>, x: usize, y: usize, region: RegionId) -> u32 {
    for radius in 1..BORDER_MAX_RADIUS {
        for (nx, ny) in ring(x, y, radius, BORDER_ANGLE_STEP) {
            match map.get_signed(nx, ny) {
                Some(&id) if id == region => {}
                _ => return radius,
            }
        }
    }
    BORDER_MAX_RADIUS
}

/// Approximate distance to the nearest water cell. Off-grid samples are skipped.
pub fn distance_to_water(island: &Island, x: usize, y: usize) -> u32 {
    for radius in 1..WATER_MAX_RADIUS {
        for (nx, ny) in ring(x, y, radius, WATER_ANGLE_STEP) {
            if island.mask.get_signed(nx, ny) == Some(&false) {
                return radius;
            }
        }
    }
    WATER_MAX_RADIUS
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    x: usize,
    y: usize,
    score: f64,
    centroid_distance: f64,
}

/// Best site in the search window around the region centroid, or `None`
/// when no cell meets both distance thresholds.
pub fn find_site(island: &Island, map: &Grid<RegionId>, region: &Region) -> Option<(usize, usize)> {
    let (cx, cy) = (region.centroid.0 as i64, region.centroid.1 as i64);
    let mut candidates = Vec::new();

    for dy in -SEARCH_RADIUS..=SEARCH_RADIUS {
        for dx in -SEARCH_RADIUS..=SEARCH_RADIUS {
            let (x, y) = (cx + dx, cy + dy);
            if map.get_signed(x, y) != Some(&region.id) || !island.is_land_signed(x, y) {
                continue;
            }
            let (x, y) = (x as usize, y as usize);

            let border = distance_to_border(map, x, y, region.id);
            let water = distance_to_water(island, x, y);
            if border >= MIN_BORDER_DISTANCE && water >= MIN_WATER_DISTANCE {
                candidates.push(Candidate {
                    x,
                    y,
                    score: border as f64 + water as f64 * WATER_WEIGHT,
                    centroid_distance: ((dx * dx + dy * dy) as f64).sqrt(),
                });
            }
        }
    }

    let best = candidates.iter().map(|c| c.score).fold(f64::NEG_INFINITY, f64::max);
    candidates
        .iter()
        .filter(|c| best - c.score < SCORE_TIE)
        .fold(None::<Candidate>, |chosen, c| match chosen {
            Some(prev) if prev.centroid_distance <= c.centroid_distance => Some(prev),
            _ => Some(*c),
        })
        .map(|c| (c.x, c.y))
}

/// Site used when the search finds nothing: the centroid if the region owns
/// it, otherwise the owned cell closest to the centroid.
pub fn fallback_site(map: &Grid<RegionId>, region: &Region) -> Option<(usize, usize)> {
    let (cx, cy) = region.centroid;
    if cx < map.size() && cy < map.size() && *map.get(cx, cy) == region.id {
        return Some((cx, cy));
    }

    let bounds = region.bounds?;
    let mut nearest: Option<((usize, usize), u64)> = None;
    for y in bounds.min_y..=bounds.max_y {
        for x in bounds.min_x..=bounds.max_x {
            if *map.get(x, y) != region.id {
                continue;
            }
            let dx = x.abs_diff(cx) as u64;
            let dy = y.abs_diff(cy) as u64;
            let d = dx * dx + dy * dy;
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some(((x, y), d));
            }
        }
    }
    nearest.map(|(cell, _)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Bounds;
    use crate::regions::SeedPoint;

    fn square_world(size: usize, land_from: usize, land_to: usize) -> (Island, Grid<RegionId>) {
        let mut mask = Grid::new_with(size, false);
        let mut map = Grid::new_with(size, RegionId::UNASSIGNED);
        for y in land_from..land_to {
            for x in land_from..land_to {
                mask.set(x, y, true);
                map.set(x, y, RegionId(0));
            }
        }
        (Island::from_mask(mask), map)
    }

    fn region_with_centroid(centroid: (usize, usize), bounds: Option<Bounds>) -> Region {
        let seed = SeedPoint { id: 0, x: centroid.0, y: centroid.1 };
        let mut region = Region::new(RegionId(0), seed);
        region.centroid = centroid;
        region.bounds = bounds;
        region
    }

    #[test]
    fn test_water_distance() {
        let (island, _) = square_world(64, 10, 54);
        assert_eq!(distance_to_water(&island, 11, 32), 2);
        // The first ray (angle 0) leaves the land at x = 54.
        assert_eq!(distance_to_water(&island, 32, 32), 22);
        let (wide, _) = square_world(128, 10, 118);
        assert_eq!(distance_to_water(&wide, 64, 64), WATER_MAX_RADIUS);
        // Fully dry grid: off-grid samples never count.
        let dry = Island::from_mask(Grid::new_with(8, true));
        assert_eq!(distance_to_water(&dry, 0, 0), WATER_MAX_RADIUS);
    }

    #[test]
    fn test_border_distance_counts_grid_edge() {
        let map = Grid::new_with(16, RegionId(0));
        assert_eq!(distance_to_border(&map, 0, 8, RegionId(0)), 1);
        assert_eq!(distance_to_border(&map, 8, 8, RegionId(0)), 8);
    }

    #[test]
    fn test_site_prefers_center_of_square() {
        let (island, map) = square_world(128, 14, 114);
        let region = region_with_centroid((64, 64), None);
        let (x, y) = find_site(&island, &map, &region).unwrap();
        assert_eq!(*map.get(x, y), RegionId(0));
        assert!(x.abs_diff(64) <= 2 && y.abs_diff(64) <= 2, "site ({x}, {y})");
    }

    #[test]
    fn test_no_site_in_thin_region() {
        let (island, map) = square_world(64, 20, 34);
        let region = region_with_centroid((27, 27), None);
        assert_eq!(find_site(&island, &map, &region), None);
    }

    #[test]
    fn test_fallback_uses_owned_cell() {
        // C-shaped region whose centroid lies in the gap.
        let mut map = Grid::new_with(10, RegionId::UNASSIGNED);
        for y in 2..8 {
            map.set(2, y, RegionId(0));
        }
        for x in 2..8 {
            map.set(x, 2, RegionId(0));
            map.set(x, 7, RegionId(0));
        }
        let bounds = Bounds { min_x: 2, min_y: 2, max_x: 7, max_y: 7 };
        let region = region_with_centroid((4, 4), Some(bounds));
        let site = fallback_site(&map, &region).unwrap();
        assert_eq!(*map.get(site.0, site.1), RegionId(0));
        // (4, 2) and (2, 4) tie; scan order picks the first row.
        assert_eq!(site, (4, 2));

        let owned = region_with_centroid((2, 5), Some(bounds));
        assert_eq!(fallback_site(&map, &owned), Some((2, 5)));

        let empty = region_with_centroid((4, 4), None);
        assert_eq!(fallback_site(&map, &empty), None);
    }
}
