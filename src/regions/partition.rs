//! Discrete Voronoi partition of the land mask.

use crate::config::RegionParams;
use crate::error::Result;
use crate::grid::Grid;
use crate::island::Island;
use crate::random::SeededRng;

use super::seeding::{place_seed_points, SeedPoint};
use super::{Region, RegionId, RegionLayout};

/// Assign every land cell to its nearest seed point by squared Euclidean
/// distance. Ties go to the earlier point; water stays unassigned.
pub fn assign_nearest(island: &Island, points: &[SeedPoint]) -> RegionLayout {
    let size = island.size;
    let mut region_map = Grid::new_with(size, RegionId::UNASSIGNED);

    if !points.is_empty() {
        for (x, y, &land) in island.mask.iter() {
            if !land {
                continue;
            }
            let mut best = i64::MAX;
            let mut nearest = 0;
            for (i, p) in points.iter().enumerate() {
                let dx = x as i64 - p.x as i64;
                let dy = y as i64 - p.y as i64;
                let d = dx * dx + dy * dy;
                if d < best {
                    best = d;
                    nearest = i;
                }
            }
            region_map.set(x, y, RegionId::from_index(nearest));
        }
    }

    let regions = points
        .iter()
        .enumerate()
        .map(|(i, &seed)| Region::new(RegionId::from_index(i), seed))
        .collect();

    RegionLayout { region_map, regions }
}

/// Remove every region owning a cell on the outer ring of the grid.
pub fn remove_edge_regions(layout: &mut RegionLayout) -> Result<usize> {
    let size = layout.region_map.size();
    let mut touches_edge = vec![false; layout.regions.len()];
    let last = size - 1;

    for i in 0..size {
        for (x, y) in [(i, 0), (i, last), (0, i), (last, i)] {
            let id = layout.region_at(x, y);
            if let Some(flag) = touches_edge.get_mut(id.index()) {
                *flag = true;
            }
        }
    }

    layout.retain_regions(|r| !touches_edge[r.id.index()])
}

/// Remove every region with fewer than `min_cells` cells.
pub fn remove_small_regions(layout: &mut RegionLayout, min_cells: usize) -> Result<usize> {
    let counts = layout.pixel_counts()?;
    layout.retain_regions(|r| counts[r.id.index()] >= min_cells)
}

/// Partition the island's land into regions.
pub fn partition(
    island: &Island,
    rng: &mut SeededRng,
    params: &RegionParams,
) -> Result<RegionLayout> {
    let requested = params.points_needed();
    tracing::info!(
        target: "islandgen::regions",
        land_cells = island.land_cells,
        target = params.target_regions,
        requested,
        "partitioning land"
    );

    let points = place_seed_points(island, rng, requested, params.seed_jitter)?;
    if points.len() < requested {
        tracing::warn!(
            target: "islandgen::regions",
            placed = points.len(),
            requested,
            "fewer seed points than requested"
        );
    }

    let mut layout = assign_nearest(island, &points);
    let edge_removed = remove_edge_regions(&mut layout)?;
    let small_removed = remove_small_regions(&mut layout, params.min_region_cells)?;
    layout.compute_properties()?;

    if layout.regions.is_empty() {
        tracing::warn!(target: "islandgen::regions", "no regions survived filtering");
    } else if layout.regions.len() < params.target_regions {
        tracing::warn!(
            target: "islandgen::regions",
            regions = layout.regions.len(),
            target = params.target_regions,
            "fewer regions than targeted"
        );
    }

    tracing::info!(
        target: "islandgen::regions",
        regions = layout.regions.len(),
        edge_removed,
        small_removed,
        "partition complete"
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn island_from(rows: &[&str]) -> Island {
        let mut mask = Grid::new_with(rows.len(), false);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                mask.set(x, y, c == '#');
            }
        }
        Island::from_mask(mask)
    }

    #[test]
    fn test_nearest_assignment_and_ties() {
        let island = island_from(&[
            "#####",
            "#####",
            "#####",
            "#####",
            ".....",
        ]);
        let points = [SeedPoint { id: 0, x: 0, y: 0 }, SeedPoint { id: 1, x: 4, y: 0 }];
        let layout = assign_nearest(&island, &points);
        assert_eq!(layout.region_at(1, 3), RegionId(0));
        assert_eq!(layout.region_at(3, 3), RegionId(1));
        // Equidistant column goes to the earlier seed.
        assert_eq!(layout.region_at(2, 1), RegionId(0));
        assert_eq!(layout.region_at(2, 4), RegionId::UNASSIGNED);
    }

    #[test]
    fn test_edge_regions_removed() {
        let island = island_from(&[
            "#.....",
            "......",
            "..##..",
            "..##..",
            "......",
            "......",
        ]);
        let points = [SeedPoint { id: 0, x: 0, y: 0 }, SeedPoint { id: 1, x: 3, y: 3 }];
        let mut layout = assign_nearest(&island, &points);
        assert_eq!(remove_edge_regions(&mut layout).unwrap(), 1);
        assert_eq!(layout.regions.len(), 1);
        assert_eq!(layout.regions[0].seed.id, 1);
        assert_eq!(layout.region_at(0, 0), RegionId::UNASSIGNED);
        assert_eq!(layout.region_at(2, 2), RegionId(0));
    }

    #[test]
    fn test_small_regions_removed() {
        let island = island_from(&[
            "......",
            ".####.",
            ".####.",
            ".####.",
            ".#....",
            "......",
        ]);
        let points = [SeedPoint { id: 0, x: 1, y: 4 }, SeedPoint { id: 1, x: 3, y: 2 }];
        let mut layout = assign_nearest(&island, &points);
        let counts = layout.pixel_counts().unwrap();
        assert_eq!(counts.iter().sum::<usize>(), 13);
        assert_eq!(remove_small_regions(&mut layout, 5).unwrap(), 1);
        assert_eq!(layout.regions.len(), 1);
        assert_eq!(layout.region_at(1, 4), RegionId::UNASSIGNED);
    }

    #[test]
    fn test_partition_on_block() {
        let mut mask = Grid::new_with(160, false);
        for y in 10..150 {
            for x in 20..140 {
                mask.set(x, y, true);
            }
        }
        let island = Island::from_mask(mask);
        let params = RegionParams {
            min_region_cells: 200,
            ..RegionParams::default()
        };
        let layout = partition(&island, &mut SeededRng::new("block"), &params).unwrap();
        assert!(!layout.regions.is_empty());
        layout.check_consistency(&island).unwrap();
        for region in &layout.regions {
            assert!(region.pixels >= 200);
            let (sx, sy) = (region.seed.x, region.seed.y);
            assert!(island.is_land(sx, sy));
        }
        // Land is total: no assigned/unassigned mismatch beyond removed regions.
        let assigned = layout.region_map.as_slice().iter().filter(|id| id.is_assigned()).count();
        assert_eq!(assigned, layout.regions.iter().map(|r| r.pixels).sum::<usize>());
    }
}
