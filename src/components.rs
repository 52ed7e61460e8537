//! Connected-component labeling over binary rasters.
//!
//! Flood fill runs on an explicit stack with a per-cell label raster, so a
//! single component may span the entire grid without deepening the call stack.

use crate::grid::{Grid, NEIGHBORS_4};

/// Label value for cells outside every component.
pub const NO_COMPONENT: u32 = u32::MAX;

/// Summary of one 4-connected component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub label: u32,
    pub cells: usize,
    /// True if any member lies on the outer ring of the grid
    pub touches_border: bool,
}

/// Per-cell component labels plus per-component statistics.
#[derive(Clone, Debug)]
pub struct ComponentMap {
    pub labels: Grid<u32>,
    pub components: Vec<Component>,
}

/// Label the 4-connected components of cells whose value equals `target`.
///
/// Components are numbered in scan order of their first cell.
pub fn label_components(mask: &Grid<bool>, target: bool) -> ComponentMap {
    let size = mask.size();
    let mut labels = Grid::new_with(size, NO_COMPONENT);
    let mut components = Vec::new();
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..size {
        for x in 0..size {
            if *mask.get(x, y) != target || *labels.get(x, y) != NO_COMPONENT {
                continue;
            }

            let label = components.len() as u32;
            let mut component = Component {
                label,
                cells: 0,
                touches_border: false,
            };

            labels.set(x, y, label);
            stack.push((x, y));

            while let Some((cx, cy)) = stack.pop() {
                component.cells += 1;
                if mask.is_border(cx, cy) {
                    component.touches_border = true;
                }

                for (dx, dy) in NEIGHBORS_4 {
                    let nx = cx as i64 + dx;
                    let ny = cy as i64 + dy;
                    if !mask.contains(nx, ny) {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    if *mask.get(nx, ny) == target && *labels.get(nx, ny) == NO_COMPONENT {
                        labels.set(nx, ny, label);
                        stack.push((nx, ny));
                    }
                }
            }

            components.push(component);
        }
    }

    ComponentMap { labels, components }
}
