use serde::{Deserialize, Serialize};

/// Offsets of the 4-connected neighborhood (up, right, down, left).
pub const NEIGHBORS_4: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Offsets of the 8-connected neighborhood in row-major order.
#[rustfmt::skip]
pub const NEIGHBORS_8: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];

/// Inclusive axis-aligned bounding box over grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl Bounds {
    /// A box covering a single cell.
    pub fn at(x: usize, y: usize) -> Self {
        Self { min_x: x, min_y: y, max_x: x, max_y: y }
    }

    /// Grow to include `(x, y)`.
    pub fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Grow an optional box, starting it on the first cell.
pub fn extend_bounds(bounds: &mut Option<Bounds>, x: usize, y: usize) {
    match bounds {
        Some(b) => b.include(x, y),
        None => *bounds = Some(Bounds::at(x, y)),
    }
}

/// A square N×N raster stored row-major. Unlike a planetary map it does not
/// wrap at any edge: the outer ring is a hard boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    size: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![T::default(); size * size],
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_with(size: usize, value: T) -> Self {
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    /// Edge length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Signed lookup; `None` when the coordinate falls outside the grid.
    pub fn get_signed(&self, x: i64, y: i64) -> Option<&T> {
        if self.contains(x, y) {
            Some(&self.data[y as usize * self.size + x as usize])
        } else {
            None
        }
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    /// True for cells on the outermost ring.
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.size || y + 1 == self.size
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// In-bounds 4-connected neighbors.
    pub fn neighbors_4(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offset_neighbors(x, y, &NEIGHBORS_4)
    }

    /// In-bounds 8-connected neighbors.
    pub fn neighbors_8(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offset_neighbors(x, y, &NEIGHBORS_8)
    }

    fn offset_neighbors<'a>(
        &'a self,
        x: usize,
        y: usize,
        offsets: &'a [(i64, i64)],
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        offsets.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            self.contains(nx, ny).then(|| (nx as usize, ny as usize))
        })
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let size = self.size;
        self.data.iter().enumerate().map(move |(idx, val)| (idx % size, idx / size, val))
    }
}

impl Grid<bool> {
    /// Number of `true` cells.
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

impl Grid<f32> {
    /// Bilinear sample at a fractional position. Callers keep `x` and `y`
    /// within `[0, size - 1)`.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> f32 {
        let x0 = x.floor() as usize;
        let x1 = x.ceil() as usize;
        let y0 = y.floor() as usize;
        let y1 = y.ceil() as usize;

        let fx = x - x0 as f64;
        let fy = y - y0 as f64;

        let v00 = *self.get(x0, y0) as f64;
        let v10 = *self.get(x1, y0) as f64;
        let v01 = *self.get(x0, y1) as f64;
        let v11 = *self.get(x1, y1) as f64;

        let top = v00 * (1.0 - fx) + v10 * fx;
        let bottom = v01 * (1.0 - fx) + v11 * fx;
        (top * (1.0 - fy) + bottom * fy) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_clip_at_edges() {
        let grid = Grid::new_with(4, 0u8);
        assert_eq!(grid.neighbors_4(0, 0).count(), 2);
        assert_eq!(grid.neighbors_8(0, 0).count(), 3);
        assert_eq!(grid.neighbors_8(1, 1).count(), 8);
        assert_eq!(grid.neighbors_4(3, 2).count(), 3);
    }

    #[test]
    fn test_border_ring() {
        let grid = Grid::new_with(5, false);
        assert!(grid.is_border(0, 3));
        assert!(grid.is_border(4, 4));
        assert!(!grid.is_border(2, 2));
        assert!(grid.get_signed(-1, 0).is_none());
        assert!(grid.get_signed(4, 4).is_some());
    }

    #[test]
    fn test_bounds_grow() {
        let mut bounds = None;
        extend_bounds(&mut bounds, 4, 2);
        extend_bounds(&mut bounds, 1, 7);
        let b = bounds.unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (1, 2, 4, 7));
        assert_eq!((b.width(), b.height()), (4, 6));
        assert!(b.contains(2, 5));
        assert!(!b.contains(0, 5));
    }

    #[test]
    fn test_bilinear_midpoint() {
        let mut grid = Grid::new_with(3, 0.0f32);
        grid.set(1, 0, 1.0);
        grid.set(1, 1, 1.0);
        let v = grid.sample_bilinear(0.5, 0.5);
        assert!((v - 0.5).abs() < 1e-6);
        assert_eq!(grid.sample_bilinear(1.0, 1.0), 1.0);
    }
}
