/// A dense 2D tile grid, row-major, bounded on all four sides.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

/// Neighbor offsets in scan order: up, right, down, left.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a tilemap from a row-major data vector.
    /// The vector length must equal `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), width * height, "tilemap data length mismatch");
        Self { width, height, data }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// 4-connected neighbors inside the grid, enumerated in the fixed
    /// up/right/down/left order that the flood fills rely on.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(4);
        for (dx, dy) in DIRECTIONS {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if self.in_bounds(nx, ny) {
                result.push((nx as usize, ny as usize));
            }
        }
        result
    }

    /// Iterate over all cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates, row-major.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Number of cells matching a predicate.
    pub fn count_where<F: Fn(&T) -> bool>(&self, pred: F) -> usize {
        self.data.iter().filter(|v| pred(v)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_round_trip() {
        let mut map = Tilemap::new_with(4, 3, 0u32);
        map.set(3, 2, 7);
        assert_eq!(*map.get(3, 2), 7);
        assert_eq!(*map.get(0, 0), 0);
    }

    #[test]
    fn test_neighbors_are_clipped_at_edges() {
        let map = Tilemap::new_with(3, 3, 0u8);
        // Corner cell has two neighbors, center has four.
        assert_eq!(map.neighbors(0, 0).len(), 2);
        assert_eq!(map.neighbors(1, 1).len(), 4);
        // Order is up, right, down, left.
        assert_eq!(map.neighbors(1, 1), vec![(1, 2), (2, 1), (1, 0), (0, 1)]);
    }

    #[test]
    fn test_iter_is_row_major() {
        let mut map = Tilemap::new_with(2, 2, 0usize);
        for (i, (_, _, v)) in map.iter_mut().enumerate() {
            *v = i;
        }
        let coords: Vec<(usize, usize, usize)> =
            map.iter().map(|(x, y, v)| (x, y, *v)).collect();
        assert_eq!(coords, vec![(0, 0, 0), (1, 0, 1), (0, 1, 2), (1, 1, 3)]);
    }

    #[test]
    fn test_from_raw_preserves_layout() {
        let map = Tilemap::from_raw(2, 2, vec![1, 2, 3, 4]);
        assert_eq!(*map.get(0, 0), 1);
        assert_eq!(*map.get(1, 0), 2);
        assert_eq!(*map.get(0, 1), 3);
        assert_eq!(*map.get(1, 1), 4);
    }
}
