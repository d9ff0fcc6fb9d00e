use super::Rect;

/// Pixel occupancy of one packing attempt, stored row-major as `y * width + x`
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
    used: u64,
}

impl OccupancyGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let len = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(usize::MAX);
        Self {
            width,
            height,
            cells: vec![false; len],
            used: 0,
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[cfg(test)]
    fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)]
    }

    /// Place a `width` x `height` footprint at the first free position,
    /// scanning rows top to bottom and columns left to right.
    ///
    /// Returns the footprint rectangle, or `None` if it fits nowhere.
    pub fn insert(&mut self, width: u32, height: u32) -> Option<Rect> {
        let rect = self.find_position(width, height)?;
        self.fill(rect);
        Some(rect)
    }

    fn find_position(&self, width: u32, height: u32) -> Option<Rect> {
        if width > self.width || height > self.height {
            return None;
        }

        for y in 0..=self.height - height {
            let mut x = 0;
            while x <= self.width - width {
                let rect = Rect::new(x, y, width, height);
                match self.first_blocked_column(&rect) {
                    None => return Some(rect),
                    // Every candidate up to the blocked column overlaps it too
                    Some(column) => x = column + 1,
                }
            }
        }

        None
    }

    /// Rightmost occupied column inside `rect` on the first blocked row
    fn first_blocked_column(&self, rect: &Rect) -> Option<u32> {
        for y in rect.y..rect.y + rect.height {
            let row = self.index(0, y);
            let start = row + rect.x as usize;
            let end = start + rect.width as usize;
            if let Some(offset) = self.cells[start..end].iter().rposition(|&cell| cell) {
                #[expect(clippy::cast_possible_truncation, reason = "offset < rect.width")]
                let column = rect.x + offset as u32;
                return Some(column);
            }
        }
        None
    }

    fn fill(&mut self, rect: Rect) {
        for y in rect.y..rect.y + rect.height {
            let start = self.index(rect.x, y);
            let end = start + rect.width as usize;
            self.cells[start..end].fill(true);
        }
        self.used += rect.area();
    }

    /// Fraction of cells occupied (0.0 to 1.0)
    pub fn occupancy(&self) -> f64 {
        let total = u64::from(self.width) * u64::from(self.height);
        if total == 0 {
            return 0.0;
        }
        self.used as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_at_origin() {
        let mut grid = OccupancyGrid::new(128, 128);
        let rect = grid.insert(64, 64).unwrap();

        assert_eq!(rect, Rect::new(0, 0, 64, 64));
        assert!(grid.is_occupied(0, 0));
        assert!(grid.is_occupied(63, 63));
        assert!(!grid.is_occupied(64, 0));
        assert!(!grid.is_occupied(0, 64));
    }

    #[test]
    fn test_row_major_first_fit() {
        let mut grid = OccupancyGrid::new(100, 100);

        let a = grid.insert(60, 40).unwrap();
        let b = grid.insert(40, 20).unwrap();
        let c = grid.insert(50, 30).unwrap();

        assert_eq!(a, Rect::new(0, 0, 60, 40));
        // Fits to the right of `a` on the top row
        assert_eq!(b, Rect::new(60, 0, 40, 20));
        // Too wide for the gap beside `a`, so it drops below it
        assert_eq!(c, Rect::new(0, 40, 50, 30));
    }

    #[test]
    fn test_skips_past_blocked_columns_without_missing_gaps() {
        let mut grid = OccupancyGrid::new(10, 4);
        grid.fill(Rect::new(2, 0, 1, 1));
        grid.fill(Rect::new(6, 0, 1, 1));

        // 3-wide gap between the two blockers at x = 3..6
        let rect = grid.insert(3, 1).unwrap();
        assert_eq!(rect, Rect::new(3, 0, 3, 1));
    }

    #[test]
    fn test_too_large() {
        let mut grid = OccupancyGrid::new(128, 128);
        assert!(grid.insert(129, 10).is_none());
        assert!(grid.insert(10, 129).is_none());
        assert!(grid.insert(128, 128).is_some());
        assert!(grid.insert(1, 1).is_none());
    }

    #[test]
    fn test_zero_sized_footprint_always_fits() {
        let mut grid = OccupancyGrid::new(4, 4);
        grid.insert(4, 4).unwrap();
        assert_eq!(grid.insert(0, 0), Some(Rect::new(0, 0, 0, 0)));
    }

    #[test]
    fn test_no_overlap_and_in_bounds() {
        let mut grid = OccupancyGrid::new(64, 64);
        let bin = Rect::new(0, 0, 64, 64);
        let mut placed = Vec::new();
        for (w, h) in [(20, 20), (30, 10), (10, 30), (16, 16), (5, 40), (40, 5), (12, 12)] {
            placed.push(grid.insert(w, h).unwrap());
        }

        for (i, a) in placed.iter().enumerate() {
            assert!(bin.contains(a));
            for b in &placed[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_occupancy() {
        let mut grid = OccupancyGrid::new(10, 10);
        assert_eq!(grid.occupancy(), 0.0);
        grid.insert(5, 10).unwrap();
        assert!((grid.occupancy() - 0.5).abs() < f64::EPSILON);
    }
}
