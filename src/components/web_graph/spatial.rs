//! Uniform spatial grid for collision candidate queries.
//!
//! Nodes are bucketed by cell; with a cell size of at least twice the largest
//! radius, every overlapping pair shares a cell or sits in adjacent cells, so a
//! 3x3 neighborhood query finds all of them.

use std::collections::HashMap;

/// Bucket grid keyed by integer cell coordinates, storing node indices.
pub struct SpatialGrid {
	cell_size: f64,
	cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
	pub fn new(cell_size: f64) -> Self {
		Self {
			cell_size: usable_cell_size(cell_size),
			cells: HashMap::new(),
		}
	}

	/// Empties every bucket and switches to `cell_size`, keeping allocations.
	pub fn reset(&mut self, cell_size: f64) {
		self.cell_size = usable_cell_size(cell_size);
		self.cells.values_mut().for_each(Vec::clear);
	}

	pub fn insert(&mut self, index: usize, x: f64, y: f64) {
		let cell = self.cell_of(x, y);
		self.cells.entry(cell).or_default().push(index);
	}

	/// Calls `visit` for every index in the 3x3 block of cells around `(x, y)`.
	pub fn for_each_nearby(&self, x: f64, y: f64, mut visit: impl FnMut(usize)) {
		let (cx, cy) = self.cell_of(x, y);
		for dx in -1..=1 {
			for dy in -1..=1 {
				if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
					bucket.iter().copied().for_each(&mut visit);
				}
			}
		}
	}

	fn cell_of(&self, x: f64, y: f64) -> (i64, i64) {
		(
			(x / self.cell_size).floor() as i64,
			(y / self.cell_size).floor() as i64,
		)
	}
}

fn usable_cell_size(cell_size: f64) -> f64 {
	if cell_size.is_finite() && cell_size > 0.0 {
		cell_size
	} else {
		1.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn nearby(grid: &SpatialGrid, x: f64, y: f64) -> Vec<usize> {
		let mut found = Vec::new();
		grid.for_each_nearby(x, y, |i| found.push(i));
		found.sort_unstable();
		found
	}

	#[test]
	fn test_adjacent_cells_are_visited() {
		let mut grid = SpatialGrid::new(10.0);
		grid.insert(0, 5.0, 5.0);
		grid.insert(1, 15.0, 15.0);
		grid.insert(2, 35.0, 5.0);
		grid.insert(3, -5.0, -5.0);

		assert_eq!(nearby(&grid, 5.0, 5.0), vec![0, 1, 3]);
		assert_eq!(nearby(&grid, 35.0, 5.0), vec![2]);
	}

	#[test]
	fn test_reset_empties_grid_and_rescales() {
		let mut grid = SpatialGrid::new(10.0);
		grid.insert(0, 0.0, 0.0);
		grid.reset(100.0);
		assert!(nearby(&grid, 0.0, 0.0).is_empty());

		grid.insert(1, 5.0, 5.0);
		grid.insert(2, 150.0, 150.0);
		assert_eq!(nearby(&grid, 60.0, 60.0), vec![1, 2]);
	}

	#[test]
	fn test_degenerate_cell_size_falls_back() {
		let mut grid = SpatialGrid::new(0.0);
		grid.insert(4, 0.5, 0.5);
		assert_eq!(nearby(&grid, 0.2, 0.9), vec![4]);
	}
}
