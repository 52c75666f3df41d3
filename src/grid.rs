//! Fixed-size 2D scalar field with row-major storage.

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// How neighboring cells are found from a flat index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Adjacency {
    /// Strict four-connectivity: `x±1` stays inside `[0, width)`, `y±1` inside `[0, height)`.
    #[default]
    Cardinal,
    /// Only checks that `index±1` / `index±width` lands inside the cell buffer.
    /// Cells at the start or end of a row see the last/first cell of the
    /// adjacent row as a neighbor. Matches the legacy output.
    FlatIndex,
}

impl std::fmt::Display for Adjacency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cardinal => write!(f, "cardinal"),
            Self::FlatIndex => write!(f, "flat-index"),
        }
    }
}

/// Cardinal direction. Order matches the neighbor order returned by
/// [`Grid::neighbors`]: down (`+width`), up (`-width`), right (`+1`), left (`-1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Up,
    Right,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Down, Direction::Up, Direction::Right, Direction::Left];

    pub fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }

    /// Position of this direction inside [`Direction::ALL`].
    pub fn slot(self) -> usize {
        match self {
            Self::Down => 0,
            Self::Up => 1,
            Self::Right => 2,
            Self::Left => 3,
        }
    }
}

/// A 2D grid of values indexed `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Panics on a zero dimension; see [`Grid::try_new`].
    pub fn new(width: usize, height: usize) -> Self {
        Self::try_new(width, height).unwrap_or_else(|err| panic!("{}", err))
    }

    pub fn try_new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::try_new_with(width, height, T::default())
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self::try_new_with(width, height, value).unwrap_or_else(|err| panic!("{}", err))
    }

    pub fn try_new_with(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![value; width * height],
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    pub fn coords_to_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn index_to_coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Panics if `(x, y)` is outside the grid.
    fn checked_index(&self, x: usize, y: usize) -> usize {
        assert!(
            self.contains(x, y),
            "coordinates ({}, {}) out of bounds for {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        self.coords_to_index(x, y)
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.cells[self.checked_index(x, y)]
    }

    pub fn try_get(&self, x: usize, y: usize) -> Option<&T> {
        if self.contains(x, y) {
            Some(&self.cells[self.coords_to_index(x, y)])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.checked_index(x, y);
        self.cells[idx] = value;
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Swap in a new buffer of the same length, returning the old one.
    pub fn replace_cells(&mut self, cells: Vec<T>) -> Vec<T> {
        assert_eq!(cells.len(), self.cells.len(), "replacement buffer has the wrong length");
        std::mem::replace(&mut self.cells, cells)
    }

    /// The neighbor of `index` in direction `dir`, if any.
    pub fn neighbor(&self, index: usize, dir: Direction, adjacency: Adjacency) -> Option<usize> {
        match adjacency {
            Adjacency::Cardinal => {
                let (x, y) = self.index_to_coords(index);
                match dir {
                    Direction::Down if y + 1 < self.height => Some(index + self.width),
                    Direction::Up if y > 0 => Some(index - self.width),
                    Direction::Right if x + 1 < self.width => Some(index + 1),
                    Direction::Left if x > 0 => Some(index - 1),
                    _ => None,
                }
            }
            Adjacency::FlatIndex => {
                let candidate = match dir {
                    Direction::Down => index.checked_add(self.width),
                    Direction::Up => index.checked_sub(self.width),
                    Direction::Right => index.checked_add(1),
                    Direction::Left => index.checked_sub(1),
                };
                candidate.filter(|&j| self.contains_index(j))
            }
        }
    }

    /// Up to four neighbor indices of `index`, in [`Direction::ALL`] order.
    pub fn neighbors(&self, index: usize, adjacency: Adjacency) -> Vec<usize> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.neighbor(index, dir, adjacency))
            .collect()
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }
}

impl<T> Grid<T>
where
    T: Clone + std::ops::AddAssign,
{
    pub fn increment(&mut self, x: usize, y: usize, delta: T) {
        let idx = self.checked_index(x, y);
        self.cells[idx] += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_coords_roundtrip() {
        let grid: Grid<f64> = Grid::new(7, 3);
        for y in 0..3 {
            for x in 0..7 {
                let i = grid.coords_to_index(x, y);
                assert_eq!(grid.index_to_coords(i), (x, y));
            }
        }
        // Non-square grid: inverse must divide by width, not height
        assert_eq!(grid.index_to_coords(8), (1, 1));
    }

    #[test]
    fn test_get_set_increment() {
        let mut grid = Grid::new_with(4, 2, 0.0f64);
        grid.set(3, 1, 2.5);
        grid.increment(3, 1, 1.5);
        assert_eq!(*grid.get(3, 1), 4.0);
        assert_eq!(grid.as_slice()[7], 4.0);
        assert_eq!(grid.try_get(4, 0), None);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds_panics() {
        let grid: Grid<f64> = Grid::new(4, 4);
        grid.get(4, 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_increment_out_of_bounds_panics() {
        let mut grid: Grid<f64> = Grid::new(4, 4);
        grid.increment(0, 9, 1.0);
    }

    #[test]
    fn test_try_new_rejects_empty_dimensions() {
        let grid = Grid::<f64>::try_new(3, 2).unwrap();
        assert_eq!(grid.len(), 6);
        assert_eq!(
            Grid::<f64>::try_new(0, 2),
            Err(GridError::EmptyDimensions { width: 0, height: 2 })
        );
        assert_eq!(
            Grid::try_new_with(4, 0, 1.0f64),
            Err(GridError::EmptyDimensions { width: 4, height: 0 })
        );
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_new_panics_on_empty_dimensions() {
        let _grid: Grid<f64> = Grid::new(0, 0);
    }

    #[test]
    fn test_cardinal_neighbors_respect_row_edges() {
        let grid: Grid<f64> = Grid::new(3, 3);
        // Right edge of first row: no wrap to (0, 1)
        assert_eq!(grid.neighbors(2, Adjacency::Cardinal), vec![5, 1]);
        // Centre has all four
        assert_eq!(grid.neighbors(4, Adjacency::Cardinal), vec![7, 1, 5, 3]);
        // Start of second row: no wrap to (2, 0)
        assert_eq!(grid.neighbors(3, Adjacency::Cardinal), vec![6, 0, 4]);
    }

    #[test]
    fn test_flat_index_neighbors_wrap_rows() {
        let grid: Grid<f64> = Grid::new(3, 3);
        // (2, 0) sees (0, 1) through index + 1
        assert_eq!(grid.neighbors(2, Adjacency::FlatIndex), vec![5, 3, 1]);
        // (0, 1) sees (2, 0) through index - 1
        assert_eq!(grid.neighbors(3, Adjacency::FlatIndex), vec![6, 0, 4, 2]);
        // Last cell only loses the out-of-range candidates
        assert_eq!(grid.neighbors(8, Adjacency::FlatIndex), vec![5, 7]);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let grid: Grid<f64> = Grid::new(5, 4);
        for adjacency in [Adjacency::Cardinal, Adjacency::FlatIndex] {
            for i in 0..grid.len() {
                for dir in Direction::ALL {
                    if let Some(j) = grid.neighbor(i, dir, adjacency) {
                        assert_eq!(grid.neighbor(j, dir.opposite(), adjacency), Some(i));
                    }
                }
            }
        }
    }
}
