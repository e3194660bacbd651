use arrayvec::ArrayVec;

use super::{Size, direction::Direction, offset_coordinate::OffsetCoordinate};
use square::Square;

pub mod square;

/// A non-wrapping rectangular grid. Cells are stored row by row, so the index of
/// `(x, y)` is `y * width + x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareGrid {
    pub size: Size,
}

impl SquareGrid {
    pub const fn new(size: Size) -> Self {
        Self { size }
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.size.height
    }

    /// Returns the number of cells in the grid.
    #[inline]
    pub const fn area(&self) -> usize {
        self.size.area() as usize
    }

    /// Checks whether the offset coordinate lies inside the grid.
    #[inline]
    pub fn contains(&self, offset_coordinate: OffsetCoordinate) -> bool {
        let [x, y] = offset_coordinate.to_array();
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Converts an offset coordinate into a cell index, or `None` when it is outside the grid.
    #[inline]
    pub fn offset_to_index(&self, offset_coordinate: OffsetCoordinate) -> Option<usize> {
        self.contains(offset_coordinate).then(|| {
            offset_coordinate.y() as usize * self.width() as usize + offset_coordinate.x() as usize
        })
    }

    /// Converts a cell index into its offset coordinate.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `index` is outside the grid.
    #[inline]
    pub fn index_to_offset(&self, index: usize) -> OffsetCoordinate {
        debug_assert!(index < self.area(), "index is out of the range of the grid");
        let width = self.width() as usize;
        OffsetCoordinate::new((index % width) as i32, (index / width) as i32)
    }

    /// Returns the index of the cell next to `index` in `direction`, if it is inside the grid.
    #[inline]
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let square = Square::from_offset(self.index_to_offset(index)).neighbor(direction);
        self.offset_to_index(square.to_offset())
    }

    /// Returns the cells sharing an edge with `index`.
    pub fn cardinal_neighbors(&self, index: usize) -> ArrayVec<usize, 4> {
        Direction::CARDINAL
            .iter()
            .filter_map(|&direction| self.neighbor(index, direction))
            .collect()
    }

    /// Returns the cells sharing an edge or a corner with `index`.
    pub fn adjacent_neighbors(&self, index: usize) -> ArrayVec<usize, 8> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| self.neighbor(index, direction))
            .collect()
    }

    /// Returns every cell whose Chebyshev distance from `index` is at most `distance`, including `index`.
    pub fn cells_within_distance(&self, index: usize, distance: u32) -> Vec<usize> {
        Square::from_offset(self.index_to_offset(index))
            .squares_in_distance(distance)
            .into_iter()
            .filter_map(|square| self.offset_to_index(square.to_offset()))
            .collect()
    }

    /// Chebyshev distance between two cells.
    pub fn distance(&self, a: usize, b: usize) -> u32 {
        let a = Square::from_offset(self.index_to_offset(a));
        let b = Square::from_offset(self.index_to_offset(b));
        a.chebyshev_distance_to(b) as u32
    }

    /// Manhattan distance between two cells.
    pub fn manhattan_distance(&self, a: usize, b: usize) -> u32 {
        let a = Square::from_offset(self.index_to_offset(a));
        let b = Square::from_offset(self.index_to_offset(b));
        a.distance_to(b) as u32
    }

    /// Returns how many cells separate `index` from the nearest edge of the grid.
    pub fn distance_to_edge(&self, index: usize) -> u32 {
        let [x, y] = self.index_to_offset(index).to_array();
        let (x, y) = (x as u32, y as u32);
        x.min(y)
            .min(self.width() - 1 - x)
            .min(self.height() - 1 - y)
    }
}

#[cfg(test)]
mod tests {
    use super::SquareGrid;
    use crate::grid::{Direction, OffsetCoordinate, Size};

    #[test]
    fn neighbors_stop_at_the_edges() {
        let grid = SquareGrid::new(Size::new(4, 3));
        assert_eq!(grid.cardinal_neighbors(0).len(), 2);
        assert_eq!(grid.adjacent_neighbors(0).len(), 3);
        assert_eq!(grid.adjacent_neighbors(5).len(), 8);
        assert_eq!(grid.neighbor(0, Direction::North), None);
        assert_eq!(grid.neighbor(0, Direction::South), Some(4));
    }

    #[test]
    fn index_and_offset_agree() {
        let grid = SquareGrid::new(Size::new(7, 5));
        for index in 0..grid.area() {
            let offset = grid.index_to_offset(index);
            assert_eq!(grid.offset_to_index(offset), Some(index));
        }
        assert_eq!(grid.offset_to_index(OffsetCoordinate::new(7, 0)), None);
        assert_eq!(grid.offset_to_index(OffsetCoordinate::new(0, -1)), None);
    }

    #[test]
    fn distances_between_cells() {
        let grid = SquareGrid::new(Size::new(10, 10));
        assert_eq!(grid.distance(0, 99), 9);
        assert_eq!(grid.manhattan_distance(0, 99), 18);
        assert_eq!(grid.distance_to_edge(55), 4);
        assert_eq!(grid.cells_within_distance(0, 1).len(), 4);
    }
}
