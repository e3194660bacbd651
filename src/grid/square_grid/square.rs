use std::ops::{Add, Sub};

use glam::IVec2;

use crate::grid::{direction::Direction, offset_coordinate::OffsetCoordinate};

/// A square cell position, used for distance arithmetic between tiles.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Square(IVec2);

impl Square {
    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    /// Create a new [`Square`] from an [`OffsetCoordinate`].
    pub const fn from_offset(offset_coordinate: OffsetCoordinate) -> Self {
        Self(offset_coordinate.into_inner())
    }

    pub const fn x(&self) -> i32 {
        self.0.x
    }

    pub const fn y(&self) -> i32 {
        self.0.y
    }

    pub const fn into_inner(self) -> IVec2 {
        self.0
    }

    pub fn to_offset(self) -> OffsetCoordinate {
        OffsetCoordinate::new(self.x(), self.y())
    }

    /// Get [`Square`] at the given `direction` from `self`.
    pub fn neighbor(self, direction: Direction) -> Self {
        Self(self.0 + direction.offset())
    }

    #[inline]
    /// Computes the Manhattan length of the coordinate, i.e. its 4-neighbourhood distance from the origin.
    pub const fn length(self) -> i32 {
        self.0.x.abs() + self.0.y.abs()
    }

    #[inline]
    /// Computes the Chebyshev length of the coordinate, i.e. its 8-neighbourhood distance from the origin.
    pub const fn chebyshev_length(self) -> i32 {
        let x = self.0.x.abs();
        let y = self.0.y.abs();
        if x > y { x } else { y }
    }

    #[inline]
    /// Computes the Manhattan distance from `self` to `rhs`.
    pub fn distance_to(self, rhs: Self) -> i32 {
        (self - rhs).length()
    }

    #[inline]
    /// Computes the Chebyshev distance from `self` to `rhs`.
    pub fn chebyshev_distance_to(self, rhs: Self) -> i32 {
        (self - rhs).chebyshev_length()
    }

    /// Returns the squared Euclidean distance from `self` to `rhs`.
    pub fn squared_distance_to(self, rhs: Self) -> i32 {
        (self.0 - rhs.0).length_squared()
    }

    /// Return a [`Vec<Square>`] containing all [`Square`] whose Chebyshev distance from `self` is at most `distance`,
    /// including `self`. \
    /// The number of returned squares is equal to `(2 * distance + 1)²`.
    pub fn squares_in_distance(self, distance: u32) -> Vec<Self> {
        let radius = distance as i32;
        let mut square_list = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);

        for y in -radius..=radius {
            for x in -radius..=radius {
                square_list.push(self + Self::new(x, y));
            }
        }

        square_list
    }
}

impl Add for Square {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Square {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl From<[i32; 2]> for Square {
    #[inline]
    fn from(a: [i32; 2]) -> Self {
        Self(a.into())
    }
}

#[cfg(test)]
mod tests {
    use super::Square;

    #[test]
    fn distances() {
        let a = Square::new(2, 3);
        let b = Square::new(5, 1);
        assert_eq!(a.distance_to(b), 5);
        assert_eq!(a.chebyshev_distance_to(b), 3);
        assert_eq!(a.squared_distance_to(b), 13);
    }

    #[test]
    fn squares_in_distance_covers_the_block() {
        let squares = Square::new(0, 0).squares_in_distance(2);
        assert_eq!(squares.len(), 25);
        assert!(
            squares
                .iter()
                .all(|square| square.chebyshev_length() <= 2)
        );
    }
}
