use glam::IVec2;

use crate::{
    grid::{Direction, OffsetCoordinate, SquareGrid},
    random::MapRng,
};

/// Inclusive-exclusive rectangle an island shape grows in: `west..east` by `north..south`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IslandBounds {
    pub north: i32,
    pub south: i32,
    pub west: i32,
    pub east: i32,
}

impl IslandBounds {
    pub fn random_position(&self, random_number_generator: &mut MapRng) -> IVec2 {
        let x = self.west + random_number_generator.rand_below((self.east - self.west) as u32) as i32;
        let y = self.north + random_number_generator.rand_below((self.south - self.north) as u32) as i32;
        IVec2::new(x, y)
    }

    pub fn translate(&self, offset: IVec2) -> Self {
        Self {
            north: self.north + offset.y,
            south: self.south + offset.y,
            west: self.west + offset.x,
            east: self.east + offset.x,
        }
    }
}

/// The outline of an island, grown in a scratch mask the size of the map around its centre.
#[derive(Debug, Clone)]
pub struct IslandShape {
    grid: SquareGrid,
    mask: Vec<bool>,
    bounds: IslandBounds,
}

impl IslandShape {
    /// Cells kept free between the growth area and the map edge.
    const EDGE_MARGIN: i32 = 2;

    /// Grows a shape of exactly `mass` cells from the centre of the grid.
    ///
    /// Random cells inside the current bounds join the shape when they touch it through an
    /// edge, and the bounds grow whenever a cell joins near them. Once 90% of the cells are
    /// in, enclosed holes are filled first. Returns `None` when the shape could not reach
    /// `mass` within `mass * (2 + mass / 20) + 99` tries.
    pub fn grow(grid: SquareGrid, mass: u32, random_number_generator: &mut MapRng) -> Option<Self> {
        if mass == 0 {
            return None;
        }
        let width = grid.width() as i32;
        let height = grid.height() as i32;
        let center = IVec2::new(width / 2, height / 2);

        let mut shape = Self {
            grid,
            mask: vec![false; grid.area()],
            bounds: IslandBounds {
                north: center.y - 1,
                south: center.y + 2,
                west: center.x - 1,
                east: center.x + 2,
            },
        };
        shape.set(center);

        let mut remaining = mass - 1;
        let mut tries = mass as u64 * (2 + mass as u64 / 20) + 99;
        while remaining > 0 && tries > 0 {
            tries -= 1;
            let position = shape.bounds.random_position(random_number_generator);
            if !shape.contains(position) && shape.cardinal_count(position) > 0 {
                shape.set(position);
                remaining -= 1;

                let bounds = &mut shape.bounds;
                if position.y >= bounds.south - 1 && bounds.south < height - Self::EDGE_MARGIN {
                    bounds.south += 1;
                }
                if position.x >= bounds.east - 1 && bounds.east < width - Self::EDGE_MARGIN {
                    bounds.east += 1;
                }
                if position.y <= bounds.north && bounds.north > Self::EDGE_MARGIN {
                    bounds.north -= 1;
                }
                if position.x <= bounds.west && bounds.west > Self::EDGE_MARGIN {
                    bounds.west -= 1;
                }
            }

            if remaining > 0 && remaining < mass / 10 {
                remaining -= shape.fill_holes(remaining);
            }
        }

        (remaining == 0).then_some(shape)
    }

    /// Fills cells whose four neighbours are all in the shape, at most `limit` of them.
    fn fill_holes(&mut self, limit: u32) -> u32 {
        let mut filled = 0;
        for y in self.bounds.north..self.bounds.south {
            for x in self.bounds.west..self.bounds.east {
                let position = IVec2::new(x, y);
                if filled < limit && !self.contains(position) && self.cardinal_count(position) == 4
                {
                    self.set(position);
                    filled += 1;
                }
            }
        }
        filled
    }

    pub fn bounds(&self) -> IslandBounds {
        self.bounds
    }

    pub fn contains(&self, position: IVec2) -> bool {
        self.grid
            .offset_to_index(OffsetCoordinate(position))
            .is_some_and(|index| self.mask[index])
    }

    /// Iterates over the cells of the shape, row by row.
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        let bounds = self.bounds;
        (bounds.north..bounds.south)
            .flat_map(move |y| (bounds.west..bounds.east).map(move |x| IVec2::new(x, y)))
            .filter(|&position| self.contains(position))
    }

    pub fn mass(&self) -> usize {
        self.cells().count()
    }

    fn set(&mut self, position: IVec2) {
        if let Some(index) = self.grid.offset_to_index(OffsetCoordinate(position)) {
            self.mask[index] = true;
        }
    }

    fn cardinal_count(&self, position: IVec2) -> usize {
        Direction::CARDINAL
            .iter()
            .filter(|direction| self.contains(position + direction.offset()))
            .count()
    }
}
