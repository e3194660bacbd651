use crate::{
    grid::SquareGrid,
    height_map::{HeightGenerator, MAX_HEIGHT, adjust_int_map},
    random::MapRng,
};

/// Recursive midpoint height map.
///
/// The map is split into `BLOCKS` x `BLOCKS` rectangles whose corners get random heights.
/// Every rectangle then sets the midpoints of its sides and its centre to the average of the
/// corners plus a random perturbation, and recurses on its four quarters with a perturbation
/// span of `2/3` of its own. Cells near the edge of the map are pushed down so that the map
/// is surrounded by sea.
pub struct FractalHeightMap {
    grid: SquareGrid,
    land_percent: u32,
    heights: Vec<i32>,
    height_map: Vec<u32>,
}

impl FractalHeightMap {
    /// Number of initial blocks along each axis.
    const BLOCKS: i32 = 5;
    /// Cells closer than this to the edge of the map are lowered.
    const EDGE_DISTANCE: u32 = 2;

    pub fn new(grid: SquareGrid, land_percent: u32) -> Self {
        Self {
            grid,
            land_percent,
            heights: vec![0; grid.area()],
            height_map: vec![0; grid.area()],
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.grid.width() as i32 + x) as usize
    }

    fn near_edge(&self, x: i32, y: i32) -> bool {
        self.grid.distance_to_edge(self.index(x, y)) < Self::EDGE_DISTANCE
    }

    /// Sets the cell unless it is near the edge or already set.
    fn set_midpoint(&mut self, x: i32, y: i32, value: i32) {
        let index = self.index(x, y);
        if !self.near_edge(x, y) && self.heights[index] == 0 {
            self.heights[index] = value;
        }
    }

    fn perturbation(step: i32, random_number_generator: &mut MapRng) -> i32 {
        random_number_generator.rand_below(step as u32) as i32 - step / 2
    }

    fn subdivide(
        &mut self,
        step: i32,
        (left, top, right, bottom): (i32, i32, i32, i32),
        random_number_generator: &mut MapRng,
    ) {
        if bottom - top <= 0 || right - left <= 0 || (bottom - top == 1 && right - left == 1) {
            return;
        }

        let top_left = self.heights[self.index(left, top)];
        let bottom_left = self.heights[self.index(left, bottom)];
        let top_right = self.heights[self.index(right, top)];
        let bottom_right = self.heights[self.index(right, bottom)];

        let middle_x = (left + right) / 2;
        let middle_y = (top + bottom) / 2;

        let value = (top_left + top_right) / 2 + Self::perturbation(step, random_number_generator);
        self.set_midpoint(middle_x, top, value);
        let value =
            (bottom_left + bottom_right) / 2 + Self::perturbation(step, random_number_generator);
        self.set_midpoint(middle_x, bottom, value);
        let value = (top_left + bottom_left) / 2 + Self::perturbation(step, random_number_generator);
        self.set_midpoint(left, middle_y, value);
        let value =
            (top_right + bottom_right) / 2 + Self::perturbation(step, random_number_generator);
        self.set_midpoint(right, middle_y, value);

        let value = (top_left + bottom_left + top_right + bottom_right) / 4
            + Self::perturbation(step, random_number_generator);
        self.set_midpoint(middle_x, middle_y, value);

        let step = 2 * step / 3;
        self.subdivide(step, (left, top, middle_x, middle_y), random_number_generator);
        self.subdivide(step, (left, middle_y, middle_x, bottom), random_number_generator);
        self.subdivide(step, (middle_x, top, right, middle_y), random_number_generator);
        self.subdivide(step, (middle_x, middle_y, right, bottom), random_number_generator);
    }
}

impl HeightGenerator for FractalHeightMap {
    fn generate(&mut self, random_number_generator: &mut MapRng) {
        let width = self.grid.width() as i32;
        let height = self.grid.height() as i32;
        // The last row and column are corners of the last blocks.
        let x_max = width - 1;
        let y_max = height - 1;

        let step = width + height;
        // The less land, the more the edges are avoided.
        let avoid_edge = (100 - self.land_percent as i32) * step / 100 + step / 3;

        self.heights.fill(0);
        // Midpoints are never set near the edge, so those cells start low.
        for index in 0..self.heights.len() {
            if self.grid.distance_to_edge(index) < Self::EDGE_DISTANCE {
                self.heights[index] = -avoid_edge;
            }
        }

        for block_x in 0..=Self::BLOCKS {
            for block_y in 0..=Self::BLOCKS {
                let x = block_x * x_max / Self::BLOCKS;
                let y = block_y * y_max / Self::BLOCKS;
                let mut value = random_number_generator.rand_below(2 * step as u32) as i32 - step;
                if self.near_edge(x, y) {
                    value -= avoid_edge;
                }
                let index = self.index(x, y);
                self.heights[index] = value;
            }
        }

        for block_x in 0..Self::BLOCKS {
            for block_y in 0..Self::BLOCKS {
                let bounds = (
                    block_x * x_max / Self::BLOCKS,
                    block_y * y_max / Self::BLOCKS,
                    (block_x + 1) * x_max / Self::BLOCKS,
                    (block_y + 1) * y_max / Self::BLOCKS,
                );
                self.subdivide(step, bounds, random_number_generator);
            }
        }

        for value in self.heights.iter_mut() {
            *value = 8 * *value + random_number_generator.rand_below(5) as i32 - 2;
        }

        self.height_map = adjust_int_map(&self.heights, MAX_HEIGHT);
    }

    fn height_map(&self) -> &[u32] {
        &self.height_map
    }
}

#[cfg(test)]
mod tests {
    use super::FractalHeightMap;
    use crate::{
        grid::{Size, SquareGrid},
        height_map::{HeightGenerator, MAX_HEIGHT},
        random::MapRng,
    };

    #[test]
    fn heights_are_normalized() {
        let grid = SquareGrid::new(Size::new(40, 30));
        let mut fractal = FractalHeightMap::new(grid, 30);
        fractal.generate(&mut MapRng::from_seed_str("fractal"));

        let heights = fractal.height_map();
        assert_eq!(heights.len(), 1200);
        assert!(heights.iter().all(|&height| height <= MAX_HEIGHT));
        assert_eq!(heights.iter().copied().max(), Some(MAX_HEIGHT));
    }

    #[test]
    fn edges_are_lower_than_the_interior() {
        let grid = SquareGrid::new(Size::new(60, 40));
        let mut fractal = FractalHeightMap::new(grid, 30);
        fractal.generate(&mut MapRng::from_seed_str("edges"));

        let heights = fractal.height_map();
        let (mut edge_sum, mut edge_count, mut inner_sum, mut inner_count) = (0u64, 0u64, 0u64, 0u64);
        for (index, &height) in heights.iter().enumerate() {
            if grid.distance_to_edge(index) == 0 {
                edge_sum += height as u64;
                edge_count += 1;
            } else if grid.distance_to_edge(index) >= 5 {
                inner_sum += height as u64;
                inner_count += 1;
            }
        }
        assert!(edge_sum / edge_count < inner_sum / inner_count);
    }

    #[test]
    fn same_seed_same_heights() {
        let grid = SquareGrid::new(Size::new(30, 30));
        let mut first = FractalHeightMap::new(grid, 40);
        let mut second = FractalHeightMap::new(grid, 40);
        first.generate(&mut MapRng::from_seed_str("twin"));
        second.generate(&mut MapRng::from_seed_str("twin"));
        assert_eq!(first.height_map(), second.height_map());
    }
}
