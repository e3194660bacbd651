use crate::{
    grid::SquareGrid,
    height_map::{HeightGenerator, MAX_HEIGHT, adjust_int_map, smooth_int_map},
    random::MapRng,
};

/// Smoothed noise height map.
///
/// Every cell starts with an independent random value, then the map is smoothed
/// [`RandomHeightMap::smoothing_passes`] times and rescaled by rank, so that the shore level
/// cuts off the requested share of land.
pub struct RandomHeightMap {
    grid: SquareGrid,
    smoothing_passes: u32,
    height_map: Vec<u32>,
}

impl RandomHeightMap {
    pub fn new(grid: SquareGrid, player_num: u32) -> Self {
        Self {
            grid,
            smoothing_passes: Self::smoothing_passes(grid, player_num),
            height_map: vec![0; grid.area()],
        }
    }

    /// `max(1, 1 + floor(sqrt(width * height) / 10) - floor(player_num / 4))`
    pub fn smoothing_passes(grid: SquareGrid, player_num: u32) -> u32 {
        let square_size = ((grid.area() as f64).sqrt() / 10.0).floor() as i64;
        (1 + square_size - (player_num / 4) as i64).max(1) as u32
    }
}

impl HeightGenerator for RandomHeightMap {
    fn generate(&mut self, random_number_generator: &mut MapRng) {
        let span = 1000 * self.smoothing_passes;
        let mut heights: Vec<i32> = (0..self.grid.area())
            .map(|_| random_number_generator.rand_below(span) as i32)
            .collect();

        for _ in 0..self.smoothing_passes {
            smooth_int_map(&mut heights, self.grid);
        }

        self.height_map = adjust_int_map(&heights, MAX_HEIGHT);
    }

    fn height_map(&self) -> &[u32] {
        &self.height_map
    }
}

#[cfg(test)]
mod tests {
    use super::RandomHeightMap;
    use crate::{
        grid::{Size, SquareGrid},
        height_map::{HeightGenerator, MAX_HEIGHT},
        random::MapRng,
    };

    #[test]
    fn smoothing_pass_count() {
        let grid = SquareGrid::new(Size::new(40, 40));
        // sqrt(1600) / 10 = 4
        assert_eq!(RandomHeightMap::smoothing_passes(grid, 2), 5);
        assert_eq!(RandomHeightMap::smoothing_passes(grid, 8), 3);
        assert_eq!(RandomHeightMap::smoothing_passes(grid, 40), 1);
    }

    #[test]
    fn heights_are_normalized() {
        let grid = SquareGrid::new(Size::new(30, 20));
        let mut random = RandomHeightMap::new(grid, 4);
        random.generate(&mut MapRng::from_seed_str("noise"));

        let heights = random.height_map();
        assert_eq!(heights.len(), 600);
        assert!(heights.iter().all(|&height| height <= MAX_HEIGHT));
        assert_eq!(heights.iter().copied().max(), Some(MAX_HEIGHT));
    }
}
