use glam::IVec2;

use crate::{
    grid::{OffsetCoordinate, SquareGrid},
    height_map::{HeightGenerator, MAX_HEIGHT, adjust_int_map},
    random::MapRng,
};

/// A fracture point and the region it grows.
#[derive(Debug, Clone, Copy)]
pub struct FractureRegion {
    pub center: IVec2,
    pub elevation: i32,
    /// Top-left corner of the bounding box of the claimed cells.
    pub min: IVec2,
    /// Bottom-right corner of the bounding box of the claimed cells.
    pub max: IVec2,
}

/// Height map grown from fracture points.
///
/// Sink points with elevation `0` line the border of the map, and random interior points get
/// random elevations. Circles of increasing radius are drawn around every point in turn; the
/// first region whose circle reaches a cell claims it and gives it its elevation.
pub struct FractureHeightMap {
    grid: SquareGrid,
    regions: Vec<FractureRegion>,
    /// Region index + 1 for every cell, `0` while unclaimed.
    owner: Vec<usize>,
    height_map: Vec<u32>,
}

impl FractureHeightMap {
    /// Interior elevations at or above this level get fuzz and end strictly above it.
    pub const SHORE_LEVEL: i32 = 200;
    /// Spacing of the border sink points.
    const BORDER_SPACING: usize = 5;
    /// Distance of the border sink points and of the interior points from the edge.
    const BORDER_OFFSET: i32 = 3;

    pub fn new(grid: SquareGrid) -> Self {
        Self {
            grid,
            regions: Vec::new(),
            owner: vec![0; grid.area()],
            height_map: vec![0; grid.area()],
        }
    }

    /// `20 + 15 * floor(sqrt(width * height) / 10)`
    pub fn interior_point_count(grid: SquareGrid) -> usize {
        20 + 15 * ((grid.area() as f64).sqrt() / 10.0).floor() as usize
    }

    /// Land elevations move by up to two in either direction and stay above the shore.
    fn fuzz_elevation(elevation: i32, random_number_generator: &mut MapRng) -> i32 {
        if elevation < Self::SHORE_LEVEL {
            return elevation;
        }
        let elevation = elevation + random_number_generator.rand_below(5) as i32 - 2;
        elevation.max(Self::SHORE_LEVEL + 1)
    }

    /// The regions grown by the last call to [`HeightGenerator::generate`].
    pub fn regions(&self) -> &[FractureRegion] {
        &self.regions
    }

    fn border_points(&self) -> Vec<IVec2> {
        let width = self.grid.width() as i32;
        let height = self.grid.height() as i32;
        let offset = Self::BORDER_OFFSET;

        let along_x = (offset..width).step_by(Self::BORDER_SPACING);
        let along_y = (offset..height).step_by(Self::BORDER_SPACING);

        along_x
            .clone()
            .map(|x| IVec2::new(x, offset))
            .chain(along_x.map(|x| IVec2::new(x, height - offset)))
            .chain(along_y.clone().map(|y| IVec2::new(offset, y)))
            .chain(along_y.map(|y| IVec2::new(width - offset, y)))
            .collect()
    }

    /// Claims `cell` and its four neighbours for `region` where they are still unclaimed.
    fn claim(&mut self, cell: IVec2, region: usize) {
        for step in [
            IVec2::ZERO,
            IVec2::new(1, 0),
            IVec2::new(-1, 0),
            IVec2::new(0, 1),
            IVec2::new(0, -1),
        ] {
            let position = cell + step;
            let Some(index) = self.grid.offset_to_index(OffsetCoordinate(position)) else {
                continue;
            };
            if self.owner[index] == 0 {
                self.owner[index] = region + 1;
                let bounds = &mut self.regions[region];
                bounds.min = bounds.min.min(position);
                bounds.max = bounds.max.max(position);
            }
        }
    }

    /// Rasterizes a circle of radius `radius` around the region's centre with Bresenham's algorithm.
    fn draw_circle(&mut self, region: usize, radius: i32) {
        if radius == 0 {
            return;
        }
        let center = self.regions[region].center;
        let mut x = 0;
        let mut y = radius;
        let mut decision = 3 - 2 * radius;

        while y >= x {
            for octant in [
                IVec2::new(-x, -y),
                IVec2::new(-y, -x),
                IVec2::new(y, -x),
                IVec2::new(x, -y),
                IVec2::new(-x, y),
                IVec2::new(-y, x),
                IVec2::new(y, x),
                IVec2::new(x, y),
            ] {
                self.claim(center + octant, region);
            }

            if decision < 0 {
                decision += 4 * x + 6;
            } else {
                decision += 4 * (x - y) + 10;
                y -= 1;
            }
            x += 1;
        }
    }
}

impl HeightGenerator for FractureHeightMap {
    fn generate(&mut self, random_number_generator: &mut MapRng) {
        let width = self.grid.width();
        let height = self.grid.height();

        let border_points = self.border_points();
        let sink_count = border_points.len();

        let interior_points: Vec<IVec2> = (0..Self::interior_point_count(self.grid))
            .map(|_| {
                let x = random_number_generator.rand_below(width - 6) as i32 + 3;
                let y = random_number_generator.rand_below(height - 6) as i32 + 3;
                IVec2::new(x, y)
            })
            .collect();

        let far_corner = IVec2::new(width as i32 - 1, height as i32 - 1);
        self.regions = border_points
            .into_iter()
            .chain(interior_points)
            .map(|center| FractureRegion {
                center,
                elevation: random_number_generator.rand_below(1000) as i32,
                min: far_corner,
                max: IVec2::ZERO,
            })
            .collect();

        for region in &mut self.regions[..sink_count] {
            region.elevation = 0;
        }

        self.owner.fill(0);
        let max_radius = (width.max(height) / 2) as i32;
        let mut radius = 1;
        while radius < max_radius {
            for region in 0..self.regions.len() {
                self.draw_circle(region, radius);
            }
            // Large circles grow two steps at a time.
            radius += if radius > 3 { 2 } else { 1 };
        }

        let heights: Vec<i32> = self
            .owner
            .iter()
            .map(|&owner| {
                if owner == 0 {
                    return 0;
                }
                Self::fuzz_elevation(self.regions[owner - 1].elevation, random_number_generator)
            })
            .collect();

        self.height_map = adjust_int_map(&heights, MAX_HEIGHT);
    }

    fn height_map(&self) -> &[u32] {
        &self.height_map
    }
}
