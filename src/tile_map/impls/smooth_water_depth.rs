use enum_map::EnumMap;

use crate::{tile_component::Terrain, tile_map::TileMap};

/// Depth gained per tile of distance from land, in percent.
const DEPTH_STEP: u32 = 25;
/// Random depth added near land, in percent.
const DEPTH_NOISE: u32 = 15;

impl TileMap {
    /// Makes the sea shallow near land and deep away from it.
    ///
    /// - Water touching land (8-neighbourhood) becomes [`Terrain::Coast`].
    /// - Water two tiles from land becomes coast or ocean from a noisy depth.
    /// - Farther water keeps its depth class from [`TileMap::classify_land_and_ocean`] but is never coast.
    ///
    /// A final pass lets every tile that is not next to land adopt the most common ocean
    /// class of its neighbourhood, so that depth classes form continuous bands.
    pub fn smooth_water_depth(&mut self) {
        let distance_to_land = self.distance_map(|tile| tile.is_land(self), |_| true);

        for tile in self.all_tiles() {
            if tile.is_land(self) {
                continue;
            }
            let terrain = match distance_to_land[tile.index()] {
                1 => Terrain::Coast,
                2 => {
                    let depth = DEPTH_STEP + self.random_number_generator.rand_below(DEPTH_NOISE);
                    Self::ocean_for_depth(depth)
                }
                _ => match tile.terrain(self) {
                    Terrain::Coast => Terrain::Ocean,
                    terrain => terrain,
                },
            };
            tile.set_terrain(self, terrain);
        }

        let grid = self.grid;
        let smoothed: Vec<Terrain> = self
            .all_tiles()
            .map(|tile| {
                let terrain = tile.terrain(self);
                if !terrain.is_ocean() || distance_to_land[tile.index()] < 2 {
                    return terrain;
                }

                let mut counts: EnumMap<Terrain, u32> = EnumMap::default();
                counts[terrain] += 1;
                for neighbor in tile.neighbor_tiles(grid) {
                    let neighbor_terrain = neighbor.terrain(self);
                    if neighbor_terrain.is_ocean() {
                        counts[neighbor_terrain] += 1;
                    }
                }

                // Ties keep the current class.
                let mut best = terrain;
                for (candidate, &count) in counts.iter() {
                    if count > counts[best] {
                        best = candidate;
                    }
                }
                best
            })
            .collect();
        self.terrain_list = smoothed;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        tile::Tile,
        tile_component::Terrain,
        tile_map::tests::map_from_rows,
    };

    #[test]
    fn sea_next_to_land_is_coast_and_open_sea_is_not() {
        let row = "#...................";
        let mut tile_map = map_from_rows(&[row; 20]);
        tile_map.smooth_water_depth();

        for y in 0..20 {
            assert_eq!(Tile::new(y * 20 + 1).terrain(&tile_map), Terrain::Coast);
            for x in 5..20 {
                let terrain = Tile::new(y * 20 + x).terrain(&tile_map);
                assert!(terrain == Terrain::Ocean || terrain == Terrain::DeepOcean);
            }
        }
    }

    #[test]
    fn land_is_untouched() {
        let mut tile_map = map_from_rows(&["##....", "##....", "......", "......", "......"]);
        tile_map.smooth_water_depth();
        assert_eq!(tile_map.land_tile_count(), 4);
    }
}
