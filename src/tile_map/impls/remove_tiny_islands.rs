use enum_map::EnumMap;

use crate::{
    tile_component::{RiverMask, Terrain},
    tile_map::TileMap,
};

impl TileMap {
    /// Sinks every land body with fewer than `min_island_size` tiles.
    ///
    /// A sunk tile takes the most common water terrain around it ([`Terrain::Coast`] when
    /// the neighbours disagree evenly) and its height is dropped just below the shore level,
    /// so later elevation-based steps treat it as water too. Its river, if any, is removed.
    pub fn remove_tiny_islands(&mut self, min_island_size: u32) {
        let grid = self.grid;
        let tiny_islands: Vec<Vec<_>> = self
            .connected_bodies(|tile| tile.is_land(self))
            .into_iter()
            .filter(|body| body.len() < min_island_size as usize)
            .collect();

        for &tile in tiny_islands.iter().flatten() {
            let mut counts: EnumMap<Terrain, u32> = EnumMap::default();
            for neighbor in tile.neighbor_tiles(grid) {
                let terrain = neighbor.terrain(self);
                if terrain.is_water() {
                    counts[terrain] += 1;
                }
            }

            let mut water = Terrain::Coast;
            for (terrain, &count) in counts.iter() {
                if count > counts[water] {
                    water = terrain;
                }
            }

            tile.set_terrain(self, water);
            tile.set_placed(self, false);
            self.river_mask_list[tile.index()] = RiverMask::empty();
            self.height_list[tile.index()] = self.shore_level.saturating_sub(1);
        }

        tracing::debug!(removed = tiny_islands.len(), "tiny islands removed");
    }
}

#[cfg(test)]
mod tests {
    use crate::{tile::Tile, tile_component::Terrain, tile_map::tests::map_from_rows};

    #[test]
    fn single_tiles_sink_and_larger_islands_stay() {
        let mut tile_map = map_from_rows(&[
            "......",
            ".#....",
            "......",
            "...##.",
            "......",
        ]);
        for height in tile_map.height_list.iter_mut() {
            *height = 900;
        }
        tile_map.remove_tiny_islands(2);

        let sunk = Tile::new(7);
        assert!(sunk.is_water(&tile_map));
        assert!(sunk.height(&tile_map) < tile_map.shore_level);
        assert_eq!(tile_map.land_tile_count(), 2);
    }

    #[test]
    fn island_in_a_lake_becomes_lake() {
        let mut tile_map = map_from_rows(&["...", ".#.", "..."]);
        for tile in tile_map.all_tiles() {
            if tile.is_water(&tile_map) {
                tile.set_terrain(&mut tile_map, Terrain::Lake);
            }
        }
        tile_map.remove_tiny_islands(2);
        assert_eq!(Tile::new(4).terrain(&tile_map), Terrain::Lake);
    }
}
