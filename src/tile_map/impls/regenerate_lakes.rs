use crate::{tile_component::Terrain, tile_map::TileMap};

impl TileMap {
    /// Turns every body of water with at most `lake_max_area_size` tiles into [`Terrain::Lake`].
    ///
    /// Bodies are connected through cardinal steps, so two seas touching only at a corner are
    /// measured separately.
    pub fn regenerate_lakes(&mut self, lake_max_area_size: u32) {
        let lakes: Vec<Vec<_>> = self
            .connected_bodies(|tile| tile.is_water(self))
            .into_iter()
            .filter(|body| body.len() <= lake_max_area_size as usize)
            .collect();

        for tile in lakes.iter().flatten() {
            tile.set_terrain(self, Terrain::Lake);
        }

        tracing::debug!(lakes = lakes.len(), "lakes regenerated");
    }
}

#[cfg(test)]
mod tests {
    use crate::{tile::Tile, tile_component::Terrain, tile_map::tests::map_from_rows};

    #[test]
    fn enclosed_pond_becomes_a_lake() {
        let mut tile_map = map_from_rows(&[
            "#####.......",
            "#.#.#.......",
            "#####.......",
            "............",
        ]);
        tile_map.regenerate_lakes(9);

        assert_eq!(Tile::new(13).terrain(&tile_map), Terrain::Lake);
        assert_eq!(Tile::new(15).terrain(&tile_map), Terrain::Lake);
        assert_eq!(Tile::new(11).terrain(&tile_map), Terrain::DeepOcean);
    }

    #[test]
    fn limit_is_inclusive() {
        let mut tile_map = map_from_rows(&["#####", "#..##", "#####"]);
        tile_map.regenerate_lakes(2);
        assert_eq!(Tile::new(6).terrain(&tile_map), Terrain::Lake);

        let mut tile_map = map_from_rows(&["#####", "#..##", "#####"]);
        tile_map.regenerate_lakes(1);
        assert_eq!(Tile::new(6).terrain(&tile_map), Terrain::DeepOcean);
    }
}
