use crate::{
    height_map::MAX_HEIGHT,
    map_parameters::MapParameters,
    tile_component::Terrain,
    tile_map::{TemperatureStage, TileMap},
};

/// Deepest ocean depth, in percent.
pub const MAX_OCEAN_DEPTH: u32 = 100;

impl TileMap {
    /// Turns the height map into a fully typed terrain.
    ///
    /// The order of the steps follows their inputs: the water bodies must be final before
    /// the temperature is, and wetness must exist before land is typed.
    pub fn generate_terrain(&mut self, map_parameters: &MapParameters) {
        self.classify_land_and_ocean();
        self.smooth_water_depth();
        self.regenerate_lakes(map_parameters.lake_max_area_size);
        self.remove_tiny_islands(map_parameters.min_island_size);
        self.generate_temperature_map(TemperatureStage::Final);
        self.generate_wetness_map(map_parameters.terrain_settings.wetness);
        self.make_land();
        self.make_terrains();
        self.assign_continent_numbers();

        tracing::debug!(
            land_tiles = self.land_tile_count(),
            continents = self.continent_count(),
            "terrain generated"
        );
    }

    /// Splits the map into land and ocean at the shore level.
    ///
    /// Ocean tiles get a depth from how far below the shore level they are, made deeper when
    /// most neighbours are ocean so that shallow straits between continents are rare. Land
    /// tiles get a placeholder terrain and are left unplaced for [`TileMap::make_land`].
    pub fn classify_land_and_ocean(&mut self) {
        let grid = self.grid;
        let shore_level = self.shore_level;

        let terrain_list: Vec<Terrain> = self
            .all_tiles()
            .map(|tile| {
                let height = tile.height(self);
                // With no land requested the shore level is the maximum height, which some tiles reach.
                if height >= shore_level && shore_level < MAX_HEIGHT {
                    return Terrain::Grassland;
                }

                let mut ocean = 0i32;
                let mut land = 0i32;
                for neighbor in tile.neighbor_tiles(grid) {
                    if neighbor.height(self) < shore_level {
                        ocean += 1;
                    } else {
                        land += 1;
                    }
                }
                let depth = ((shore_level - height) * 100 / shore_level) as i32
                    + 30 * (ocean - land) / (ocean + land).max(1);
                Self::ocean_for_depth(depth.clamp(0, MAX_OCEAN_DEPTH as i32) as u32)
            })
            .collect();

        self.terrain_list = terrain_list;
        self.placed_list.fill(false);
        self.river_mask_list.fill(Default::default());
    }

    /// Returns the ocean class closest to a depth in percent.
    pub fn ocean_for_depth(depth: u32) -> Terrain {
        match depth {
            0..35 => Terrain::Coast,
            35..70 => Terrain::Ocean,
            _ => Terrain::DeepOcean,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        map_parameters::MapParameters,
        tile_component::Terrain,
        tile_map::{TileMap, tests::blank_map},
    };

    #[test]
    fn threshold_splits_at_the_shore_level() {
        let mut tile_map = blank_map(20, 20);
        for (index, height) in tile_map.height_list.iter_mut().enumerate() {
            *height = if index % 20 < 10 { 900 } else { 100 };
        }
        tile_map.classify_land_and_ocean();

        assert_eq!(tile_map.terrain_list[0], Terrain::Grassland);
        assert!(tile_map.terrain_list[19].is_water());
        assert_eq!(tile_map.land_tile_count(), 200);
    }

    #[test]
    fn ocean_depth_classes() {
        assert_eq!(TileMap::ocean_for_depth(0), Terrain::Coast);
        assert_eq!(TileMap::ocean_for_depth(50), Terrain::Ocean);
        assert_eq!(TileMap::ocean_for_depth(100), Terrain::DeepOcean);
    }

    #[test]
    fn all_water_map_is_valid() {
        let mut parameters = MapParameters::with_size(24, 20);
        parameters.terrain_settings.land_percent = 0;
        let mut tile_map = TileMap::new(&parameters, "flood");
        tile_map.generate_terrain(&parameters);

        assert_eq!(tile_map.land_tile_count(), 0);
        assert_eq!(tile_map.continent_count(), 0);
        assert!(tile_map.continent_id_list.iter().all(|&id| id == 0));
    }

    #[test]
    fn every_tile_is_typed() {
        let parameters = MapParameters::with_size(30, 24);
        let mut tile_map = TileMap::new(&parameters, "typed");
        for (index, height) in tile_map.height_list.iter_mut().enumerate() {
            let x = (index % 30) as i32 - 15;
            let y = (index / 30) as i32 - 12;
            *height = (1000 - (x * x + y * y) * 4).max(0) as u32;
        }
        tile_map.generate_terrain(&parameters);

        assert!(tile_map.land_tile_count() > 0);
        assert!(tile_map.placed_list.iter().enumerate().all(|(index, &placed)| {
            placed || tile_map.terrain_list[index].is_water()
        }));
    }
}
