use super::Generator;
use crate::{
    error::MapGenError,
    generate_common_methods,
    map_parameters::MapParameters,
    tile_map::{TemperatureStage, TileMap},
};

/// Land placed island by island, following the configured [`crate::IslandLayout`].
///
/// Islands come out of placement fully typed and with their rivers, so only the water and
/// climate steps of the terrain pipeline run afterwards.
pub struct Island(TileMap);

impl Generator for Island {
    generate_common_methods!();

    fn generate_height_map(
        &mut self,
        map_parameters: &MapParameters,
        player_num: u32,
    ) -> Result<(), MapGenError> {
        let tile_map = self.tile_map_mut();
        // Islands are typed while they are placed, so they need a climate first.
        tile_map.generate_temperature_map(TemperatureStage::Provisional);
        tile_map.generate_islands(map_parameters, player_num)?;
        Ok(())
    }

    fn generate_provisional_temperature(&mut self) {}

    fn generate_terrain(&mut self, map_parameters: &MapParameters) {
        let tile_map = self.tile_map_mut();
        tile_map.smooth_water_depth();
        tile_map.regenerate_lakes(map_parameters.lake_max_area_size);
        tile_map.remove_tiny_islands(map_parameters.min_island_size);
        tile_map.generate_temperature_map(TemperatureStage::Final);
        tile_map.generate_wetness_map(map_parameters.terrain_settings.wetness);
        tile_map.assign_continent_numbers();
    }

    fn add_rivers(&mut self) {}
}
