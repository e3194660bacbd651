use super::Generator;
use crate::{
    error::MapGenError, generate_common_methods, height_map::random::RandomHeightMap,
    map_parameters::MapParameters, tile_map::TileMap,
};

/// Land from smoothed noise. More players smooth the noise into fewer, larger continents.
pub struct Random(TileMap);

impl Generator for Random {
    generate_common_methods!();

    fn generate_height_map(
        &mut self,
        _map_parameters: &MapParameters,
        player_num: u32,
    ) -> Result<(), MapGenError> {
        let tile_map = self.tile_map_mut();
        let mut height_map = RandomHeightMap::new(tile_map.grid, player_num);
        tile_map.apply_height_map(&mut height_map);
        Ok(())
    }
}
