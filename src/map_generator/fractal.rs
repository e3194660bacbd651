use super::Generator;
use crate::{
    error::MapGenError, generate_common_methods, height_map::fractal::FractalHeightMap,
    map_parameters::MapParameters, tile_map::TileMap,
};

/// Continents from a recursive midpoint height map.
pub struct Fractal(TileMap);

impl Generator for Fractal {
    generate_common_methods!();

    fn generate_height_map(
        &mut self,
        map_parameters: &MapParameters,
        _player_num: u32,
    ) -> Result<(), MapGenError> {
        let tile_map = self.tile_map_mut();
        let mut height_map =
            FractalHeightMap::new(tile_map.grid, map_parameters.terrain_settings.land_percent);
        tile_map.apply_height_map(&mut height_map);
        Ok(())
    }
}
