use super::Generator;
use crate::{
    error::MapGenError, generate_common_methods, height_map::fracture::FractureHeightMap,
    map_parameters::MapParameters, tile_map::TileMap,
};

/// Land grown from fracture points into regions of similar height.
pub struct Fracture(TileMap);

impl Generator for Fracture {
    generate_common_methods!();

    fn generate_height_map(
        &mut self,
        _map_parameters: &MapParameters,
        _player_num: u32,
    ) -> Result<(), MapGenError> {
        let tile_map = self.tile_map_mut();
        let mut height_map = FractureHeightMap::new(tile_map.grid);
        tile_map.apply_height_map(&mut height_map);
        Ok(())
    }
}
