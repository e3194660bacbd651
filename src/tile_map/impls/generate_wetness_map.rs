use crate::{tile_component::Terrain, tile_map::TileMap};

/// Wetness lost per tile of distance from water.
const WETNESS_PER_DISTANCE: u32 = 15;
/// Colatitudes of the subtropical dry belt.
const DRY_BELT: std::ops::RangeInclusive<u32> = 650..=800;
/// Share of wetness kept inside the dry belt, in percent.
const DRY_BELT_FACTOR: u32 = 60;

impl TileMap {
    /// Computes the moisture (`0..=100`) of every tile.
    ///
    /// Land gets wetter the closer it is to water. A lake moistens land twice as far as the
    /// sea does, and the result is scaled by the `wetness` setting. Land in the subtropical
    /// dry belt loses 40% of its moisture. Water tiles are always fully wet.
    pub fn generate_wetness_map(&mut self, wetness: u32) {
        let grid = self.grid;
        let ocean_distance = self.distance_map(|tile| tile.terrain(self).is_ocean(), |_| true);
        let lake_distance =
            self.distance_map(|tile| tile.terrain(self) == Terrain::Lake, |_| true);

        let wetness_list: Vec<u32> = self
            .all_tiles()
            .map(|tile| {
                if tile.is_water(self) {
                    return 100;
                }

                let index = tile.index();
                let distance = ocean_distance[index].min(lake_distance[index].saturating_add(1) / 2);
                let mut value = 100u32.saturating_sub(WETNESS_PER_DISTANCE.saturating_mul(distance));
                value = (value * (wetness + 50) / 100).min(100);
                if DRY_BELT.contains(&tile.colatitude(grid)) {
                    value = value * DRY_BELT_FACTOR / 100;
                }
                value
            })
            .collect();

        self.wetness_list = wetness_list;
    }
}
