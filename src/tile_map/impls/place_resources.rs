use rand::seq::{IndexedRandom, SliceRandom};

use crate::{
    tile::Tile,
    tile_component::{Resource, ResourceCategory, Terrain},
    tile_map::TileMap,
};

impl TileMap {
    /// Scatters resources over every continent and over the shallow water.
    ///
    /// Each continent receives strategic, luxury and bonus resources, in that order, up to
    /// `size * category% * resource_percent / 10000` of each. Coast and lake tiles form one
    /// more group that only receives bonus and luxury resources. A resource is never put
    /// next to another one (8-neighbourhood).
    pub fn place_resources(&mut self, resource_percent: u32) {
        let mut groups: Vec<Vec<Tile>> = vec![Vec::new(); self.continent_size_list.len()];
        let mut shallow_water = Vec::new();
        for tile in self.all_tiles() {
            match tile.terrain(self) {
                Terrain::Coast | Terrain::Lake => shallow_water.push(tile),
                terrain if terrain.is_land() => {
                    groups[tile.continent_id(self) as usize].push(tile)
                }
                _ => {}
            }
        }

        let land_categories = [
            ResourceCategory::Strategic,
            ResourceCategory::Luxury,
            ResourceCategory::Bonus,
        ];
        let water_categories = [ResourceCategory::Bonus, ResourceCategory::Luxury];

        let mut placed = 0;
        // Group `0` would hold land that has no continent yet; it does not receive resources.
        for group in groups.iter().skip(1) {
            placed += self.place_resources_in_group(group, &land_categories, resource_percent);
        }
        placed += self.place_resources_in_group(&shallow_water, &water_categories, resource_percent);

        tracing::debug!(placed, "resources placed");
    }

    fn place_resources_in_group(
        &mut self,
        group: &[Tile],
        categories: &[ResourceCategory],
        resource_percent: u32,
    ) -> usize {
        let mut candidates = group.to_vec();
        let mut placed = 0;

        for &category in categories {
            let budget =
                group.len() * category.default_percent() as usize * resource_percent as usize
                    / 10_000;
            if budget == 0 {
                continue;
            }

            candidates.shuffle(&mut self.random_number_generator);
            let mut remaining = budget;
            for &tile in &candidates {
                if remaining == 0 {
                    break;
                }
                if !self.can_hold_resource(tile) {
                    continue;
                }

                let terrain = tile.terrain(self);
                let choices: Vec<Resource> = Resource::iter()
                    .filter(|resource| {
                        resource.category() == category && resource.can_be_placed_on(terrain)
                    })
                    .collect();
                if let Some(&resource) = choices.choose(&mut self.random_number_generator) {
                    tile.set_resource(self, resource);
                    remaining -= 1;
                }
            }
            placed += budget - remaining;
        }

        placed
    }

    /// Whether neither the tile nor any of its 8 neighbours has a resource.
    fn can_hold_resource(&self, tile: Tile) -> bool {
        tile.resource(self).is_none()
            && tile
                .neighbor_tiles(self.grid)
                .iter()
                .all(|neighbor| neighbor.resource(self).is_none())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        tile_component::Terrain,
        tile_map::tests::map_from_rows,
    };

    #[test]
    fn resources_match_their_terrain_and_never_touch() {
        let row = "..############################..";
        let mut tile_map = map_from_rows(&[row; 20]);
        for tile in tile_map.all_tiles() {
            if tile.is_water(&tile_map) {
                tile.set_terrain(&mut tile_map, Terrain::Coast);
            } else if tile.index() % 3 == 0 {
                tile.set_terrain(&mut tile_map, Terrain::Hills);
            }
        }
        tile_map.assign_continent_numbers();
        tile_map.place_resources(100);

        let grid = tile_map.grid;
        let mut count = 0;
        for tile in tile_map.all_tiles() {
            let Some(resource) = tile.resource(&tile_map) else {
                continue;
            };
            count += 1;
            assert!(resource.can_be_placed_on(tile.terrain(&tile_map)));
            assert!(
                tile.neighbor_tiles(grid)
                    .iter()
                    .all(|neighbor| neighbor.resource(&tile_map).is_none())
            );
        }
        assert!(count > 0);
    }

    #[test]
    fn zero_percent_places_nothing() {
        let row = "..##########..";
        let mut tile_map = map_from_rows(&[row; 10]);
        tile_map.assign_continent_numbers();
        tile_map.place_resources(0);
        assert!(tile_map.resource_list.iter().all(Option::is_none));
    }
}
