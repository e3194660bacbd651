use crate::tile_map::TileMap;

impl TileMap {
    /// Labels every cardinally connected land body with a continent ID.
    ///
    /// IDs are dense and start at `1`, in the row-major order of each body's first tile.
    /// Water gets `0`. [`TileMap::continent_size_list`] is rebuilt alongside.
    pub fn assign_continent_numbers(&mut self) {
        let bodies = self.connected_bodies(|tile| tile.is_land(self));

        self.continent_id_list.fill(0);
        self.continent_size_list = Vec::with_capacity(bodies.len() + 1);
        self.continent_size_list.push(0);

        for (index, body) in bodies.iter().enumerate() {
            let continent_id = index as u32 + 1;
            for tile in body {
                self.continent_id_list[tile.index()] = continent_id;
            }
            self.continent_size_list.push(body.len() as u32);
        }

        tracing::debug!(continents = bodies.len(), "continents labeled");
    }
}
