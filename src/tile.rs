use arrayvec::ArrayVec;

use crate::{
    grid::{Direction, OffsetCoordinate, SquareGrid},
    tile_component::{Resource, RiverMask, TemperatureBand, Terrain, WetnessClass},
    tile_map::TileMap,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// `Tile` represents a tile on the map, where the `usize` is the index of the current tile.
///
/// The index indicates the tile's position on the map, typically used to access or reference specific tiles.
pub struct Tile(usize);

impl Tile {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Creates a `Tile` from an `OffsetCoordinate`, or `None` when the coordinate is outside the grid.
    pub fn from_offset(offset_coordinate: OffsetCoordinate, grid: SquareGrid) -> Option<Self> {
        grid.offset_to_index(offset_coordinate).map(Self)
    }

    /// Get the index of the tile.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0
    }

    #[inline]
    pub fn to_offset(&self, grid: SquareGrid) -> OffsetCoordinate {
        grid.index_to_offset(self.0)
    }

    /// Distance of the tile from the nearest pole, on a `0..=1000` scale.
    ///
    /// The row (or pair of rows) in the middle of the map is the equator and gets `1000`;
    /// the first and last rows get the lowest values. It is linear in `y` and symmetric
    /// about mid-height.
    pub fn colatitude(&self, grid: SquareGrid) -> u32 {
        let y = self.to_offset(grid).y() as f64;
        let half_height = grid.height() as f64 / 2.0;
        let latitude = ((y + 0.5 - half_height) / half_height).abs();
        ((1.0 - latitude) * 1000.0).round() as u32
    }

    #[inline]
    pub fn height(&self, tile_map: &TileMap) -> u32 {
        tile_map.height_list[self.0]
    }

    #[inline]
    pub fn terrain(&self, tile_map: &TileMap) -> Terrain {
        tile_map.terrain_list[self.0]
    }

    #[inline]
    pub fn set_terrain(&self, tile_map: &mut TileMap, terrain: Terrain) {
        tile_map.terrain_list[self.0] = terrain;
    }

    #[inline]
    pub fn temperature_band(&self, tile_map: &TileMap) -> TemperatureBand {
        tile_map.temperature_band_list[self.0]
    }

    #[inline]
    pub fn wetness(&self, tile_map: &TileMap) -> u32 {
        tile_map.wetness_list[self.0]
    }

    #[inline]
    pub fn wetness_class(&self, tile_map: &TileMap) -> WetnessClass {
        WetnessClass::from_wetness(tile_map.wetness_list[self.0])
    }

    #[inline]
    pub fn river_mask(&self, tile_map: &TileMap) -> RiverMask {
        tile_map.river_mask_list[self.0]
    }

    #[inline]
    pub fn has_river(&self, tile_map: &TileMap) -> bool {
        !tile_map.river_mask_list[self.0].is_empty()
    }

    #[inline]
    pub fn continent_id(&self, tile_map: &TileMap) -> u32 {
        tile_map.continent_id_list[self.0]
    }

    #[inline]
    pub fn resource(&self, tile_map: &TileMap) -> Option<Resource> {
        tile_map.resource_list[self.0]
    }

    #[inline]
    pub fn set_resource(&self, tile_map: &mut TileMap, resource: Resource) {
        tile_map.resource_list[self.0] = Some(resource);
    }

    #[inline]
    pub fn is_water(&self, tile_map: &TileMap) -> bool {
        self.terrain(tile_map).is_water()
    }

    #[inline]
    pub fn is_land(&self, tile_map: &TileMap) -> bool {
        self.terrain(tile_map).is_land()
    }

    /// Whether a terrain has already been settled on the tile during this generation step.
    #[inline]
    pub fn is_placed(&self, tile_map: &TileMap) -> bool {
        tile_map.placed_list[self.0]
    }

    #[inline]
    pub fn set_placed(&self, tile_map: &mut TileMap, placed: bool) {
        tile_map.placed_list[self.0] = placed;
    }

    /// Retrieves the neighboring tile from the current tile in the specified direction.
    ///
    /// Returns `None` if the neighbor would be outside the grid.
    #[inline]
    pub fn neighbor_tile(&self, direction: Direction, grid: SquareGrid) -> Option<Self> {
        grid.neighbor(self.0, direction).map(Self)
    }

    /// Returns the tiles sharing an edge with the current tile.
    pub fn cardinal_neighbor_tiles(&self, grid: SquareGrid) -> ArrayVec<Self, 4> {
        grid.cardinal_neighbors(self.0).into_iter().map(Self).collect()
    }

    /// Returns the tiles sharing an edge or a corner with the current tile.
    pub fn neighbor_tiles(&self, grid: SquareGrid) -> ArrayVec<Self, 8> {
        grid.adjacent_neighbors(self.0).into_iter().map(Self).collect()
    }

    /// Returns the tiles within the given Chebyshev distance from the current tile, including the current tile.
    pub fn tiles_in_distance(&self, distance: u32, grid: SquareGrid) -> impl Iterator<Item = Self> {
        grid.cells_within_distance(self.0, distance)
            .into_iter()
            .map(Self)
    }

    /// Chebyshev distance to another tile.
    #[inline]
    pub fn distance_to(&self, other: Self, grid: SquareGrid) -> u32 {
        grid.distance(self.0, other.0)
    }

    /// Returns the percentage (`0..=100`) of the 8 neighbours that are open sea.
    ///
    /// Neighbours outside the grid count as land.
    pub fn ocean_neighbor_percent(&self, tile_map: &TileMap) -> u32 {
        let ocean = self
            .neighbor_tiles(tile_map.grid)
            .iter()
            .filter(|tile| tile.terrain(tile_map).is_ocean())
            .count() as u32;
        ocean * 100 / 8
    }

    /// Whether any cardinal neighbour is water.
    pub fn is_cardinally_adjacent_to_water(&self, tile_map: &TileMap) -> bool {
        self.cardinal_neighbor_tiles(tile_map.grid)
            .iter()
            .any(|tile| tile.is_water(tile_map))
    }
}
