mod add_rivers;
mod assign_continent_numbers;
mod choose_starting_positions;
mod generate_temperature_map;
mod generate_terrain;
mod generate_wetness_map;
mod make_land;
mod make_terrains;
mod place_resources;
mod regenerate_lakes;
mod remove_tiny_islands;
mod smooth_water_depth;

pub use add_rivers::*;
pub use choose_starting_positions::*;
pub use generate_temperature_map::*;
pub use generate_terrain::*;
pub use make_land::*;
pub use make_terrains::*;

#[cfg(test)]
pub(crate) use add_rivers::tests::assert_rivers_connected;
