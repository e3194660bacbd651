//! Configuration of a generation run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{error::MapGenError, grid::Size};

/// Everything a generation run needs besides the player roster.
#[derive(Debug, Clone, PartialEq)]
pub struct MapParameters {
    pub map_size: Size,
    /// Seed string of the run. When it is `None` a seed is generated from system entropy and
    /// recorded in the [`crate::MapResult`].
    pub seed: Option<String>,
    /// Mode used when [`crate::MapGenerator::generate`] is called without an explicit mode.
    pub generator_mode: GeneratorMode,
    /// How the island strategy partitions land between islands.
    pub island_layout: IslandLayout,
    pub terrain_settings: TerrainSettings,
    /// Water bodies with at most this many tiles become lakes.
    pub lake_max_area_size: u32,
    /// Land bodies with fewer tiles than this are sunk.
    pub min_island_size: u32,
    /// Wall-clock budget of a fair-islands attempt.
    pub fair_timeout: Duration,
}

impl MapParameters {
    pub const MIN_MAP_SIZE: u32 = 20;
    pub const MAX_MAP_SIZE: u32 = 200;

    /// Creates parameters for a map of the given size, with defaults everywhere else.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            map_size: Size::new(width, height),
            ..Default::default()
        }
    }

    /// Checks every field and returns the first problem found.
    pub fn validate(&self) -> Result<(), MapGenError> {
        let Size { width, height } = self.map_size;
        let size_range = Self::MIN_MAP_SIZE..=Self::MAX_MAP_SIZE;
        if !size_range.contains(&width) || !size_range.contains(&height) {
            return Err(MapGenError::InvalidDimensions {
                width,
                height,
                min: Self::MIN_MAP_SIZE,
                max: Self::MAX_MAP_SIZE,
            });
        }

        if self.min_island_size == 0 {
            return Err(MapGenError::InvalidSetting {
                name: "min_island_size",
                value: 0,
                min: 1,
                max: u32::MAX,
            });
        }

        self.terrain_settings.validate()
    }
}

impl Default for MapParameters {
    fn default() -> Self {
        Self {
            map_size: Size::new(80, 50),
            seed: None,
            generator_mode: GeneratorMode::Fractal,
            island_layout: IslandLayout::Auto,
            terrain_settings: TerrainSettings::default(),
            lake_max_area_size: 9,
            min_island_size: 2,
            fair_timeout: Duration::from_secs(30),
        }
    }
}

/// Top-level generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorMode {
    /// Recursive midpoint height map.
    Fractal,
    /// Land placed as a sequence of islands.
    Island,
    /// Smoothed noise height map.
    Random,
    /// Region growth from fracture points.
    Fracture,
    /// Identical islands for every player, with [`GeneratorMode::Island`] as fallback.
    Fair,
    /// Externally authored maps. Not supported.
    Scenario,
}

/// How the island strategy partitions the land mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IslandLayout {
    /// Picks a layout from the player count and land percentage.
    Auto,
    /// One dominant island per player plus a medium and a small one.
    FewBigContinents,
    /// A handful of large islands shared by the players plus filler islands.
    SeveralBigIslands,
    /// Islands sized for one, two or three players, then smaller ones.
    ManyFairIslands,
}

impl IslandLayout {
    /// Largest land percentage the layout can place. Higher settings are lowered to it.
    pub const fn max_land_percent(self) -> u32 {
        match self {
            IslandLayout::Auto | IslandLayout::FewBigContinents => 85,
            IslandLayout::SeveralBigIslands | IslandLayout::ManyFairIslands => 80,
        }
    }
}

/// Terrain mix and climate of the world. Every value is a percentage in `0..=100`.
///
/// It can be deserialized from a partial object; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Share of the map covered by land.
    pub land_percent: u32,
    /// Higher values raise more hills and mountains.
    pub steepness: u32,
    /// Higher values make forests and swamps more common and deserts rarer.
    pub wetness: u32,
    /// Temperature bias of the world, lower is colder.
    pub temperature: u32,
    pub river: u32,
    pub mountain: u32,
    pub desert: u32,
    pub forest: u32,
    pub swamp: u32,
    /// Scales the number of resources placed.
    pub resource_percent: u32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            land_percent: 30,
            steepness: 30,
            wetness: 50,
            temperature: 50,
            river: 15,
            mountain: 25,
            desert: 20,
            forest: 30,
            swamp: 10,
            resource_percent: 100,
        }
    }
}

impl TerrainSettings {
    /// The sum of the land terrain shares is kept at or below this value.
    pub const MAX_TERRAIN_SUM: u32 = 90;

    pub fn validate(&self) -> Result<(), MapGenError> {
        let fields = [
            ("land_percent", self.land_percent),
            ("steepness", self.steepness),
            ("wetness", self.wetness),
            ("temperature", self.temperature),
            ("river", self.river),
            ("mountain", self.mountain),
            ("desert", self.desert),
            ("forest", self.forest),
            ("swamp", self.swamp),
            ("resource_percent", self.resource_percent),
        ];

        match fields.into_iter().find(|&(_, value)| value > 100) {
            Some((name, value)) => Err(MapGenError::InvalidSetting {
                name,
                value,
                min: 0,
                max: 100,
            }),
            None => Ok(()),
        }
    }

    /// Returns the terrain shares after the climate settings have been applied.
    ///
    /// Steepness scales mountains, wetness trades deserts for forests and swamps, and
    /// temperature decides how much of the forest share grows as jungle. If the land shares
    /// add up to more than [`TerrainSettings::MAX_TERRAIN_SUM`] they are scaled down
    /// proportionally.
    pub fn effective_percentages(&self) -> TerrainPercentages {
        let wet_factor = self.wetness + 50;
        let mountain = self.mountain * (self.steepness + 20) / 50;
        let forest_total = self.forest * wet_factor / 100;
        let jungle = forest_total * self.temperature / 200;
        let forest = forest_total - jungle;
        let swamp = self.swamp * wet_factor / 100;
        let desert = self.desert * (150 - self.wetness) / 100 * (self.temperature + 50) / 100;
        let river = self.river * wet_factor / 100;

        let mut percentages = TerrainPercentages {
            river: river.min(100),
            mountain,
            desert,
            forest,
            jungle,
            swamp,
        };

        let sum = percentages.land_sum();
        if sum > Self::MAX_TERRAIN_SUM {
            let scale = |value: u32| value * Self::MAX_TERRAIN_SUM / sum;
            percentages.mountain = scale(percentages.mountain);
            percentages.desert = scale(percentages.desert);
            percentages.forest = scale(percentages.forest);
            percentages.jungle = scale(percentages.jungle);
            percentages.swamp = scale(percentages.swamp);
        }

        percentages
    }
}

/// Terrain shares, in percent, actually used by the terrain and island generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainPercentages {
    pub river: u32,
    pub mountain: u32,
    pub desert: u32,
    pub forest: u32,
    pub jungle: u32,
    pub swamp: u32,
}

impl TerrainPercentages {
    /// Sum of the shares that turn land into a specific terrain.
    pub const fn land_sum(&self) -> u32 {
        self.mountain + self.desert + self.forest + self.jungle + self.swamp
    }
}

#[cfg(test)]
mod tests {
    use super::{MapParameters, TerrainSettings};
    use crate::error::MapGenError;

    #[test]
    fn defaults_are_valid() {
        assert!(MapParameters::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_dimensions() {
        let parameters = MapParameters::with_size(19, 40);
        assert!(matches!(
            parameters.validate(),
            Err(MapGenError::InvalidDimensions { width: 19, .. })
        ));

        let parameters = MapParameters::with_size(40, 201);
        assert!(matches!(
            parameters.validate(),
            Err(MapGenError::InvalidDimensions { height: 201, .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_settings() {
        let mut parameters = MapParameters::default();
        parameters.terrain_settings.wetness = 101;
        assert!(matches!(
            parameters.validate(),
            Err(MapGenError::InvalidSetting {
                name: "wetness",
                value: 101,
                ..
            })
        ));
    }

    #[test]
    fn partial_settings_take_defaults() {
        let settings: TerrainSettings =
            serde_json::from_str(r#"{"land_percent": 45, "river": 20}"#).unwrap();
        assert_eq!(settings.land_percent, 45);
        assert_eq!(settings.river, 20);
        assert_eq!(settings.forest, TerrainSettings::default().forest);
    }

    #[test]
    fn default_settings_keep_their_shares() {
        let percentages = TerrainSettings::default().effective_percentages();
        assert_eq!(percentages.mountain, 25);
        assert_eq!(percentages.desert, 20);
        assert_eq!(percentages.swamp, 10);
        assert_eq!(percentages.river, 15);
        assert_eq!(percentages.forest + percentages.jungle, 30);
    }

    #[test]
    fn terrain_shares_are_capped() {
        let settings = TerrainSettings {
            mountain: 100,
            desert: 100,
            forest: 100,
            swamp: 100,
            steepness: 100,
            ..Default::default()
        };
        assert!(settings.effective_percentages().land_sum() <= TerrainSettings::MAX_TERRAIN_SUM);
    }
}
