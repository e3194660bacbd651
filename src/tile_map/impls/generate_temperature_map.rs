use crate::{
    height_map::{MAX_HEIGHT, adjust_int_map},
    tile_component::TemperatureBand,
    tile_map::TileMap,
};

/// Highest value of the continuous temperature.
pub const MAX_TEMPERATURE: u32 = 1000;

/// Which inputs the temperature map may rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureStage {
    /// Before land exists: only latitude is used.
    Provisional,
    /// After every elevation-dependent terrain step: altitude and the surrounding ocean are used too.
    Final,
}

/// Thresholds that turn the continuous temperature into bands, for a given bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureLevels {
    pub cold: u32,
    pub tropical: u32,
    pub ice_base: u32,
}

impl TemperatureLevels {
    /// Computes the levels for a temperature bias in `0..=100`. Lower biases give colder worlds.
    pub fn new(temperature_bias: u32) -> Self {
        let bias = temperature_bias as i64;
        let max = MAX_TEMPERATURE as i64;
        let cold = (max * (60 * 7 - bias * 6) / 700).max(0);
        let tropical = (max * (143 * 7 - bias * 10) / 700).min(max * 9 / 10);
        Self {
            cold: cold as u32,
            tropical: tropical as u32,
            ice_base: (cold / 3) as u32,
        }
    }

    pub fn band(&self, temperature: u32) -> TemperatureBand {
        if temperature >= self.tropical {
            TemperatureBand::Tropical
        } else if temperature >= self.cold {
            TemperatureBand::Temperate
        } else if temperature >= 2 * self.ice_base {
            TemperatureBand::Cold
        } else {
            TemperatureBand::Frozen
        }
    }
}

impl TileMap {
    /// Computes the temperature of every tile and its band.
    ///
    /// The base value is the colatitude. In the [`TemperatureStage::Final`] stage high land is
    /// cooled by up to 30% and tiles surrounded by ocean are pulled towards the bias. The
    /// result is equalized over `0..=MAX_TEMPERATURE` before being cut into bands, so every
    /// tile always receives a band.
    pub fn generate_temperature_map(&mut self, stage: TemperatureStage) {
        let grid = self.grid;
        let shore_level = self.shore_level;
        let bias = self.temperature_bias as f64;

        let raw: Vec<i32> = self
            .all_tiles()
            .map(|tile| {
                let colatitude = tile.colatitude(grid) as f64;
                match stage {
                    TemperatureStage::Provisional => colatitude as i32,
                    TemperatureStage::Final => {
                        let height_above_shore = tile.height(self).saturating_sub(shore_level);
                        let altitude = if shore_level < MAX_HEIGHT {
                            -0.3 * height_above_shore as f64 / (MAX_HEIGHT - shore_level) as f64
                        } else {
                            0.0
                        };
                        let ocean_percent = tile.ocean_neighbor_percent(self).min(50) as f64;
                        let temperate = 0.15
                            * (bias / 100.0 - colatitude / MAX_TEMPERATURE as f64)
                            * 2.0
                            * ocean_percent
                            / 100.0;
                        (colatitude * (1.0 + temperate) * (1.0 + altitude)) as i32
                    }
                }
            })
            .collect();

        self.temperature_list = adjust_int_map(&raw, MAX_TEMPERATURE);

        let levels = TemperatureLevels::new(self.temperature_bias);
        self.temperature_band_list = self
            .temperature_list
            .iter()
            .map(|&temperature| levels.band(temperature))
            .collect();

        tracing::debug!(?stage, ?levels, "temperature map generated");
    }
}
