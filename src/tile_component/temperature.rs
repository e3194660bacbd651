use bitflags::bitflags;
use enum_map::Enum;
use serde::{Deserialize, Serialize};

/// The discrete climate band of a tile.
#[derive(Enum, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, Debug)]
pub enum TemperatureBand {
    Frozen,
    Cold,
    Temperate,
    Tropical,
}

impl TemperatureBand {
    pub fn name(&self) -> &str {
        match self {
            TemperatureBand::Frozen => "Frozen",
            TemperatureBand::Cold => "Cold",
            TemperatureBand::Temperate => "Temperate",
            TemperatureBand::Tropical => "Tropical",
        }
    }

    /// Returns the single-band mask of this band.
    pub const fn mask(self) -> TemperatureMask {
        match self {
            TemperatureBand::Frozen => TemperatureMask::FROZEN,
            TemperatureBand::Cold => TemperatureMask::COLD,
            TemperatureBand::Temperate => TemperatureMask::TEMPERATE,
            TemperatureBand::Tropical => TemperatureMask::TROPICAL,
        }
    }
}

bitflags! {
    /// A set of temperature bands, used by terrain placement to describe where a terrain may grow.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
    pub struct TemperatureMask: u8 {
        const FROZEN = 0b0001;
        const COLD = 0b0010;
        const TEMPERATE = 0b0100;
        const TROPICAL = 0b1000;
        const NOT_FROZEN = Self::COLD.bits() | Self::TEMPERATE.bits() | Self::TROPICAL.bits();
        const HOT = Self::TEMPERATE.bits() | Self::TROPICAL.bits();
        const NOT_HOT = Self::FROZEN.bits() | Self::COLD.bits();
    }
}

impl TemperatureMask {
    #[inline]
    pub fn includes(self, band: TemperatureBand) -> bool {
        self.contains(band.mask())
    }
}

#[cfg(test)]
mod tests {
    use super::{TemperatureBand, TemperatureMask};

    #[test]
    fn masks_group_bands() {
        assert!(TemperatureMask::HOT.includes(TemperatureBand::Tropical));
        assert!(TemperatureMask::HOT.includes(TemperatureBand::Temperate));
        assert!(!TemperatureMask::NOT_FROZEN.includes(TemperatureBand::Frozen));
        assert!(TemperatureMask::all().includes(TemperatureBand::Frozen));
    }
}
