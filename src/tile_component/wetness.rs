use enum_map::Enum;
use serde::{Deserialize, Serialize};

/// Moisture class of a tile, derived from its wetness value (0 to 100).
#[derive(Enum, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, Debug)]
pub enum WetnessClass {
    Dry,
    Normal,
    Wet,
}

impl WetnessClass {
    /// Wetness below this value is dry.
    pub const DRY_LEVEL: u32 = 30;
    /// Wetness at or above this value is wet.
    pub const WET_LEVEL: u32 = 70;

    pub const fn from_wetness(wetness: u32) -> Self {
        if wetness < Self::DRY_LEVEL {
            WetnessClass::Dry
        } else if wetness < Self::WET_LEVEL {
            WetnessClass::Normal
        } else {
            WetnessClass::Wet
        }
    }
}

/// Wetness requirement of a terrain placement rule.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum WetnessCondition {
    All,
    Dry,
    NotDry,
}

impl WetnessCondition {
    pub fn accepts(self, class: WetnessClass) -> bool {
        match self {
            WetnessCondition::All => true,
            WetnessCondition::Dry => class == WetnessClass::Dry,
            WetnessCondition::NotDry => class != WetnessClass::Dry,
        }
    }
}

/// Elevation requirement of a terrain placement rule, relative to the low land level.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ElevationCondition {
    Any,
    Low,
    NotLow,
}
