use enum_map::Enum;
use serde::{Deserialize, Serialize};

/// The terrain of a tile.
///
/// `Coast` is the shallow ocean class, `Ocean` the intermediate one and `DeepOcean` the
/// deepest. `Lake` is an enclosed body of water.
#[derive(Enum, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, Debug)]
pub enum Terrain {
    Coast,
    Ocean,
    DeepOcean,
    Lake,
    Grassland,
    Plains,
    Desert,
    Tundra,
    Glacier,
    Forest,
    Jungle,
    Swamp,
    Hills,
    Mountains,
}

impl Terrain {
    pub fn name(&self) -> &str {
        match self {
            Terrain::Coast => "Coast",
            Terrain::Ocean => "Ocean",
            Terrain::DeepOcean => "Deep Ocean",
            Terrain::Lake => "Lake",
            Terrain::Grassland => "Grassland",
            Terrain::Plains => "Plains",
            Terrain::Desert => "Desert",
            Terrain::Tundra => "Tundra",
            Terrain::Glacier => "Glacier",
            Terrain::Forest => "Forest",
            Terrain::Jungle => "Jungle",
            Terrain::Swamp => "Swamp",
            Terrain::Hills => "Hills",
            Terrain::Mountains => "Mountains",
        }
    }

    #[inline]
    pub const fn is_water(&self) -> bool {
        matches!(
            self,
            Terrain::Coast | Terrain::Ocean | Terrain::DeepOcean | Terrain::Lake
        )
    }

    /// Water that belongs to the open sea, i.e. every water terrain except [`Terrain::Lake`].
    #[inline]
    pub const fn is_ocean(&self) -> bool {
        matches!(self, Terrain::Coast | Terrain::Ocean | Terrain::DeepOcean)
    }

    #[inline]
    pub const fn is_land(&self) -> bool {
        !self.is_water()
    }

    /// Hills and mountains.
    #[inline]
    pub const fn is_highland(&self) -> bool {
        matches!(self, Terrain::Hills | Terrain::Mountains)
    }

    /// Returns the (food, production, trade) yield of the terrain.
    pub const fn yields(&self) -> (u32, u32, u32) {
        match self {
            Terrain::Coast => (1, 0, 2),
            Terrain::Ocean | Terrain::DeepOcean => (1, 0, 1),
            Terrain::Lake => (2, 0, 2),
            Terrain::Grassland => (2, 0, 0),
            Terrain::Plains => (1, 1, 0),
            Terrain::Desert | Terrain::Glacier => (0, 0, 0),
            Terrain::Tundra => (1, 0, 0),
            Terrain::Forest => (1, 2, 0),
            Terrain::Jungle => (1, 0, 0),
            Terrain::Swamp => (1, 0, 0),
            Terrain::Hills => (1, 0, 0),
            Terrain::Mountains => (0, 1, 0),
        }
    }
}
