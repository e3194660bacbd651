use enum_map::Enum;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;

/// A resource that can sit on a tile.
#[derive(Enum, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, Debug)]
pub enum Resource {
    // Bonus
    Wheat,
    Cattle,
    Sheep,
    Deer,
    Bananas,
    Stone,
    Fish,
    // Strategic
    Iron,
    Horses,
    Coal,
    Oil,
    Aluminum,
    Uranium,
    // Luxury
    Gold,
    Silver,
    Gems,
    Spices,
    Silk,
    Dyes,
    Wine,
    Incense,
    Furs,
    Ivory,
    Sugar,
    Cotton,
    Marble,
    Whales,
    Pearls,
}

#[derive(Enum, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, Debug)]
pub enum ResourceCategory {
    Bonus,
    Strategic,
    Luxury,
}

impl ResourceCategory {
    /// Default share of a landmass, in percent, that receives resources of this category.
    pub const fn default_percent(self) -> u32 {
        match self {
            ResourceCategory::Bonus => 10,
            ResourceCategory::Strategic => 4,
            ResourceCategory::Luxury => 4,
        }
    }
}

impl Resource {
    /// Iterates over every resource.
    pub fn iter() -> impl Iterator<Item = Resource> {
        (0..Resource::LENGTH).map(Resource::from_usize)
    }

    pub fn name(&self) -> &str {
        match self {
            Resource::Wheat => "Wheat",
            Resource::Cattle => "Cattle",
            Resource::Sheep => "Sheep",
            Resource::Deer => "Deer",
            Resource::Bananas => "Bananas",
            Resource::Stone => "Stone",
            Resource::Fish => "Fish",
            Resource::Iron => "Iron",
            Resource::Horses => "Horses",
            Resource::Coal => "Coal",
            Resource::Oil => "Oil",
            Resource::Aluminum => "Aluminum",
            Resource::Uranium => "Uranium",
            Resource::Gold => "Gold",
            Resource::Silver => "Silver",
            Resource::Gems => "Gems",
            Resource::Spices => "Spices",
            Resource::Silk => "Silk",
            Resource::Dyes => "Dyes",
            Resource::Wine => "Wine",
            Resource::Incense => "Incense",
            Resource::Furs => "Furs",
            Resource::Ivory => "Ivory",
            Resource::Sugar => "Sugar",
            Resource::Cotton => "Cotton",
            Resource::Marble => "Marble",
            Resource::Whales => "Whales",
            Resource::Pearls => "Pearls",
        }
    }

    pub const fn category(&self) -> ResourceCategory {
        match self {
            Resource::Wheat
            | Resource::Cattle
            | Resource::Sheep
            | Resource::Deer
            | Resource::Bananas
            | Resource::Stone
            | Resource::Fish => ResourceCategory::Bonus,
            Resource::Iron
            | Resource::Horses
            | Resource::Coal
            | Resource::Oil
            | Resource::Aluminum
            | Resource::Uranium => ResourceCategory::Strategic,
            _ => ResourceCategory::Luxury,
        }
    }

    /// Terrains the resource can be placed on.
    pub const fn terrains(&self) -> &'static [Terrain] {
        use Terrain::*;
        match self {
            Resource::Wheat => &[Plains, Grassland, Desert],
            Resource::Cattle => &[Grassland],
            Resource::Sheep => &[Hills, Plains, Grassland, Tundra],
            Resource::Deer => &[Forest, Tundra],
            Resource::Bananas => &[Jungle],
            Resource::Stone => &[Grassland, Plains, Desert, Tundra, Hills],
            Resource::Fish => &[Coast, Lake],
            Resource::Iron => &[Hills, Plains, Desert, Tundra, Forest, Mountains],
            Resource::Horses => &[Grassland, Plains, Tundra],
            Resource::Coal => &[Hills, Plains, Grassland],
            Resource::Oil => &[Desert, Swamp, Glacier, Tundra, Jungle],
            Resource::Aluminum => &[Hills, Desert, Tundra, Plains],
            Resource::Uranium => &[Hills, Forest, Jungle, Swamp, Tundra, Mountains],
            Resource::Gold => &[Hills, Desert, Plains, Mountains],
            Resource::Silver => &[Hills, Tundra, Desert],
            Resource::Gems => &[Jungle, Hills, Mountains],
            Resource::Spices => &[Jungle],
            Resource::Silk => &[Forest],
            Resource::Dyes => &[Forest, Jungle],
            Resource::Wine => &[Plains, Grassland],
            Resource::Incense => &[Desert, Plains],
            Resource::Furs => &[Forest, Tundra],
            Resource::Ivory => &[Plains],
            Resource::Sugar => &[Swamp],
            Resource::Cotton => &[Grassland, Plains, Desert],
            Resource::Marble => &[Hills, Grassland, Plains, Desert],
            Resource::Whales => &[Coast],
            Resource::Pearls => &[Coast],
        }
    }

    pub fn can_be_placed_on(&self, terrain: Terrain) -> bool {
        self.terrains().contains(&terrain)
    }
}

#[cfg(test)]
mod tests {
    use super::{Resource, ResourceCategory};
    use crate::tile_component::Terrain;

    #[test]
    fn every_category_has_land_and_the_bonus_category_has_water_resources() {
        for category in [
            ResourceCategory::Bonus,
            ResourceCategory::Strategic,
            ResourceCategory::Luxury,
        ] {
            assert!(
                Resource::iter()
                    .filter(|resource| resource.category() == category)
                    .any(|resource| resource.terrains().iter().any(Terrain::is_land))
            );
        }
        assert!(Resource::Fish.can_be_placed_on(Terrain::Lake));
        assert!(!Resource::Fish.can_be_placed_on(Terrain::DeepOcean));
    }

    #[test]
    fn iter_visits_every_resource_once() {
        assert_eq!(Resource::iter().count(), 28);
    }
}
