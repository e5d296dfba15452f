use bitflags::bitflags;

bitflags! {
    /// Host biome mask. A spawn entry matches any biome whose bit is set.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Biome: u32 {
        const MEADOWS = 1 << 0;
        const SWAMP = 1 << 1;
        const MOUNTAIN = 1 << 2;
        const BLACK_FOREST = 1 << 3;
        const PLAINS = 1 << 4;
        const ASH_LANDS = 1 << 5;
        const DEEP_NORTH = 1 << 6;
        const OCEAN = 1 << 8;
        const MISTLANDS = 1 << 9;
    }
}

/// Display names for every named biome, in declaration order.
const BIOME_NAMES: &[(Biome, &str)] = &[
    (Biome::MEADOWS, "Meadows"),
    (Biome::SWAMP, "Swamp"),
    (Biome::MOUNTAIN, "Mountain"),
    (Biome::BLACK_FOREST, "BlackForest"),
    (Biome::PLAINS, "Plains"),
    (Biome::ASH_LANDS, "AshLands"),
    (Biome::DEEP_NORTH, "DeepNorth"),
    (Biome::OCEAN, "Ocean"),
    (Biome::MISTLANDS, "Mistlands"),
];

impl Biome {
    /// Every single named biome. Used as the acceptable value list for config.
    pub fn named() -> impl Iterator<Item = Biome> {
        BIOME_NAMES.iter().map(|(biome, _)| *biome)
    }

    /// Name of a single biome, `None` for empty or combined masks.
    pub fn name(&self) -> Option<&'static str> {
        BIOME_NAMES
            .iter()
            .find(|(biome, _)| biome == self)
            .map(|(_, name)| *name)
    }

    /// Render as a comma separated list of biome names ("None" when empty).
    pub fn to_names(&self) -> String {
        let names: Vec<&str> = BIOME_NAMES
            .iter()
            .filter(|(biome, _)| self.contains(*biome))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            "None".to_string()
        } else {
            names.join(", ")
        }
    }

    /// Parse a comma separated list of biome names. Unknown names fail the parse.
    pub fn from_names(s: &str) -> Option<Self> {
        let mut biome = Biome::empty();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part == "None" {
                continue;
            }
            let (flag, _) = BIOME_NAMES.iter().find(|(_, name)| *name == part)?;
            biome |= *flag;
        }
        Some(biome)
    }
}

/// Where inside a biome the host places spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BiomeArea {
    Edge,
    Median,
    #[default]
    Everything,
}
