//! Registered creature definitions and their compiled-in defaults.

use bevy::prelude::*;
use cm_core::{Biome, Forest, GlobalKey, Range, SpawnArea, SpawnTime, Weather};
use cm_host::{Character, MonsterAi, Prefab, Tameable};

use crate::error::RegistryError;

/// One entry of a creature's drop table.
#[derive(Clone, Debug, PartialEq)]
pub struct DropEntry {
    pub amount: Range,
    /// Percent, 0 to 100.
    pub chance: f32,
    pub one_per_player: bool,
    pub multiply_by_level: bool,
}

impl Default for DropEntry {
    fn default() -> Self {
        Self {
            amount: Range::new(1.0, 1.0),
            chance: 100.0,
            one_per_player: false,
            multiply_by_level: true,
        }
    }
}

/// Drop table keyed by target prefab name.
///
/// Untouched lists leave the host's own drops alone. `none()` replaces them
/// with an explicitly empty table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropList {
    drops: Option<Vec<(String, DropEntry)>>,
}

impl DropList {
    /// Drop nothing at all.
    pub fn none(&mut self) {
        self.drops = Some(Vec::new());
    }

    /// The entry for `prefab_name`, created with defaults on first access.
    pub fn entry(&mut self, prefab_name: &str) -> &mut DropEntry {
        let drops = self.drops.get_or_insert_with(Vec::new);
        let index = match drops.iter().position(|(name, _)| name == prefab_name) {
            Some(index) => index,
            None => {
                drops.push((prefab_name.to_string(), DropEntry::default()));
                drops.len() - 1
            }
        };
        &mut drops[index].1
    }

    /// `None` while the host default drops should be kept.
    pub fn entries(&self) -> Option<&[(String, DropEntry)]> {
        self.drops.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.drops.is_some()
    }
}

/// A registered spawnable creature and the defaults of its tunable fields.
#[derive(Clone, Debug)]
pub struct CreatureDefinition {
    /// The host prefab entity this definition spawns.
    pub prefab: Entity,
    pub prefab_name: String,
    /// Localization key of the character name, e.g. `$enemy_boar`.
    pub name_key: String,
    /// When false, fields keep these defaults and are not exposed to config.
    pub configuration_enabled: bool,
    pub drops: DropList,
    pub can_spawn: bool,
    pub can_be_tamed: bool,
    /// Comma separated item names eaten to get tame.
    pub food_items: String,
    pub spawn_time: SpawnTime,
    pub required_altitude: Range,
    pub required_ocean_depth: Range,
    pub required_global_key: GlobalKey,
    pub group_size: Range,
    pub biome: Biome,
    pub spawn_area: SpawnArea,
    pub required_weather: Weather,
    /// Height above ground to spawn at. Higher for flyers.
    pub spawn_altitude: f32,
    pub can_have_stars: bool,
    /// Start hunting the player right after spawning.
    pub attack_immediately: bool,
    /// Seconds between spawn attempts.
    pub check_spawn_interval: i32,
    /// Percent chance each time the host checks the spawn.
    pub spawn_chance: f32,
    pub forest_spawn: Forest,
    /// How many may be near the player before spawning stops.
    pub maximum: i32,
}

impl CreatureDefinition {
    pub fn new(prefab: Entity, prefab_name: impl Into<String>, name_key: impl Into<String>) -> Self {
        Self {
            prefab,
            prefab_name: prefab_name.into(),
            name_key: name_key.into(),
            configuration_enabled: true,
            drops: DropList::default(),
            can_spawn: true,
            can_be_tamed: false,
            food_items: String::new(),
            spawn_time: SpawnTime::Always,
            required_altitude: Range::new(5.0, 1000.0),
            required_ocean_depth: Range::new(0.0, 0.0),
            required_global_key: GlobalKey::None,
            group_size: Range::new(1.0, 1.0),
            biome: Biome::MEADOWS,
            spawn_area: SpawnArea::Everywhere,
            required_weather: Weather::empty(),
            spawn_altitude: 0.5,
            can_have_stars: true,
            attack_immediately: false,
            check_spawn_interval: 600,
            spawn_chance: 100.0,
            forest_spawn: Forest::Both,
            maximum: 1,
        }
    }

    /// Build a definition from a prefab entity, taking tameability and food
    /// items from the prefab's own components.
    pub fn from_prefab(world: &World, prefab: Entity) -> Result<Self, RegistryError> {
        let name = world
            .get::<Prefab>(prefab)
            .ok_or(RegistryError::MissingPrefab(prefab))?
            .name
            .clone();
        let character = world
            .get::<Character>(prefab)
            .ok_or_else(|| RegistryError::MissingCharacter(name.clone()))?;

        let mut definition = Self::new(prefab, name, character.name.clone());
        definition.can_be_tamed = world.get::<Tameable>(prefab).is_some();
        definition.food_items = world
            .get::<MonsterAi>(prefab)
            .map(|ai| ai.consume_items.join(","))
            .unwrap_or_default();
        Ok(definition)
    }
}
