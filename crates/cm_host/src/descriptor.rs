use bevy::prelude::*;
use cm_core::{Biome, BiomeArea};

/// One host spawn rule. Built once, never mutated; replaced wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnDescriptor {
    pub name: String,
    pub prefab: Entity,
    pub enabled: bool,
    pub biome: Biome,
    pub biome_area: BiomeArea,
    pub max_spawned: i32,
    /// Seconds between spawn checks.
    pub spawn_interval: f32,
    /// Percent chance per check.
    pub spawn_chance: f32,
    pub required_global_key: String,
    pub required_environments: Vec<String>,
    pub group_size_min: i32,
    pub group_size_max: i32,
    pub spawn_at_day: bool,
    pub spawn_at_night: bool,
    pub min_altitude: f32,
    pub max_altitude: f32,
    pub in_forest: bool,
    pub outside_forest: bool,
    pub min_ocean_depth: f32,
    pub max_ocean_depth: f32,
    pub hunt_player: bool,
    pub ground_offset: f32,
    pub max_level: i32,
}

/// One entry of a creature drop table.
#[derive(Clone, Debug, PartialEq)]
pub struct DropDescriptor {
    pub prefab: Entity,
    pub amount_min: i32,
    pub amount_max: i32,
    /// Probability in [0, 1].
    pub chance: f32,
    pub one_per_player: bool,
    pub level_multiplier: bool,
}
