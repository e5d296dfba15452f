//! Turns a creature's current bindings into a host spawn descriptor.

use cm_core::{BiomeArea, Forest, SpawnArea, SpawnOption, SpawnTime, SynthesisError};
use cm_host::SpawnDescriptor;
use cm_registry::CreatureDefinition;

use crate::binding::CreatureConfig;

/// Highest star level for creatures that can have stars.
pub const MAX_LEVEL_WITH_STARS: i32 = 3;
/// Level for creatures that never get stars.
pub const MAX_LEVEL_WITHOUT_STARS: i32 = 1;

fn biome_area(area: SpawnArea) -> BiomeArea {
    match area {
        SpawnArea::Center => BiomeArea::Median,
        SpawnArea::Edge => BiomeArea::Edge,
        SpawnArea::Everywhere => BiomeArea::Everything,
    }
}

/// (at day, at night)
fn day_night(time: SpawnTime) -> (bool, bool) {
    match time {
        SpawnTime::Day => (true, false),
        SpawnTime::Night => (false, true),
        SpawnTime::Always => (true, true),
    }
}

/// (in forest, outside forest)
fn forest_flags(forest: Forest) -> (bool, bool) {
    match forest {
        Forest::Yes => (true, false),
        Forest::No => (false, true),
        Forest::Both => (true, true),
    }
}

/// Build a complete descriptor from the current binding values.
///
/// Never touches a previously built descriptor.
pub fn synthesize(definition: &CreatureDefinition, config: &CreatureConfig) -> Result<SpawnDescriptor, SynthesisError> {
    let (spawn_at_day, spawn_at_night) = day_night(config.spawn_time.get());
    let (in_forest, outside_forest) = forest_flags(config.forest_spawn.get());
    let group_size = config.group_size.get();
    let altitude = config.required_altitude.get();
    let ocean_depth = config.required_ocean_depth.get();

    let required_global_key = config.required_global_key.get().internal_name()?.to_string();
    let required_environments = config
        .required_weather
        .get()
        .internal_names()?
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(SpawnDescriptor {
        name: definition.prefab_name.clone(),
        prefab: definition.prefab,
        enabled: config.spawn.get() != SpawnOption::Disabled,
        biome: config.biome.get(),
        biome_area: biome_area(config.spawn_area.get()),
        max_spawned: config.maximum.get(),
        spawn_interval: config.check_spawn_interval.get() as f32,
        spawn_chance: config.spawn_chance.get(),
        required_global_key,
        required_environments,
        group_size_min: group_size.min as i32,
        group_size_max: group_size.max as i32,
        spawn_at_day,
        spawn_at_night,
        min_altitude: altitude.min,
        max_altitude: altitude.max,
        in_forest,
        outside_forest,
        min_ocean_depth: ocean_depth.min,
        max_ocean_depth: ocean_depth.max,
        hunt_player: config.attack_immediately.get().is_on(),
        ground_offset: config.spawn_altitude.get(),
        max_level: if config.can_have_stars.get().is_on() {
            MAX_LEVEL_WITH_STARS
        } else {
            MAX_LEVEL_WITHOUT_STARS
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Entity;
    use cm_core::{Biome, GlobalKey, Range, Weather};

    fn boar() -> CreatureDefinition {
        let mut definition = CreatureDefinition::new(Entity::from_raw(7), "Boar", "$enemy_boar");
        definition.required_weather = Weather::CLEAR_SKIES | Weather::RAIN;
        definition
    }

    #[test]
    fn defaults_produce_an_enabled_meadows_descriptor() {
        let definition = boar();
        let descriptor = synthesize(&definition, &CreatureConfig::fixed(&definition)).unwrap();

        assert_eq!(descriptor.name, "Boar");
        assert_eq!(descriptor.prefab, Entity::from_raw(7));
        assert!(descriptor.enabled);
        assert_eq!(descriptor.biome, Biome::MEADOWS);
        assert_eq!((descriptor.group_size_min, descriptor.group_size_max), (1, 1));
        assert_eq!(descriptor.required_environments, vec!["Clear", "Rain"]);
        assert_eq!(descriptor.required_global_key, "");
        assert_eq!(descriptor.biome_area, BiomeArea::Everything);
        assert_eq!(descriptor.max_level, MAX_LEVEL_WITH_STARS);
        assert_eq!(descriptor.spawn_interval, 600.0);
    }

    #[test]
    fn disabled_spawn_yields_disabled_descriptor() {
        let mut definition = boar();
        definition.can_spawn = false;
        let descriptor = synthesize(&definition, &CreatureConfig::fixed(&definition)).unwrap();
        assert!(!descriptor.enabled);
    }

    #[test]
    fn enumerations_map_through_their_tables() {
        let mut definition = boar();
        definition.spawn_time = SpawnTime::Night;
        definition.forest_spawn = Forest::Yes;
        definition.spawn_area = SpawnArea::Center;
        definition.required_global_key = GlobalKey::KilledElder;
        definition.can_have_stars = false;
        definition.group_size = Range::new(2.7, 4.2);

        let descriptor = synthesize(&definition, &CreatureConfig::fixed(&definition)).unwrap();
        assert_eq!((descriptor.spawn_at_day, descriptor.spawn_at_night), (false, true));
        assert_eq!((descriptor.in_forest, descriptor.outside_forest), (true, false));
        assert_eq!(descriptor.biome_area, BiomeArea::Median);
        assert_eq!(descriptor.required_global_key, "defeated_gdking");
        assert_eq!(descriptor.max_level, MAX_LEVEL_WITHOUT_STARS);
        assert_eq!((descriptor.group_size_min, descriptor.group_size_max), (2, 4));
    }

    #[test]
    fn empty_weather_means_no_environment_keys() {
        let mut definition = boar();
        definition.required_weather = Weather::empty();
        let descriptor = synthesize(&definition, &CreatureConfig::fixed(&definition)).unwrap();
        assert!(descriptor.required_environments.is_empty());
    }

    #[test]
    fn unmapped_weather_bit_fails() {
        let mut definition = boar();
        definition.required_weather = Weather::from_bits_retain(1 << 1);
        let result = synthesize(&definition, &CreatureConfig::fixed(&definition));
        assert!(matches!(result, Err(SynthesisError::UnmappedEnumeration { kind: "Weather", .. })));
    }

    #[test]
    fn synthesis_is_repeatable() {
        let definition = boar();
        let config = CreatureConfig::fixed(&definition);
        assert_eq!(synthesize(&definition, &config), synthesize(&definition, &config));
    }
}
