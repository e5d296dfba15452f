//! Headless demo host: registers creatures from a bundle, then drives startup,
//! several world load cycles and a live config change.

use std::rc::Rc;
use std::sync::Arc;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use cm_config::{ConfigCollaborators, ConfigPresenter, ConfigStore};
use cm_core::{Biome, Forest, Range, SpawnOption, SpawnTime, Weather};
use cm_host::{
    AssetTableInit, EnglishText, ObjectDatabase, ObjectDatabaseInit, Prefab, PrefabTable, SceneInit,
    SpawnDescriptor, SpawnList, SpawnTable, SpawnTableInit, StartupUi, TextTable,
};
use cm_registry::{load_creature, localize_with, CreatureId, CreatureRegistry, RegistryError, RonBundleSource};
use cm_spawn::{CreatureConfigs, CreatureManagerPlugin};

const BUNDLE_FILE: &str = "wildlife.ron";
const WORLD_LOADS: usize = 3;

/// Logs the browsable config entries whenever visibility changes.
struct ListingPresenter {
    store: ConfigStore,
}

impl ConfigPresenter for ListingPresenter {
    fn rebuild(&self) {
        let entries = self.store.entries();
        let visible = entries.iter().filter(|e| e.browsable).count();
        info!("config listing: {} of {} entries browsable", visible, entries.len());
    }
}

fn main() {
    let mut app = App::new();
    let store = ConfigStore::in_memory();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .insert_non_send_resource(store.clone())
        .insert_non_send_resource(
            ConfigCollaborators::default()
                .with_presenter(Rc::new(ListingPresenter { store: store.clone() })),
        )
        .add_plugins(CreatureManagerPlugin);

    // Host-native prefab the boar drops, kept across world loads.
    let meat = app.world_mut().spawn(Prefab { name: "RawMeat".to_string() }).id();

    let creatures = match register_creatures(app.world_mut()) {
        Ok(creatures) => creatures,
        Err(e) => {
            error!("failed to register creatures: {}", e);
            return;
        }
    };

    // The host opens its UI once.
    app.world_mut().send_event(StartupUi);
    app.update();

    for load in 1..=WORLD_LOADS {
        load_world(&mut app, meat);
        info!("world load {}:", load);
        log_spawn_list(app.world());
    }

    // Disable the boar live, without reloading the world.
    let boar = creatures[0];
    let spawn = app
        .world()
        .non_send_resource::<CreatureConfigs>()
        .bindings
        .get(boar)
        .and_then(|config| config.spawn.entry().cloned());
    if let Some(spawn) = spawn {
        spawn.set_value(SpawnOption::Disabled);
        app.update();
        info!("after disabling {}:", spawn.key());
        log_spawn_list(app.world());
    }

    load_world(&mut app, meat);
    info!("after another world load:");
    log_spawn_list(app.world());
}

/// Load the bundle and register its creatures with their defaults.
fn register_creatures(world: &mut World) -> Result<Vec<CreatureId>, RegistryError> {
    let source = RonBundleSource::new(".");
    let folder = cm_registry::DEFAULT_BUNDLE_FOLDER;
    let boar = load_creature(world, &source, BUNDLE_FILE, folder, "Boar")?;
    let neck = load_creature(world, &source, BUNDLE_FILE, folder, "Neck")?;
    let razorback = load_creature(world, &source, BUNDLE_FILE, folder, "Razorback")?;

    let mut registry = world.resource_mut::<CreatureRegistry>();
    if let Some(definition) = registry.get_mut(boar) {
        definition.required_weather = Weather::CLEAR_SKIES | Weather::RAIN;
        definition.group_size = Range::new(1.0, 2.0);
        definition.drops.entry("RawMeat").amount = Range::new(1.0, 2.0);
    }
    if let Some(definition) = registry.get_mut(neck) {
        definition.biome = Biome::SWAMP;
        definition.forest_spawn = Forest::No;
        definition.drops.none();
    }
    if let Some(definition) = registry.get_mut(razorback) {
        definition.biome = Biome::BLACK_FOREST;
        definition.spawn_time = SpawnTime::Night;
        definition.can_spawn = false;
    }

    localize_with(world, "$enemy_boar", |key| {
        key.english("Boar").german("Wildschwein");
    });
    localize_with(world, "$enemy_neck", |key| {
        key.english("Neck").german("Neck");
    });
    localize_with(world, "$enemy_razorback", |key| {
        key.english("Razorback").german("Rasierrücken");
    });
    Ok(vec![boar, neck, razorback])
}

/// What the host does on a world load: reset its collections and fire the
/// lifecycle events in its usual order.
fn load_world(app: &mut App, meat: Entity) {
    let world = app.world_mut();
    {
        let mut prefabs = world.resource_mut::<PrefabTable>();
        prefabs.clear();
        prefabs.insert("RawMeat", meat);
    }
    world.resource_mut::<SpawnTable>().lists = vec![SpawnList {
        spawners: vec![Arc::new(native_spawner())],
    }];
    {
        let mut database = world.resource_mut::<ObjectDatabase>();
        database.items = vec!["Raspberry".to_string(), "Blueberries".to_string(), "Mushroom".to_string()];
        database.initialized = true;
    }

    world.send_event(AssetTableInit);
    world.send_event(SpawnTableInit);
    world.send_event(ObjectDatabaseInit);
    world.send_event(SceneInit);
    app.update();
}

fn native_spawner() -> SpawnDescriptor {
    SpawnDescriptor {
        name: "Deer".to_string(),
        prefab: Entity::PLACEHOLDER,
        enabled: true,
        biome: Biome::MEADOWS,
        biome_area: default(),
        max_spawned: 2,
        spawn_interval: 300.0,
        spawn_chance: 50.0,
        required_global_key: String::new(),
        required_environments: Vec::new(),
        group_size_min: 1,
        group_size_max: 3,
        spawn_at_day: true,
        spawn_at_night: true,
        min_altitude: 0.0,
        max_altitude: 1000.0,
        in_forest: true,
        outside_forest: true,
        min_ocean_depth: 0.0,
        max_ocean_depth: 0.0,
        hunt_player: false,
        ground_offset: 0.5,
        max_level: 1,
    }
}

fn log_spawn_list(world: &World) {
    let language = &world.resource::<TextTable>().selected_language;
    let english = world.resource::<EnglishText>();
    for list in &world.resource::<SpawnTable>().lists {
        for spawner in &list.spawners {
            info!(
                "  {} [{}] enabled={} biome={} group={}-{} weather={:?}",
                spawner.name,
                language,
                spawner.enabled,
                spawner.biome.to_names(),
                spawner.group_size_min,
                spawner.group_size_max,
                spawner.required_environments,
            );
        }
    }
    debug!("{} English words known", english.words.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_loads_reuse_host_prefabs() {
        let mut app = App::new();
        app.add_plugins(CreatureManagerPlugin);
        let meat = app.world_mut().spawn(Prefab { name: "RawMeat".to_string() }).id();
        let mut prefabs = app.world_mut().query::<&Prefab>();
        let prefabs_before = prefabs.iter(app.world()).count();

        for _ in 0..3 {
            load_world(&mut app, meat);
        }
        assert_eq!(prefabs.iter(app.world()).count(), prefabs_before);
        assert_eq!(app.world().resource::<PrefabTable>().get("RawMeat"), Some(meat));
        assert_eq!(app.world().resource::<SpawnTable>().lists[0].spawners.len(), 1);
    }
}
