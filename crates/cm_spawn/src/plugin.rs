use std::rc::Rc;

use bevy::log::{debug, error, info};
use bevy::prelude::*;
use cm_config::{CmConfigPlugin, ConfigCollaborators, ConfigStore};
use cm_core::CmCorePlugin;
use cm_host::{
    AssetTableInit, CharacterDrop, CmHostPlugin, EnglishText, MonsterAi, ObjectDatabase,
    ObjectDatabaseInit, PrefabTable, SceneInit, SpawnTable, SpawnTableInit, SpawnedFrom, StartupUi,
};
use cm_registry::{CmRegistryPlugin, CreatureRegistry, RegisteredPrefabs};

use crate::binding::{bind_all, BindingContext, CreatureBindings};
use crate::patches::{apply_ai, consume_items, drop_table, inject_prefabs};
use crate::reconcile::SpawnReconciler;
use crate::refresh::RefreshQueue;
use crate::synthesis::synthesize;

/// Live config bindings and the queue their callbacks write to.
/// Main-thread only, kept as a non-send resource.
#[derive(Default)]
pub struct CreatureConfigs {
    pub bindings: CreatureBindings,
    pub refresh: Rc<RefreshQueue>,
}

/// Wires every patch point to its host lifecycle event.
pub struct CreatureManagerPlugin;

impl Plugin for CreatureManagerPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<CmCorePlugin>() {
            app.add_plugins(CmCorePlugin);
        }
        if !app.is_plugin_added::<CmHostPlugin>() {
            app.add_plugins(CmHostPlugin);
        }
        if !app.is_plugin_added::<CmConfigPlugin>() {
            app.add_plugins(CmConfigPlugin);
        }
        if !app.is_plugin_added::<CmRegistryPlugin>() {
            app.add_plugins(CmRegistryPlugin);
        }

        app.init_resource::<SpawnReconciler>()
            .init_non_send_resource::<CreatureConfigs>()
            .add_systems(
                Update,
                (
                    bind_creature_configs,
                    inject_registered_prefabs,
                    apply_creature_drops,
                    reconcile_spawn_tables,
                    apply_creature_ai,
                    apply_pending_refresh,
                )
                    .chain(),
            );
    }
}

fn bind_creature_configs(
    mut events: EventReader<StartupUi>,
    mut registry: ResMut<CreatureRegistry>,
    english: Res<EnglishText>,
    store: NonSend<ConfigStore>,
    collaborators: NonSend<ConfigCollaborators>,
    mut configs: NonSendMut<CreatureConfigs>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    registry.seal();
    let display_name = |key: &str| english.localize(key);
    let context = BindingContext {
        display_name: &display_name,
        presenter: collaborators.presenter.clone(),
        sync: collaborators.sync.get(),
        refresh: configs.refresh.clone(),
    };
    configs.bindings = bind_all(&registry, &store, &context);
    collaborators.rebuild_presentation();

    // Stored values may differ from what is live in the host already.
    for (id, _) in registry.iter() {
        configs.refresh.mark_spawn(id);
        configs.refresh.mark_ai(id);
    }
}

fn inject_registered_prefabs(
    mut events: EventReader<AssetTableInit>,
    mut table: ResMut<PrefabTable>,
    registered: Res<RegisteredPrefabs>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let added = inject_prefabs(&mut table, &registered);
    debug!("injected {} creature prefabs into the prefab table", added);
}

fn apply_creature_drops(
    mut events: EventReader<SceneInit>,
    registry: Res<CreatureRegistry>,
    prefabs: Res<PrefabTable>,
    mut commands: Commands,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    for (_, definition) in registry.iter() {
        let Some(drops) = drop_table(definition, &prefabs) else {
            continue;
        };
        if let Some(mut entity) = commands.get_entity(definition.prefab) {
            debug!("{} drops {} items", definition.prefab_name, drops.len());
            entity.insert(CharacterDrop { drops });
        }
    }
}

fn reconcile_spawn_tables(
    mut events: EventReader<SpawnTableInit>,
    registry: Res<CreatureRegistry>,
    configs: NonSend<CreatureConfigs>,
    mut table: ResMut<SpawnTable>,
    mut reconciler: ResMut<SpawnReconciler>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    if let Err(e) = reconciler.reconcile(&mut table, &registry, &configs.bindings) {
        error!("spawn table left unchanged: {}", e);
    }
}

fn apply_creature_ai(
    mut events: EventReader<ObjectDatabaseInit>,
    registry: Res<CreatureRegistry>,
    configs: NonSend<CreatureConfigs>,
    database: Res<ObjectDatabase>,
    mut ais: Query<&mut MonsterAi>,
    mut commands: Commands,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    for (id, definition) in registry.iter() {
        let config = configs.bindings.config_for(id, definition);
        let food = consume_items(&config.food_items.get(), &database);
        apply_ai(
            &mut commands,
            &mut ais,
            definition.prefab,
            config.can_be_tamed.get().is_on(),
            &food,
        );
    }
    info!("applied AI settings to {} creature prefabs", registry.len());
}

/// Drains work queued by config callbacks since the last frame.
#[allow(clippy::too_many_arguments)]
fn apply_pending_refresh(
    registry: Res<CreatureRegistry>,
    configs: NonSend<CreatureConfigs>,
    database: Res<ObjectDatabase>,
    mut reconciler: ResMut<SpawnReconciler>,
    mut table: ResMut<SpawnTable>,
    instances: Query<(Entity, &SpawnedFrom)>,
    mut ais: Query<&mut MonsterAi>,
    mut commands: Commands,
) {
    if configs.refresh.is_empty() {
        return;
    }

    for id in configs.refresh.take_spawns() {
        let Some(definition) = registry.get(id) else {
            continue;
        };
        let config = configs.bindings.config_for(id, definition);
        match synthesize(definition, &config) {
            Ok(descriptor) => {
                if reconciler.refresh(&mut table, id, descriptor) {
                    debug!("refreshed spawn descriptor of {}", definition.prefab_name);
                }
            }
            Err(e) => error!("kept spawn descriptor of {}: {}", definition.prefab_name, e),
        }
    }

    let ai = configs.refresh.take_ai();
    if !database.initialized {
        // The object database patch point applies current values when it runs.
        return;
    }
    for id in ai {
        let Some(definition) = registry.get(id) else {
            continue;
        };
        let config = configs.bindings.config_for(id, definition);
        let food = consume_items(&config.food_items.get(), &database);
        let can_be_tamed = config.can_be_tamed.get().is_on();

        let targets = std::iter::once(definition.prefab).chain(
            instances
                .iter()
                .filter(|(_, from)| from.0 == definition.prefab)
                .map(|(entity, _)| entity),
        );
        for target in targets {
            apply_ai(&mut commands, &mut ais, target, can_be_tamed, &food);
        }
    }
}
