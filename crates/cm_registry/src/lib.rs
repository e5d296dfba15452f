use bevy::prelude::*;

pub mod asset_cache;
pub mod definition;
pub mod error;
pub mod localize;
pub mod registry;

pub use asset_cache::{
    register_prefab, AssetCache, Bundle, BundleHandle, BundleId, BundleSource, PrefabAsset,
    RegisteredPrefabs, RonBundleSource, DEFAULT_BUNDLE_FOLDER,
};
pub use definition::{CreatureDefinition, DropEntry, DropList};
pub use error::{AssetError, RegistryError};
pub use localize::{localize_with, relay, LocalizeKey, FALLBACK_LANGUAGE};
pub use registry::{CreatureId, CreatureRegistry};

/// Registry plugin. Holds the creature registry, bundle cache and loaded prefabs.
pub struct CmRegistryPlugin;

impl Plugin for CmRegistryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CreatureRegistry>()
            .init_resource::<AssetCache>()
            .init_resource::<RegisteredPrefabs>();
    }
}

/// Register a prefab entity as a creature.
pub fn register_creature(world: &mut World, prefab: Entity) -> Result<CreatureId, RegistryError> {
    let definition = CreatureDefinition::from_prefab(world, prefab)?;
    Ok(world
        .get_resource_or_insert_with(CreatureRegistry::default)
        .register(definition))
}

/// Load a bundle through the cache, instantiate one of its prefabs and
/// register it as a creature.
pub fn load_creature(
    world: &mut World,
    source: &dyn BundleSource,
    file_name: &str,
    folder_name: &str,
    prefab_name: &str,
) -> Result<CreatureId, RegistryError> {
    let bundle = world
        .get_resource_or_insert_with(AssetCache::default)
        .load(source, file_name, folder_name)?;
    let prefab = register_prefab(world, &bundle, prefab_name)?;
    register_creature(world, prefab)
}
