//! Content bundles, the bundle cache, and prefab registration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy::log::{debug, info};
use bevy::prelude::*;
use cm_host::{Character, MonsterAi, Prefab, Tameable};
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Default folder bundles are looked up in.
pub const DEFAULT_BUNDLE_FOLDER: &str = "assets";

/// Cache key for a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BundleId {
    pub file_name: String,
    pub folder_name: String,
}

impl BundleId {
    pub fn new(file_name: impl Into<String>, folder_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            folder_name: folder_name.into(),
        }
    }
}

/// A prefab template shipped inside a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabAsset {
    pub name: String,
    /// Localization key of the character name.
    pub character_name: String,
    #[serde(default)]
    pub tameable: bool,
    /// Item names the monster eats. `None` for prefabs without monster AI.
    #[serde(default)]
    pub consume_items: Option<Vec<String>>,
}

/// An external content bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub name: String,
    pub prefabs: Vec<PrefabAsset>,
}

impl Bundle {
    pub fn prefab(&self, name: &str) -> Option<&PrefabAsset> {
        self.prefabs.iter().find(|p| p.name == name)
    }
}

/// Stable handle to a loaded bundle.
pub type BundleHandle = Arc<Bundle>;

/// Where bundles come from.
pub trait BundleSource {
    /// A bundle the host already has loaded under this file name.
    fn find_loaded(&self, _file_name: &str) -> Option<BundleHandle> {
        None
    }

    fn open(&self, id: &BundleId) -> Result<Bundle, AssetError>;
}

/// Reads bundles as RON files at `<root>/<folder>/<file>`.
pub struct RonBundleSource {
    root: PathBuf,
}

impl RonBundleSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: &BundleId) -> PathBuf {
        self.root.join(&id.folder_name).join(&id.file_name)
    }
}

impl BundleSource for RonBundleSource {
    fn open(&self, id: &BundleId) -> Result<Bundle, AssetError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(AssetError::NotFound {
                file: id.file_name.clone(),
                folder: id.folder_name.clone(),
            });
        }
        load_bundle(&path, &id.file_name)
    }
}

fn load_bundle(path: &Path, name: &str) -> Result<Bundle, AssetError> {
    let contents = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut bundle: Bundle = ron::from_str(&contents).map_err(|source| AssetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if bundle.name.is_empty() {
        bundle.name = name.to_string();
    }
    Ok(bundle)
}

/// Memoizes bundle loads by `(file, folder)`.
#[derive(Resource, Default)]
pub struct AssetCache {
    bundles: HashMap<BundleId, BundleHandle>,
}

impl AssetCache {
    /// Load a bundle once. Repeated requests return the same handle.
    ///
    /// A bundle the host already loaded is preferred over reading it again.
    pub fn load(
        &mut self,
        source: &dyn BundleSource,
        file_name: &str,
        folder_name: &str,
    ) -> Result<BundleHandle, AssetError> {
        let id = BundleId::new(file_name, folder_name);
        if let Some(handle) = self.bundles.get(&id) {
            return Ok(handle.clone());
        }

        let handle = match source.find_loaded(file_name) {
            Some(handle) => handle,
            None => Arc::new(source.open(&id)?),
        };
        debug!("loaded asset bundle {}/{}", folder_name, file_name);
        self.bundles.insert(id, handle.clone());
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

/// Prefabs loaded from bundles, waiting to be added to the host prefab table.
#[derive(Resource, Debug, Default)]
pub struct RegisteredPrefabs {
    pub prefabs: Vec<(String, Entity)>,
}

/// Instantiate a prefab template from a bundle as a prefab entity.
pub fn register_prefab(world: &mut World, bundle: &Bundle, prefab_name: &str) -> Result<Entity, AssetError> {
    let asset = bundle
        .prefab(prefab_name)
        .ok_or_else(|| AssetError::PrefabNotFound {
            bundle: bundle.name.clone(),
            prefab: prefab_name.to_string(),
        })?;

    let mut entity = world.spawn((
        Prefab {
            name: asset.name.clone(),
        },
        Character {
            name: asset.character_name.clone(),
        },
    ));
    if asset.tameable {
        entity.insert(Tameable);
    }
    if let Some(items) = &asset.consume_items {
        entity.insert(MonsterAi {
            consume_items: items.clone(),
        });
    }
    let id = entity.id();

    world
        .get_resource_or_insert_with(RegisteredPrefabs::default)
        .prefabs
        .push((asset.name.clone(), id));
    info!("registered prefab {} from bundle {}", asset.name, bundle.name);
    Ok(id)
}
