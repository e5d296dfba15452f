use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;

use crate::SpawnDescriptor;

/// Prefabs the host can instantiate by name.
#[derive(Resource, Debug, Default)]
pub struct PrefabTable {
    pub prefabs: Vec<Entity>,
    names: HashMap<String, Entity>,
}

impl PrefabTable {
    /// Add a prefab under its name. Returns false if the entity is already present.
    pub fn insert(&mut self, name: &str, prefab: Entity) -> bool {
        if self.prefabs.contains(&prefab) {
            return false;
        }
        self.prefabs.push(prefab);
        self.names.insert(name.to_string(), prefab);
        true
    }

    pub fn get(&self, name: &str) -> Option<Entity> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, prefab: Entity) -> bool {
        self.prefabs.contains(&prefab)
    }

    pub fn clear(&mut self) {
        self.prefabs.clear();
        self.names.clear();
    }
}

/// A host spawn list. Entries are shared handles so they can be removed by identity.
#[derive(Debug, Default, Clone)]
pub struct SpawnList {
    pub spawners: Vec<Arc<SpawnDescriptor>>,
}

impl SpawnList {
    /// Position of this exact descriptor instance.
    pub fn position_of(&self, descriptor: &Arc<SpawnDescriptor>) -> Option<usize> {
        self.spawners.iter().position(|d| Arc::ptr_eq(d, descriptor))
    }

    /// Remove this exact descriptor instance. Equal-valued entries are kept.
    pub fn remove_instance(&mut self, descriptor: &Arc<SpawnDescriptor>) -> bool {
        match self.position_of(descriptor) {
            Some(index) => {
                self.spawners.remove(index);
                true
            }
            None => false,
        }
    }
}

/// The host's spawn lists. Native and third-party entries live here too.
#[derive(Resource, Debug, Default)]
pub struct SpawnTable {
    pub lists: Vec<SpawnList>,
}

/// Items known to the host, by prefab name. Empty until the database initializes.
#[derive(Resource, Debug, Default)]
pub struct ObjectDatabase {
    pub items: Vec<String>,
    pub initialized: bool,
}

impl ObjectDatabase {
    pub fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|item| item == name)
    }
}

/// The host's live text lookup for the selected language.
#[derive(Resource, Debug)]
pub struct TextTable {
    pub selected_language: String,
    pub words: HashMap<String, String>,
}

impl Default for TextTable {
    fn default() -> Self {
        Self {
            selected_language: "English".to_string(),
            words: HashMap::new(),
        }
    }
}

impl TextTable {
    pub fn add_word(&mut self, key: &str, text: &str) {
        self.words.insert(key.to_string(), text.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.words.contains_key(key)
    }
}

/// The host's English text, independent of the selected language.
#[derive(Resource, Debug, Default)]
pub struct EnglishText {
    pub words: HashMap<String, String>,
}

impl EnglishText {
    /// Translate a `$key`; unknown keys come back without the `$`.
    pub fn localize(&self, key: &str) -> String {
        let bare = key.trim_start_matches('$');
        self.words
            .get(bare)
            .cloned()
            .unwrap_or_else(|| bare.to_string())
    }
}
