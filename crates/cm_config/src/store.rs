use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bevy::log::{debug, warn};

use crate::config_io::{load_config_file, save_config_file, ConfigFile, ConfigIoError};
use crate::entry::{ConfigDescription, ConfigEntry, ConfigKey, EntryInfo, ErasedEntry};
use crate::value::ConfigValue;

pub(crate) struct StoreShared {
    /// Persisted text per key: loaded from disk or recorded on set.
    stored: RefCell<BTreeMap<ConfigKey, String>>,
    entries: RefCell<Vec<Rc<dyn ErasedEntry>>>,
    path: Option<PathBuf>,
    save_on_set: Cell<bool>,
}

impl StoreShared {
    pub(crate) fn record(&self, key: &ConfigKey, text: String) {
        self.stored.borrow_mut().insert(key.clone(), text);
        if self.save_on_set.get() {
            if let Err(e) = self.save() {
                warn!("failed to save config after setting {}: {}", key, e);
            }
        }
    }

    fn save(&self) -> Result<(), ConfigIoError> {
        let entries: Vec<Rc<dyn ErasedEntry>> = self.entries.borrow().clone();
        {
            let mut stored = self.stored.borrow_mut();
            for entry in &entries {
                stored.insert(entry.key().clone(), entry.current_string());
            }
        }
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = ConfigFile::from_values(self.stored.borrow().iter());
        save_config_file(path, &file)?;
        debug!("saved {} config values to {}", entries.len(), path.display());
        Ok(())
    }
}

/// The external configuration store.
///
/// A cheap, clonable handle. Lives on the host's main thread, so it is kept as
/// a non-send resource.
#[derive(Clone)]
pub struct ConfigStore {
    shared: Rc<StoreShared>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl ConfigStore {
    /// A store with no backing file. `save` only snapshots values.
    pub fn in_memory() -> Self {
        Self::with_values(None, BTreeMap::new())
    }

    /// Open a store backed by a RON file, loading it if it exists.
    pub fn open(path: &Path) -> Result<Self, ConfigIoError> {
        let stored = if path.exists() {
            load_config_file(path)?.into_values()
        } else {
            BTreeMap::new()
        };
        Ok(Self::with_values(Some(path.to_path_buf()), stored))
    }

    fn with_values(path: Option<PathBuf>, stored: BTreeMap<ConfigKey, String>) -> Self {
        Self {
            shared: Rc::new(StoreShared {
                stored: RefCell::new(stored),
                entries: RefCell::new(Vec::new()),
                path,
                save_on_set: Cell::new(true),
            }),
        }
    }

    /// Bind a typed entry.
    ///
    /// A persisted value for the key always wins over `default`. Binding a key
    /// that is already bound with the same value type returns the live entry,
    /// so every caller shares one value. Call `unbind` first to start over.
    pub fn bind<T: ConfigValue>(
        &self,
        group: &str,
        key: &str,
        default: T,
        description: ConfigDescription<T>,
    ) -> ConfigEntry<T> {
        let key = ConfigKey::new(group, key);
        let existing = self
            .shared
            .entries
            .borrow()
            .iter()
            .find(|e| *e.key() == key)
            .cloned();
        if let Some(existing) = existing {
            match ConfigEntry::<T>::from_erased(existing) {
                Some(entry) => return entry,
                None => {
                    warn!("{} rebound with a different value type, replacing it", key);
                    self.unbind(&key);
                }
            }
        }

        let persisted = self.shared.stored.borrow().get(&key).cloned();
        let initial = match persisted {
            Some(text) => T::from_config_str(&text).unwrap_or_else(|| {
                warn!("unparsable stored value {:?} for {}, using default", text, key);
                default.clone()
            }),
            None => default.clone(),
        };

        let entry = ConfigEntry::new(key, default, initial, description, Rc::downgrade(&self.shared));
        self.shared.entries.borrow_mut().push(entry.erased());
        entry
    }

    /// Forget a bound entry and its change callbacks. Its value stays stored,
    /// so binding the key again picks it up.
    pub fn unbind(&self, key: &ConfigKey) -> bool {
        let mut entries = self.shared.entries.borrow_mut();
        let Some(index) = entries.iter().position(|e| e.key() == key) else {
            return false;
        };
        let entry = entries.remove(index);
        self.shared
            .stored
            .borrow_mut()
            .insert(key.clone(), entry.current_string());
        true
    }

    /// Unbind every entry of a group. Returns how many were bound.
    pub fn unbind_group(&self, group: &str) -> usize {
        let keys: Vec<ConfigKey> = self
            .shared
            .entries
            .borrow()
            .iter()
            .filter(|e| e.key().group == group)
            .map(|e| e.key().clone())
            .collect();
        keys.iter().filter(|key| self.unbind(key)).count()
    }

    /// The persisted text for a key, if any.
    pub fn stored(&self, key: &ConfigKey) -> Option<String> {
        self.shared.stored.borrow().get(key).cloned()
    }

    /// Seed or overwrite a persisted value without touching bound entries.
    pub fn insert_stored(&self, key: ConfigKey, text: impl Into<String>) {
        self.shared.stored.borrow_mut().insert(key, text.into());
    }

    pub fn is_bound(&self, key: &ConfigKey) -> bool {
        self.shared.entries.borrow().iter().any(|e| e.key() == key)
    }

    pub fn len(&self) -> usize {
        self.shared.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bound entries ordered by group, then by descending order.
    pub fn entries(&self) -> Vec<EntryInfo> {
        let mut infos: Vec<EntryInfo> = self.shared.entries.borrow().iter().map(|e| e.info()).collect();
        infos.sort_by(|a, b| {
            a.key
                .group
                .cmp(&b.key.group)
                .then(b.order.unwrap_or(0).cmp(&a.order.unwrap_or(0)))
        });
        infos
    }

    pub fn save(&self) -> Result<(), ConfigIoError> {
        self.shared.save()
    }

    /// Re-read the backing file and push changed values into bound entries.
    pub fn reload(&self) -> Result<(), ConfigIoError> {
        let Some(path) = &self.shared.path else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        let values = load_config_file(path)?.into_values();
        *self.shared.stored.borrow_mut() = values.clone();

        let entries: Vec<Rc<dyn ErasedEntry>> = self.shared.entries.borrow().clone();
        for entry in entries {
            if let Some(text) = values.get(entry.key()) {
                entry.apply_stored(text);
            }
        }
        Ok(())
    }

    pub fn save_on_set(&self) -> bool {
        self.shared.save_on_set.get()
    }

    pub fn set_save_on_set(&self, enabled: bool) {
        self.shared.save_on_set.set(enabled);
    }

    /// Run `f` with auto-save off, then save once if auto-save was on.
    pub fn with_auto_save_suspended<R>(&self, f: impl FnOnce() -> R) -> R {
        let was_enabled = self.save_on_set();
        self.set_save_on_set(false);
        let result = f();
        if was_enabled {
            self.set_save_on_set(true);
            if let Err(e) = self.save() {
                warn!("failed to save config: {}", e);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Visibility;
    use cm_core::{Range, SpawnOption};
    use std::cell::Cell;
    use tempfile::tempdir;

    #[test]
    fn default_used_without_persisted_value() {
        let store = ConfigStore::in_memory();
        let entry = store.bind("Boar", "Spawn chance", 100.0f32, ConfigDescription::new("chance"));
        assert_eq!(entry.value(), 100.0);
    }

    #[test]
    fn persisted_value_beats_default() {
        let store = ConfigStore::in_memory();
        store.insert_stored(ConfigKey::new("Boar", "Spawn chance"), "25");
        let entry = store.bind("Boar", "Spawn chance", 100.0f32, ConfigDescription::new("chance"));
        assert_eq!(entry.value(), 25.0);
    }

    #[test]
    fn unparsable_persisted_value_falls_back() {
        let store = ConfigStore::in_memory();
        store.insert_stored(ConfigKey::new("Boar", "Maximum"), "lots");
        let entry = store.bind("Boar", "Maximum", 2i32, ConfigDescription::new("max"));
        assert_eq!(entry.value(), 2);
    }

    #[test]
    fn set_value_fires_listeners_once_per_change() {
        let store = ConfigStore::in_memory();
        let entry = store.bind("Boar", "Spawn", SpawnOption::Default, ConfigDescription::new("spawn"));
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        entry.on_changed(move |_| counter.set(counter.get() + 1));

        entry.set_value(SpawnOption::Disabled);
        entry.set_value(SpawnOption::Disabled);
        assert_eq!(fired.get(), 1);
        assert_eq!(store.stored(entry.key()).as_deref(), Some("Disabled"));
    }

    #[test]
    fn listener_may_set_values_reentrantly() {
        let store = ConfigStore::in_memory();
        let gate = store.bind("Boar", "Spawn", SpawnOption::Default, ConfigDescription::new("spawn"));
        let follower = store.bind("Boar", "Maximum", 1i32, ConfigDescription::new("max"));
        let inner_follower = follower.clone();
        gate.on_changed(move |spawn| {
            inner_follower.set_value(if *spawn == SpawnOption::Disabled { 0 } else { 1 });
        });

        gate.set_value(SpawnOption::Disabled);
        assert_eq!(follower.value(), 0);
    }

    #[test]
    fn binding_a_bound_key_shares_the_entry() {
        let store = ConfigStore::in_memory();
        let first = store.bind("Boar", "Maximum", 1i32, ConfigDescription::new("max"));
        let second = store.bind("Boar", "Maximum", 3i32, ConfigDescription::new("max"));
        assert!(first.same_entry(&second));
        assert_eq!(store.len(), 1);

        second.set_value(5);
        assert_eq!(first.value(), 5);
    }

    #[test]
    fn rebinding_with_another_type_replaces_the_entry() {
        let store = ConfigStore::in_memory();
        store.bind("Boar", "Maximum", 1i32, ConfigDescription::new("max"));
        let text = store.bind("Boar", "Maximum", String::new(), ConfigDescription::new("max"));
        assert_eq!(text.value(), "1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unbinding_keeps_live_value_and_drops_old_listeners() {
        let store = ConfigStore::in_memory();
        let first = store.bind("Boar", "Maximum", 1i32, ConfigDescription::new("max"));
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        first.on_changed(move |_| counter.set(counter.get() + 1));
        first.set_value(4);

        assert_eq!(store.unbind_group("Boar"), 1);
        assert!(store.is_empty());
        let second = store.bind("Boar", "Maximum", 1i32, ConfigDescription::new("max"));
        assert!(!first.same_entry(&second));
        assert_eq!(second.value(), 4);

        second.set_value(5);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn acceptable_values_clamp_to_first() {
        let store = ConfigStore::in_memory();
        let entry = store.bind(
            "Boar",
            "Spawn",
            SpawnOption::Default,
            ConfigDescription::new("spawn").with_acceptable(vec![SpawnOption::Default, SpawnOption::Custom]),
        );
        entry.set_value(SpawnOption::Disabled);
        assert_eq!(entry.value(), SpawnOption::Default);
    }

    #[test]
    fn range_entries_carry_the_range_drawer() {
        let store = ConfigStore::in_memory();
        let entry = store.bind("Boar", "Group size", Range::new(1.0, 2.0), ConfigDescription::new("size"));
        assert_eq!(entry.attributes().drawer, crate::Drawer::Range);
    }

    #[test]
    fn entries_list_hidden_fields_as_not_browsable() {
        let store = ConfigStore::in_memory();
        let visibility = Visibility::new(false);
        store.bind("Boar", "Food items", String::new(), ConfigDescription::new("food").with_order(-2).with_visibility(visibility.clone()));
        store.bind("Boar", "Can be tamed", true, ConfigDescription::new("tame").with_order(-1));

        let infos = store.entries();
        assert_eq!(infos[0].key.key, "Can be tamed");
        assert!(!infos[1].browsable);
        visibility.set(true);
        assert!(store.entries()[1].browsable);
    }

    #[test]
    fn save_and_reopen_round_trips_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("creatures.ron");

        let store = ConfigStore::open(&path).unwrap();
        let entry = store.bind("Boar", "Group size", Range::new(1.0, 1.0), ConfigDescription::new("size"));
        entry.set_value(Range::new(2.0, 4.0));
        assert!(path.exists());

        let reopened = ConfigStore::open(&path).unwrap();
        let entry = reopened.bind("Boar", "Group size", Range::new(1.0, 1.0), ConfigDescription::new("size"));
        assert_eq!(entry.value(), Range::new(2.0, 4.0));
    }

    #[test]
    fn suspended_auto_save_writes_once_at_the_end() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("creatures.ron");
        let store = ConfigStore::open(&path).unwrap();

        store.with_auto_save_suspended(|| {
            let entry = store.bind("Boar", "Maximum", 1i32, ConfigDescription::new("max"));
            entry.set_value(3);
            assert!(!path.exists());
        });
        assert!(path.exists());
        assert!(store.save_on_set());
    }

    #[test]
    fn reload_pushes_file_changes_into_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("creatures.ron");
        let store = ConfigStore::open(&path).unwrap();
        let entry = store.bind("Boar", "Maximum", 1i32, ConfigDescription::new("max"));
        store.save().unwrap();

        let other = ConfigStore::open(&path).unwrap();
        other.bind("Boar", "Maximum", 1i32, ConfigDescription::new("max")).set_value(7);

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        entry.on_changed(move |_| flag.set(true));
        store.reload().unwrap();
        assert_eq!(entry.value(), 7);
        assert!(fired.get());
    }
}
