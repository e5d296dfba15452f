//! Binds every tunable creature field to the config store.

use std::collections::BTreeSet;
use std::rc::Rc;

use bevy::log::info;
use cm_config::{ConfigDescription, ConfigEntry, ConfigPresenter, ConfigStore, ConfigSync, ConfigValue, Visibility};
use cm_core::{Biome, Forest, GlobalKey, Range, SpawnArea, SpawnOption, SpawnTime, Toggle, Weather};
use cm_registry::{CreatureDefinition, CreatureId, CreatureRegistry};

use crate::refresh::RefreshQueue;

/// A tunable value: either a live config entry or a fixed default.
pub struct ConfigBinding<T: ConfigValue> {
    entry: Option<ConfigEntry<T>>,
    fixed: T,
}

impl<T: ConfigValue> Clone for ConfigBinding<T> {
    fn clone(&self) -> Self {
        Self {
            entry: self.entry.clone(),
            fixed: self.fixed.clone(),
        }
    }
}

impl<T: ConfigValue> ConfigBinding<T> {
    pub fn live(entry: ConfigEntry<T>) -> Self {
        let fixed = entry.default_value().clone();
        Self {
            entry: Some(entry),
            fixed,
        }
    }

    pub fn fixed(value: T) -> Self {
        Self { entry: None, fixed: value }
    }

    /// Current value: the live entry's if bound, the fixed default otherwise.
    pub fn get(&self) -> T {
        match &self.entry {
            Some(entry) => entry.value(),
            None => self.fixed.clone(),
        }
    }

    pub fn entry(&self) -> Option<&ConfigEntry<T>> {
        self.entry.as_ref()
    }

    /// Whether the presentation layer may draw this as a range editor.
    pub fn is_range(&self) -> bool {
        T::drawer() == cm_config::Drawer::Range
    }
}

/// Every binding of one creature.
#[derive(Clone)]
pub struct CreatureConfig {
    pub spawn: ConfigBinding<SpawnOption>,
    pub can_be_tamed: ConfigBinding<Toggle>,
    pub food_items: ConfigBinding<String>,
    pub spawn_time: ConfigBinding<SpawnTime>,
    pub required_altitude: ConfigBinding<Range>,
    pub required_ocean_depth: ConfigBinding<Range>,
    pub required_global_key: ConfigBinding<GlobalKey>,
    pub group_size: ConfigBinding<Range>,
    pub biome: ConfigBinding<Biome>,
    pub spawn_area: ConfigBinding<SpawnArea>,
    pub required_weather: ConfigBinding<Weather>,
    pub spawn_altitude: ConfigBinding<f32>,
    pub can_have_stars: ConfigBinding<Toggle>,
    pub attack_immediately: ConfigBinding<Toggle>,
    pub check_spawn_interval: ConfigBinding<i32>,
    pub spawn_chance: ConfigBinding<f32>,
    pub forest_spawn: ConfigBinding<Forest>,
    pub maximum: ConfigBinding<i32>,
    /// Food items are browsable only while taming is on.
    pub tame_visibility: Visibility,
    /// Spawn details are browsable only for custom spawns.
    pub spawn_visibility: Visibility,
}

fn spawn_option(definition: &CreatureDefinition) -> SpawnOption {
    if definition.can_spawn {
        SpawnOption::Default
    } else {
        SpawnOption::Disabled
    }
}

impl CreatureConfig {
    /// Bindings that only ever return the definition's defaults.
    pub fn fixed(definition: &CreatureDefinition) -> Self {
        let spawn = spawn_option(definition);
        Self {
            spawn: ConfigBinding::fixed(spawn),
            can_be_tamed: ConfigBinding::fixed(Toggle::from(definition.can_be_tamed)),
            food_items: ConfigBinding::fixed(definition.food_items.clone()),
            spawn_time: ConfigBinding::fixed(definition.spawn_time),
            required_altitude: ConfigBinding::fixed(definition.required_altitude),
            required_ocean_depth: ConfigBinding::fixed(definition.required_ocean_depth),
            required_global_key: ConfigBinding::fixed(definition.required_global_key),
            group_size: ConfigBinding::fixed(definition.group_size),
            biome: ConfigBinding::fixed(definition.biome),
            spawn_area: ConfigBinding::fixed(definition.spawn_area),
            required_weather: ConfigBinding::fixed(definition.required_weather),
            spawn_altitude: ConfigBinding::fixed(definition.spawn_altitude),
            can_have_stars: ConfigBinding::fixed(Toggle::from(definition.can_have_stars)),
            attack_immediately: ConfigBinding::fixed(Toggle::from(definition.attack_immediately)),
            check_spawn_interval: ConfigBinding::fixed(definition.check_spawn_interval),
            spawn_chance: ConfigBinding::fixed(definition.spawn_chance),
            forest_spawn: ConfigBinding::fixed(definition.forest_spawn),
            maximum: ConfigBinding::fixed(definition.maximum),
            tame_visibility: Visibility::new(definition.can_be_tamed),
            spawn_visibility: Visibility::new(false),
        }
    }
}

/// Bindings for every creature, indexed by registry position.
#[derive(Clone, Default)]
pub struct CreatureBindings {
    configs: Vec<CreatureConfig>,
}

impl CreatureBindings {
    pub fn get(&self, id: CreatureId) -> Option<&CreatureConfig> {
        self.configs.get(id.0)
    }

    /// The bound config, or fixed defaults for creatures registered after binding.
    pub fn config_for(&self, id: CreatureId, definition: &CreatureDefinition) -> CreatureConfig {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| CreatureConfig::fixed(definition))
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

/// What the binding phase needs from its surroundings.
pub struct BindingContext<'a> {
    /// English display name for a character name key.
    pub display_name: &'a dyn Fn(&str) -> String,
    pub presenter: Option<Rc<dyn ConfigPresenter>>,
    pub sync: Option<Rc<dyn ConfigSync>>,
    pub refresh: Rc<RefreshQueue>,
}

/// Config group for a creature: its English name without quotes or brackets.
pub fn group_name(display_name: &str) -> String {
    display_name
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '[' | ']'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Binds fields of one group in declaration order.
struct GroupBinder<'a> {
    store: &'a ConfigStore,
    group: String,
    enabled: bool,
    order: i32,
    sync: Option<&'a Rc<dyn ConfigSync>>,
}

impl GroupBinder<'_> {
    fn bind<T: ConfigValue>(
        &mut self,
        name: &str,
        default: T,
        description: ConfigDescription<T>,
        on_change: impl Fn(&T) + 'static,
    ) -> ConfigBinding<T> {
        if !self.enabled {
            return ConfigBinding::fixed(default);
        }
        self.order -= 1;
        let entry = self
            .store
            .bind(&self.group, name, default, description.with_order(self.order));
        if let Some(sync) = self.sync {
            sync.register_for_sync(entry.key());
        }
        entry.on_changed(on_change);
        ConfigBinding::live(entry)
    }
}

fn rebuild_presentation(presenter: &Option<Rc<dyn ConfigPresenter>>) {
    if let Some(presenter) = presenter {
        presenter.rebuild();
    }
}

fn bind_creature(
    id: CreatureId,
    definition: &CreatureDefinition,
    store: &ConfigStore,
    context: &BindingContext,
) -> CreatureConfig {
    let mut binder = GroupBinder {
        store,
        group: group_name(&(context.display_name)(&definition.name_key)),
        enabled: definition.configuration_enabled,
        order: 0,
        sync: context.sync.as_ref(),
    };

    let tame_visibility = Visibility::new(false);
    let can_be_tamed = {
        let visibility = tame_visibility.clone();
        let presenter = context.presenter.clone();
        let refresh = context.refresh.clone();
        binder.bind(
            "Can be tamed",
            Toggle::from(definition.can_be_tamed),
            ConfigDescription::new("Decides, if the creature can be tamed."),
            move |toggle: &Toggle| {
                visibility.set(toggle.is_on());
                rebuild_presentation(&presenter);
                refresh.mark_ai(id);
            },
        )
    };
    tame_visibility.set(can_be_tamed.get().is_on());

    let food_items = {
        let refresh = context.refresh.clone();
        binder.bind(
            "Food items",
            definition.food_items.clone(),
            ConfigDescription::new("The items the creature consumes to get tame.")
                .with_visibility(tame_visibility.clone()),
            move |_: &String| refresh.mark_ai(id),
        )
    };

    let spawn_visibility = Visibility::new(false);
    let spawn = {
        let visibility = spawn_visibility.clone();
        let presenter = context.presenter.clone();
        let refresh = context.refresh.clone();
        binder.bind(
            "Spawn",
            spawn_option(definition),
            ConfigDescription::new("Configures the spawn for the creature."),
            move |option: &SpawnOption| {
                visibility.set(*option == SpawnOption::Custom);
                rebuild_presentation(&presenter);
                refresh.mark_spawn(id);
            },
        )
    };
    spawn_visibility.set(spawn.get() == SpawnOption::Custom);

    // Every spawn detail shares the same visibility gate and change handler.
    macro_rules! spawn_field {
        ($name:literal, $default:expr, $description:expr) => {{
            let refresh = context.refresh.clone();
            binder.bind(
                $name,
                $default,
                $description.with_visibility(spawn_visibility.clone()),
                move |_| refresh.mark_spawn(id),
            )
        }};
    }

    let spawn_time = spawn_field!(
        "Spawn time",
        definition.spawn_time,
        ConfigDescription::new("Configures the time of day for the creature to spawn.")
    );
    let required_altitude = spawn_field!(
        "Required altitude",
        definition.required_altitude,
        ConfigDescription::new("Configures the altitude required for the creature to spawn.")
    );
    let required_ocean_depth = spawn_field!(
        "Required ocean depth",
        definition.required_ocean_depth,
        ConfigDescription::new("Configures the ocean depth required for the creature to spawn.")
    );
    let required_global_key = spawn_field!(
        "Required global key",
        definition.required_global_key,
        ConfigDescription::new("Configures the global key required for the creature to spawn.")
    );
    let group_size = spawn_field!(
        "Group size",
        definition.group_size,
        ConfigDescription::new("Configures the size of the groups in which the creature spawns.")
    );
    let biome = spawn_field!(
        "Biome",
        definition.biome,
        ConfigDescription::new("Configures the biome required for the creature to spawn.")
            .with_acceptable(Biome::named().collect::<Vec<Biome>>())
    );
    let spawn_area = spawn_field!(
        "Spawn area",
        definition.spawn_area,
        ConfigDescription::new("Configures if the creature spawns more towards the center or the edge of the biome.")
    );
    let required_weather = spawn_field!(
        "Required weather",
        definition.required_weather,
        ConfigDescription::new("Configures the weather required for the creature to spawn.")
    );
    let spawn_altitude = spawn_field!(
        "Spawn altitude",
        definition.spawn_altitude,
        ConfigDescription::new("Configures the height from the ground in which the creature will spawn.")
    );
    let can_have_stars = spawn_field!(
        "Can have stars",
        Toggle::from(definition.can_have_stars),
        ConfigDescription::new("If the creature can have stars.")
    );
    let attack_immediately = spawn_field!(
        "Hunt player",
        Toggle::from(definition.attack_immediately),
        ConfigDescription::new("Makes the creature immediately hunt down the player after it spawns.")
    );
    let check_spawn_interval = spawn_field!(
        "Maximum spawn interval",
        definition.check_spawn_interval,
        ConfigDescription::new("Configures the timespan that the host has to make the creature spawn.")
    );
    let spawn_chance = spawn_field!(
        "Spawn chance",
        definition.spawn_chance,
        ConfigDescription::new("Sets the chance for the creature to be spawned, every time the host checks the spawn.")
    );
    let forest_spawn = spawn_field!(
        "Forest condition",
        definition.forest_spawn,
        ConfigDescription::new("If the creature can spawn in forests or cannot spawn in forests. Or both.")
    );
    let maximum = spawn_field!(
        "Maximum creature count",
        definition.maximum,
        ConfigDescription::new("The maximum number of this creature near the player, before the host stops spawning it in. Setting this lower than the upper limit of the group size does not make sense.")
    );

    CreatureConfig {
        spawn,
        can_be_tamed,
        food_items,
        spawn_time,
        required_altitude,
        required_ocean_depth,
        required_global_key,
        group_size,
        biome,
        spawn_area,
        required_weather,
        spawn_altitude,
        can_have_stars,
        attack_immediately,
        check_spawn_interval,
        spawn_chance,
        forest_spawn,
        maximum,
        tame_visibility,
        spawn_visibility,
    }
}

/// Bind every registered creature.
///
/// Safe to run again: each run first unbinds the creature groups of the
/// previous run, dropping their callbacks. A value the store already holds for
/// a field wins over the definition's default. Creatures sharing a group
/// within one run share its entries.
pub fn bind_all(registry: &CreatureRegistry, store: &ConfigStore, context: &BindingContext) -> CreatureBindings {
    let configs = store.with_auto_save_suspended(|| {
        let groups: BTreeSet<String> = registry
            .iter()
            .filter(|(_, definition)| definition.configuration_enabled)
            .map(|(_, definition)| group_name(&(context.display_name)(&definition.name_key)))
            .collect();
        for group in &groups {
            store.unbind_group(group);
        }

        registry
            .iter()
            .map(|(id, definition)| bind_creature(id, definition, store, context))
            .collect()
    });
    info!("bound config for {} creatures", registry.len());
    CreatureBindings { configs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Entity;
    use cm_config::ConfigKey;
    use std::cell::{Cell, RefCell};

    struct CountingPresenter(Cell<usize>);

    impl ConfigPresenter for CountingPresenter {
        fn rebuild(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct SyncRecorder(RefCell<Vec<ConfigKey>>);

    impl ConfigSync for SyncRecorder {
        fn register_for_sync(&self, key: &ConfigKey) {
            self.0.borrow_mut().push(key.clone());
        }
    }

    fn registry_with_boar() -> (CreatureRegistry, CreatureId) {
        let mut registry = CreatureRegistry::default();
        let id = registry.register(CreatureDefinition::new(Entity::from_raw(1), "Boar", "$enemy_boar"));
        (registry, id)
    }

    fn english(key: &str) -> String {
        match key {
            "$enemy_boar" => "[Boar]".to_string(),
            other => other.to_string(),
        }
    }

    static ENGLISH: fn(&str) -> String = english;

    fn context(refresh: Rc<RefreshQueue>) -> BindingContext<'static> {
        BindingContext {
            display_name: &ENGLISH,
            presenter: None,
            sync: None,
            refresh,
        }
    }

    #[test]
    fn group_name_strips_quotes_and_brackets() {
        assert_eq!(group_name(" [Boar's \"friend\"] "), "Boars friend");
    }

    #[test]
    fn defaults_bind_without_persisted_values() {
        let (registry, id) = registry_with_boar();
        let store = ConfigStore::in_memory();
        let bindings = bind_all(&registry, &store, &context(Rc::default()));

        let config = bindings.get(id).unwrap();
        assert_eq!(config.spawn.get(), SpawnOption::Default);
        assert_eq!(config.group_size.get(), Range::new(1.0, 1.0));
        assert_eq!(config.maximum.get(), 1);
        assert_eq!(store.len(), 18);
        assert!(store.is_bound(&ConfigKey::new("Boar", "Biome")));
    }

    #[test]
    fn persisted_values_win_over_defaults() {
        let (registry, id) = registry_with_boar();
        let store = ConfigStore::in_memory();
        store.insert_stored(ConfigKey::new("Boar", "Maximum creature count"), "4");
        store.insert_stored(ConfigKey::new("Boar", "Required weather"), "ClearSkies, Rain");

        let bindings = bind_all(&registry, &store, &context(Rc::default()));
        let config = bindings.get(id).unwrap();
        assert_eq!(config.maximum.get(), 4);
        assert_eq!(config.required_weather.get(), Weather::CLEAR_SKIES | Weather::RAIN);
    }

    #[test]
    fn disabled_configuration_binds_fixed_defaults() {
        let (mut registry, id) = registry_with_boar();
        registry.get_mut(id).unwrap().configuration_enabled = false;
        let store = ConfigStore::in_memory();

        let bindings = bind_all(&registry, &store, &context(Rc::default()));
        assert!(store.is_empty());
        assert!(bindings.get(id).unwrap().spawn.entry().is_none());
    }

    #[test]
    fn fields_are_ordered_within_the_group() {
        let (registry, _) = registry_with_boar();
        let store = ConfigStore::in_memory();
        bind_all(&registry, &store, &context(Rc::default()));

        let entries = store.entries();
        assert_eq!(entries[0].key.key, "Can be tamed");
        assert_eq!(entries[0].order, Some(-1));
        assert_eq!(entries[17].key.key, "Maximum creature count");
        assert_eq!(entries[17].order, Some(-18));
    }

    #[test]
    fn spawn_changes_queue_a_spawn_refresh() {
        let (registry, id) = registry_with_boar();
        let store = ConfigStore::in_memory();
        let refresh = Rc::new(RefreshQueue::default());
        let bindings = bind_all(&registry, &store, &context(refresh.clone()));

        bindings.get(id).unwrap().spawn_chance.entry().unwrap().set_value(50.0);
        assert_eq!(refresh.take_spawns(), vec![id]);
        assert!(refresh.take_ai().is_empty());
    }

    #[test]
    fn tame_toggle_gates_food_items_and_rebuilds_presentation() {
        let (registry, id) = registry_with_boar();
        let store = ConfigStore::in_memory();
        let presenter = Rc::new(CountingPresenter(Cell::new(0)));
        let refresh = Rc::new(RefreshQueue::default());
        let context = BindingContext {
            display_name: &ENGLISH,
            presenter: Some(presenter.clone()),
            sync: None,
            refresh: refresh.clone(),
        };
        let bindings = bind_all(&registry, &store, &context);
        let config = bindings.get(id).unwrap();

        let food = |store: &ConfigStore| {
            store
                .entries()
                .into_iter()
                .find(|e| e.key.key == "Food items")
                .unwrap()
                .browsable
        };
        assert!(!food(&store));

        config.can_be_tamed.entry().unwrap().set_value(Toggle::On);
        assert!(food(&store));
        assert_eq!(presenter.0.get(), 1);
        assert_eq!(refresh.take_ai(), vec![id]);
    }

    #[test]
    fn spawn_details_show_only_for_custom_spawns() {
        let (registry, id) = registry_with_boar();
        let store = ConfigStore::in_memory();
        let bindings = bind_all(&registry, &store, &context(Rc::default()));
        let config = bindings.get(id).unwrap();

        assert!(!config.spawn_visibility.get());
        config.spawn.entry().unwrap().set_value(SpawnOption::Custom);
        assert!(config.spawn_visibility.get());
        assert!(config.group_size.entry().unwrap().attributes().is_browsable());
        assert!(config.group_size.is_range());
    }

    #[test]
    fn every_entry_is_offered_for_sync() {
        let (registry, _) = registry_with_boar();
        let store = ConfigStore::in_memory();
        let recorder = Rc::new(SyncRecorder(RefCell::new(Vec::new())));
        let context = BindingContext {
            display_name: &ENGLISH,
            presenter: None,
            sync: Some(recorder.clone()),
            refresh: Rc::default(),
        };
        bind_all(&registry, &store, &context);
        assert_eq!(recorder.0.borrow().len(), 18);
    }

    #[test]
    fn rebinding_does_not_duplicate_callbacks() {
        let (registry, id) = registry_with_boar();
        let store = ConfigStore::in_memory();
        let refresh = Rc::new(RefreshQueue::default());
        bind_all(&registry, &store, &context(refresh.clone()));
        let bindings = bind_all(&registry, &store, &context(refresh.clone()));

        assert_eq!(store.len(), 18);
        bindings.get(id).unwrap().maximum.entry().unwrap().set_value(3);
        assert_eq!(refresh.take_spawns(), vec![id]);
    }

    #[test]
    fn creatures_sharing_a_name_share_live_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creatures.ron");
        let mut registry = CreatureRegistry::default();
        let first = registry.register(CreatureDefinition::new(Entity::from_raw(1), "Boar", "$enemy_boar"));
        let second = registry.register(CreatureDefinition::new(Entity::from_raw(1), "Boar", "$enemy_boar"));
        let store = ConfigStore::open(&path).unwrap();
        let refresh = Rc::new(RefreshQueue::default());
        let bindings = bind_all(&registry, &store, &context(refresh.clone()));
        assert_eq!(store.len(), 18);

        let other = ConfigStore::open(&path).unwrap();
        other
            .bind("Boar", "Maximum creature count", 1, ConfigDescription::new("max"))
            .set_value(9);
        store.reload().unwrap();

        assert_eq!(bindings.get(first).unwrap().maximum.get(), 9);
        assert_eq!(bindings.get(second).unwrap().maximum.get(), 9);
        assert_eq!(refresh.take_spawns(), vec![first, second]);
    }

    #[test]
    fn late_registrations_fall_back_to_fixed_defaults() {
        let (mut registry, _) = registry_with_boar();
        let store = ConfigStore::in_memory();
        let bindings = bind_all(&registry, &store, &context(Rc::default()));

        let late = registry.register(CreatureDefinition::new(Entity::from_raw(2), "Neck", "$enemy_neck"));
        let config = bindings.config_for(late, registry.get(late).unwrap());
        assert!(config.spawn.entry().is_none());
        assert_eq!(config.spawn.get(), SpawnOption::Default);
    }
}
