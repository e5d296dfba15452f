//! The additive patch points: prefab injection, drop tables and AI capabilities.

use bevy::log::{debug, warn};
use bevy::prelude::*;
use cm_host::{DropDescriptor, MonsterAi, ObjectDatabase, PrefabTable, Tameable};
use cm_registry::{CreatureDefinition, RegisteredPrefabs};

/// Add every bundle prefab to the host prefab table. Already present prefabs
/// are skipped. Returns how many were added.
pub fn inject_prefabs(table: &mut PrefabTable, registered: &RegisteredPrefabs) -> usize {
    registered
        .prefabs
        .iter()
        .filter(|(name, prefab)| table.insert(name, *prefab))
        .count()
}

/// The host drop list for a creature, or `None` when the host's own drops stay.
///
/// Targets are resolved by prefab name. Unknown targets are skipped.
pub fn drop_table(definition: &CreatureDefinition, prefabs: &PrefabTable) -> Option<Vec<DropDescriptor>> {
    let entries = definition.drops.entries()?;
    let drops = entries
        .iter()
        .filter_map(|(name, entry)| {
            let Some(prefab) = prefabs.get(name) else {
                warn!("{} drops unknown prefab {}, skipping", definition.prefab_name, name);
                return None;
            };
            Some(DropDescriptor {
                prefab,
                amount_min: entry.amount.min as i32,
                amount_max: entry.amount.max as i32,
                chance: entry.chance / 100.0,
                one_per_player: entry.one_per_player,
                level_multiplier: entry.multiply_by_level,
            })
        })
        .collect();
    Some(drops)
}

/// Configured food items the object database knows, in configured order.
pub fn consume_items(food_items: &str, database: &ObjectDatabase) -> Vec<String> {
    food_items
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter(|item| {
            let known = database.has_item(item);
            if !known {
                debug!("food item {} is not in the object database", item);
            }
            known
        })
        .map(str::to_string)
        .collect()
}

/// Make one creature entity match the configured AI capabilities exactly.
pub fn apply_ai(
    commands: &mut Commands,
    ais: &mut Query<&mut MonsterAi>,
    target: Entity,
    can_be_tamed: bool,
    food: &[String],
) {
    let Some(mut entity) = commands.get_entity(target) else {
        return;
    };
    if can_be_tamed {
        entity.insert(Tameable);
    } else {
        entity.remove::<Tameable>();
    }
    if let Ok(mut ai) = ais.get_mut(target) {
        ai.consume_items = food.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefab_table() -> PrefabTable {
        let mut table = PrefabTable::default();
        table.insert("LeatherScraps", Entity::from_raw(10));
        table.insert("RawMeat", Entity::from_raw(11));
        table
    }

    #[test]
    fn injection_skips_present_prefabs() {
        let mut table = prefab_table();
        let registered = RegisteredPrefabs {
            prefabs: vec![
                ("Boar".to_string(), Entity::from_raw(1)),
                ("RawMeat".to_string(), Entity::from_raw(11)),
            ],
        };
        assert_eq!(inject_prefabs(&mut table, &registered), 1);
        assert_eq!(inject_prefabs(&mut table, &registered), 0);
        assert_eq!(table.get("Boar"), Some(Entity::from_raw(1)));
        assert_eq!(table.prefabs.len(), 3);
    }

    #[test]
    fn untouched_drops_keep_host_drops() {
        let definition = CreatureDefinition::new(Entity::from_raw(1), "Boar", "$enemy_boar");
        assert_eq!(drop_table(&definition, &prefab_table()), None);
    }

    #[test]
    fn drops_map_to_host_units() {
        let mut definition = CreatureDefinition::new(Entity::from_raw(1), "Boar", "$enemy_boar");
        let meat = definition.drops.entry("RawMeat");
        meat.amount = cm_core::Range::new(1.0, 3.9);
        meat.chance = 50.0;
        meat.one_per_player = true;
        definition.drops.entry("Honey");

        let drops = drop_table(&definition, &prefab_table()).unwrap();
        assert_eq!(
            drops,
            vec![DropDescriptor {
                prefab: Entity::from_raw(11),
                amount_min: 1,
                amount_max: 3,
                chance: 0.5,
                one_per_player: true,
                level_multiplier: true,
            }]
        );
    }

    #[test]
    fn explicit_none_clears_drops() {
        let mut definition = CreatureDefinition::new(Entity::from_raw(1), "Boar", "$enemy_boar");
        definition.drops.none();
        assert_eq!(drop_table(&definition, &prefab_table()), Some(Vec::new()));
    }

    #[test]
    fn consume_items_keep_known_items_only() {
        let database = ObjectDatabase {
            items: vec!["Raspberry".to_string(), "Blueberries".to_string()],
            initialized: true,
        };
        assert_eq!(
            consume_items(" Raspberry, Mushroom ,Blueberries,", &database),
            vec!["Raspberry", "Blueberries"]
        );
        assert!(consume_items("", &database).is_empty());
    }
}
