use bevy::prelude::*;

/// Marks an entity as a prefab template, named as the host knows it.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Prefab {
    pub name: String,
}

/// Character data. `name` is a localization key such as `$enemy_boar`.
#[derive(Component, Clone, Debug, Default)]
pub struct Character {
    pub name: String,
}

/// Monster behaviour. `consume_items` are item prefab names eaten to tame.
#[derive(Component, Clone, Debug, Default)]
pub struct MonsterAi {
    pub consume_items: Vec<String>,
}

/// Capability component: present iff the creature can be tamed.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Tameable;

/// What a creature drops on death.
#[derive(Component, Clone, Debug, Default)]
pub struct CharacterDrop {
    pub drops: Vec<crate::DropDescriptor>,
}

/// Live instance spawned from a prefab entity.
#[derive(Component, Clone, Copy, Debug)]
pub struct SpawnedFrom(pub Entity);
