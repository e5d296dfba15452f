use bevy::prelude::*;

/// The host is about to populate its prefab table for a new scene.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct AssetTableInit;

/// A spawn table finished loading its native spawn lists.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct SpawnTableInit;

/// The item/object database finished initializing.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct ObjectDatabaseInit;

/// The start menu came up. Fires once per return to the menu.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct StartupUi;

/// The network scene finished initializing; prefabs are resolvable by name.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct SceneInit;
