//! The parts of the host simulation the creature manager talks to.
//!
//! The host owns every collection here. The manager only ever mutates the
//! entries it inserted itself.

use bevy::prelude::*;

pub mod descriptor;
pub mod lifecycle;
pub mod prefab;
pub mod tables;

pub use descriptor::{DropDescriptor, SpawnDescriptor};
pub use lifecycle::{AssetTableInit, ObjectDatabaseInit, SceneInit, SpawnTableInit, StartupUi};
pub use prefab::{Character, CharacterDrop, MonsterAi, Prefab, SpawnedFrom, Tameable};
pub use tables::{EnglishText, ObjectDatabase, PrefabTable, SpawnList, SpawnTable, TextTable};

/// Host plugin registering the lifecycle events and host-owned collections.
pub struct CmHostPlugin;

impl Plugin for CmHostPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AssetTableInit>()
            .add_event::<SpawnTableInit>()
            .add_event::<ObjectDatabaseInit>()
            .add_event::<StartupUi>()
            .add_event::<SceneInit>()
            .init_resource::<PrefabTable>()
            .init_resource::<SpawnTable>()
            .init_resource::<ObjectDatabase>()
            .init_resource::<TextTable>()
            .init_resource::<EnglishText>();
    }
}
