//! External configuration store: typed entries, persistence, collaborators.

use bevy::prelude::*;

pub mod collaborators;
pub mod config_io;
pub mod entry;
pub mod store;
pub mod value;

pub use collaborators::{ConfigCollaborators, ConfigPresenter, ConfigSync, SyncProbe};
pub use config_io::{ConfigFile, ConfigIoError};
pub use entry::{ConfigAttributes, ConfigDescription, ConfigEntry, ConfigKey, EntryInfo, Visibility};
pub use store::ConfigStore;
pub use value::{ConfigValue, Drawer};

/// Config plugin. Installs an in-memory store and no collaborators unless the
/// host inserted its own first.
pub struct CmConfigPlugin;

impl Plugin for CmConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_non_send_resource::<ConfigStore>()
            .init_non_send_resource::<ConfigCollaborators>();
    }
}
