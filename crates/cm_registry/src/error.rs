use std::path::PathBuf;

use bevy::prelude::Entity;
use thiserror::Error;

/// Failures loading content bundles. All of them are fatal at load time.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset bundle {file} not found in folder {folder}")]
    NotFound { file: String, folder: String },
    #[error("failed to read asset bundle {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse asset bundle {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("prefab {prefab} not found in asset bundle {bundle}")]
    PrefabNotFound { bundle: String, prefab: String },
}

/// Failures registering a creature.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("entity {0:?} is not a prefab")]
    MissingPrefab(Entity),
    #[error("prefab {0} has no character component")]
    MissingCharacter(String),
    #[error(transparent)]
    Asset(#[from] AssetError),
}
