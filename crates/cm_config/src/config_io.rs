use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::ConfigKey;

/// Error type for config file I/O.
#[derive(Debug, Error)]
pub enum ConfigIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON serialization error: {0}")]
    Ron(#[from] ron::Error),
    #[error("RON parse error: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),
}

/// On-disk layout: group -> key -> persisted text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub groups: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConfigFile {
    pub fn from_values<'a>(values: impl Iterator<Item = (&'a ConfigKey, &'a String)>) -> Self {
        let mut groups: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (key, text) in values {
            groups
                .entry(key.group.clone())
                .or_default()
                .insert(key.key.clone(), text.clone());
        }
        Self { groups }
    }

    pub fn into_values(self) -> BTreeMap<ConfigKey, String> {
        self.groups
            .into_iter()
            .flat_map(|(group, keys)| {
                keys.into_iter()
                    .map(move |(key, text)| (ConfigKey::new(group.clone(), key), text))
            })
            .collect()
    }
}

/// Save a config file as pretty RON.
pub fn save_config_file(path: &Path, file: &ConfigFile) -> Result<(), ConfigIoError> {
    let pretty_config = ron::ser::PrettyConfig::new().depth_limit(3);
    let ron_string = ron::ser::to_string_pretty(file, pretty_config)?;
    fs::write(path, ron_string)?;
    Ok(())
}

/// Load a config file from RON.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigIoError> {
    let contents = fs::read_to_string(path)?;
    let file: ConfigFile = ron::from_str(&contents)?;
    Ok(file)
}
