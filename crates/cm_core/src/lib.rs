use bevy::prelude::*;

pub mod biome;
pub mod error;
pub mod keys;
pub mod options;
pub mod range;

pub use biome::{Biome, BiomeArea};
pub use error::SynthesisError;
pub use keys::{GlobalKey, Weather};
pub use options::{Forest, SpawnArea, SpawnOption, SpawnTime, Toggle};
pub use range::Range;

/// Core plugin providing the shared creature vocabulary.
pub struct CmCorePlugin;

impl Plugin for CmCorePlugin {
    fn build(&self, _app: &mut App) {
        // Vocabulary only; nothing to schedule.
    }
}
