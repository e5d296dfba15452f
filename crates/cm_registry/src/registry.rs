use bevy::log::{info, warn};
use bevy::prelude::*;

use crate::definition::CreatureDefinition;

/// Position of a definition in the registry. Stable for the process lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatureId(pub usize);

/// Process-wide ordered list of registered creatures.
///
/// Append-only: there is no removal. Registration order is the order
/// descriptors are applied to the host.
#[derive(Resource, Debug, Default)]
pub struct CreatureRegistry {
    creatures: Vec<CreatureDefinition>,
    sealed: bool,
}

impl CreatureRegistry {
    /// Append a definition.
    ///
    /// Registering the same prefab twice is allowed and yields two independent
    /// entries; a warning is logged since it is rarely intended.
    pub fn register(&mut self, definition: CreatureDefinition) -> CreatureId {
        if self.creatures.iter().any(|c| c.prefab == definition.prefab) {
            warn!("creature {} registered more than once", definition.prefab_name);
        }
        if self.sealed {
            warn!(
                "creature {} registered after config binding; it keeps static defaults until the next bind",
                definition.prefab_name
            );
        }
        info!("registered creature {}", definition.prefab_name);
        self.creatures.push(definition);
        CreatureId(self.creatures.len() - 1)
    }

    pub fn get(&self, id: CreatureId) -> Option<&CreatureDefinition> {
        self.creatures.get(id.0)
    }

    /// Mutable access to defaults. Returns `None` once config binding has
    /// begun; from then on values change only through config entries.
    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut CreatureDefinition> {
        if self.sealed {
            warn!("creature defaults are frozen once config binding has begun");
            return None;
        }
        self.creatures.get_mut(id.0)
    }

    /// Freeze defaults. Called when the binding phase starts.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (CreatureId, &CreatureDefinition)> {
        self.creatures
            .iter()
            .enumerate()
            .map(|(index, definition)| (CreatureId(index), definition))
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}
