//! The spawn-list reconciliation pass.
//!
//! Each pass removes exactly the descriptor instances the previous pass
//! inserted, then inserts one fresh descriptor per registered creature. Host
//! entries and third-party entries are never touched, even when they compare
//! equal to ours.

use std::sync::Arc;

use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use cm_core::SynthesisError;
use cm_host::{SpawnDescriptor, SpawnTable};
use cm_registry::{CreatureId, CreatureRegistry};
use thiserror::Error;

use crate::binding::CreatureBindings;
use crate::synthesis::synthesize;

#[derive(Debug, Error, PartialEq)]
pub enum ReconcileError {
    #[error("descriptor synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("host spawn table has no spawn list to insert into")]
    NoSpawnList,
}

/// Where the reconciler is in its `Unapplied -> Applied -> Reapplying -> Applied`
/// cycle. Outside `reconcile` it always rests in `Unapplied` or `Applied`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReconcilePhase {
    #[default]
    Unapplied,
    Applied,
    /// Transient: held only while a pass replaces an applied set.
    Reapplying,
}

/// Remembers which descriptor instances this crate put into the host table.
#[derive(Resource, Debug, Default)]
pub struct SpawnReconciler {
    phase: ReconcilePhase,
    injected: Vec<(CreatureId, Arc<SpawnDescriptor>)>,
    passes: usize,
}

impl SpawnReconciler {
    pub fn phase(&self) -> ReconcilePhase {
        self.phase
    }

    /// Number of completed passes.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// The instances inserted by the last completed pass, in registry order.
    pub fn injected(&self) -> impl Iterator<Item = (CreatureId, &Arc<SpawnDescriptor>)> {
        self.injected.iter().map(|(id, d)| (*id, d))
    }

    pub fn descriptor(&self, id: CreatureId) -> Option<&Arc<SpawnDescriptor>> {
        self.injected.iter().find(|(i, _)| *i == id).map(|(_, d)| d)
    }

    /// Run one pass. Returns the number of descriptors inserted.
    ///
    /// Every descriptor is synthesized before the host table is touched, so
    /// a failure leaves both the table and the remembered set as they were.
    pub fn reconcile(
        &mut self,
        table: &mut SpawnTable,
        registry: &CreatureRegistry,
        bindings: &CreatureBindings,
    ) -> Result<usize, ReconcileError> {
        if table.lists.is_empty() {
            return Err(ReconcileError::NoSpawnList);
        }

        let previous = self.phase;
        if previous != ReconcilePhase::Unapplied {
            self.phase = ReconcilePhase::Reapplying;
        }

        let fresh = match Self::synthesize_all(registry, bindings) {
            Ok(fresh) => fresh,
            Err(e) => {
                self.phase = previous;
                return Err(e.into());
            }
        };

        let mut removed = 0;
        for (_, stale) in self.injected.drain(..) {
            for list in table.lists.iter_mut() {
                if list.remove_instance(&stale) {
                    removed += 1;
                }
            }
        }

        let target = &mut table.lists[0];
        for (_, descriptor) in &fresh {
            target.spawners.push(Arc::clone(descriptor));
        }

        let inserted = fresh.len();
        self.injected = fresh;
        self.phase = ReconcilePhase::Applied;
        self.passes += 1;
        info!(
            "spawn pass {}: removed {} stale descriptors, inserted {}",
            self.passes, removed, inserted
        );
        Ok(inserted)
    }

    fn synthesize_all(
        registry: &CreatureRegistry,
        bindings: &CreatureBindings,
    ) -> Result<Vec<(CreatureId, Arc<SpawnDescriptor>)>, SynthesisError> {
        registry
            .iter()
            .map(|(id, definition)| {
                let config = bindings.config_for(id, definition);
                synthesize(definition, &config).map(|d| (id, Arc::new(d)))
            })
            .collect()
    }

    /// Swap one creature's live descriptor for a new one, in place.
    ///
    /// Returns false if our previous instance is no longer in the host table,
    /// in which case nothing changes; the next pass inserts it again.
    pub fn refresh(&mut self, table: &mut SpawnTable, id: CreatureId, descriptor: SpawnDescriptor) -> bool {
        let Some(slot) = self.injected.iter_mut().find(|(i, _)| *i == id) else {
            debug!("no live descriptor for creature {:?} yet", id);
            return false;
        };
        for list in table.lists.iter_mut() {
            if let Some(index) = list.position_of(&slot.1) {
                let descriptor = Arc::new(descriptor);
                list.spawners[index] = Arc::clone(&descriptor);
                slot.1 = descriptor;
                return true;
            }
        }
        warn!("live descriptor for {} is missing from the host spawn table", slot.1.name);
        false
    }
}
