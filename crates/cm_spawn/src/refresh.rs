use std::cell::RefCell;
use std::collections::BTreeSet;

use cm_registry::CreatureId;

/// Work queued by config change callbacks, drained once per frame.
///
/// Callbacks only record what changed. Applying the change to host
/// collections happens later, so a callback that fires in the middle of a
/// reconciliation pass cannot disturb it.
#[derive(Debug, Default)]
pub struct RefreshQueue {
    spawns: RefCell<BTreeSet<CreatureId>>,
    ai: RefCell<BTreeSet<CreatureId>>,
}

impl RefreshQueue {
    pub fn mark_spawn(&self, id: CreatureId) {
        self.spawns.borrow_mut().insert(id);
    }

    pub fn mark_ai(&self, id: CreatureId) {
        self.ai.borrow_mut().insert(id);
    }

    pub fn take_spawns(&self) -> Vec<CreatureId> {
        std::mem::take(&mut *self.spawns.borrow_mut()).into_iter().collect()
    }

    pub fn take_ai(&self) -> Vec<CreatureId> {
        std::mem::take(&mut *self.ai.borrow_mut()).into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.borrow().is_empty() && self.ai.borrow().is_empty()
    }
}
