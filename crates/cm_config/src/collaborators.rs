//! Optional collaborators around the config store.
//!
//! Both are capabilities the host injects. When absent, the operations that
//! would use them become no-ops.

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use bevy::log::debug;

use crate::entry::ConfigKey;

/// Presentation layer listing config entries to the user.
pub trait ConfigPresenter {
    /// Rebuild the listing after visibility of some entries changed.
    fn rebuild(&self);
}

/// Collaborator that keeps config values in sync across peers.
pub trait ConfigSync {
    fn register_for_sync(&self, key: &ConfigKey);
}

type SyncFactory = Box<dyn FnOnce() -> Option<Rc<dyn ConfigSync>>>;

/// Lazily probes for a sync collaborator. The probe runs at most once.
pub struct SyncProbe {
    probe: RefCell<Option<SyncFactory>>,
    resolved: OnceCell<Option<Rc<dyn ConfigSync>>>,
}

impl SyncProbe {
    pub fn new(probe: impl FnOnce() -> Option<Rc<dyn ConfigSync>> + 'static) -> Self {
        Self {
            probe: RefCell::new(Some(Box::new(probe))),
            resolved: OnceCell::new(),
        }
    }

    pub fn absent() -> Self {
        Self::new(|| None)
    }

    pub fn get(&self) -> Option<Rc<dyn ConfigSync>> {
        self.resolved
            .get_or_init(|| {
                let found = self.probe.borrow_mut().take().and_then(|probe| probe());
                if found.is_none() {
                    debug!("no config sync collaborator, values stay local");
                }
                found
            })
            .clone()
    }
}

impl Default for SyncProbe {
    fn default() -> Self {
        Self::absent()
    }
}

/// Collaborators injected by the host. Kept as a non-send resource.
#[derive(Default)]
pub struct ConfigCollaborators {
    pub presenter: Option<Rc<dyn ConfigPresenter>>,
    pub sync: SyncProbe,
}

impl ConfigCollaborators {
    pub fn with_presenter(mut self, presenter: Rc<dyn ConfigPresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn with_sync(mut self, sync: SyncProbe) -> Self {
        self.sync = sync;
        self
    }

    pub fn rebuild_presentation(&self) {
        if let Some(presenter) = &self.presenter {
            presenter.rebuild();
        }
    }
}
