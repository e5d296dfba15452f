//! Creature spawn management: config bindings, descriptor synthesis and the
//! patch points that keep the host's collections in line with them.

pub mod binding;
pub mod patches;
pub mod plugin;
pub mod reconcile;
pub mod refresh;
pub mod synthesis;

pub use binding::{bind_all, group_name, BindingContext, ConfigBinding, CreatureBindings, CreatureConfig};
pub use patches::{apply_ai, consume_items, drop_table, inject_prefabs};
pub use plugin::{CreatureConfigs, CreatureManagerPlugin};
pub use reconcile::{ReconcileError, ReconcilePhase, SpawnReconciler};
pub use refresh::RefreshQueue;
pub use synthesis::{synthesize, MAX_LEVEL_WITHOUT_STARS, MAX_LEVEL_WITH_STARS};
