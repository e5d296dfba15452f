use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::store::StoreShared;
use crate::value::{ConfigValue, Drawer};

/// Identity of a config entry: a section and a key inside it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigKey {
    pub group: String,
    pub key: String,
}

impl ConfigKey {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.group, self.key)
    }
}

/// Visibility switch shared by every entry gated on the same field.
#[derive(Clone, Debug)]
pub struct Visibility(Rc<Cell<bool>>);

impl Visibility {
    pub fn new(visible: bool) -> Self {
        Self(Rc::new(Cell::new(visible)))
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, visible: bool) {
        self.0.set(visible);
    }
}

/// Hints for the presentation layer.
#[derive(Clone, Debug, Default)]
pub struct ConfigAttributes {
    /// Higher orders are listed first within a group.
    pub order: Option<i32>,
    /// `None` means always browsable.
    pub browsable: Option<Visibility>,
    pub drawer: Drawer,
}

impl ConfigAttributes {
    pub fn is_browsable(&self) -> bool {
        self.browsable.as_ref().map_or(true, Visibility::get)
    }
}

/// Description, acceptable values and presentation hints for one entry.
#[derive(Clone, Debug)]
pub struct ConfigDescription<T> {
    pub text: String,
    pub acceptable: Option<Vec<T>>,
    pub attributes: ConfigAttributes,
}

impl<T> ConfigDescription<T> {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            acceptable: None,
            attributes: ConfigAttributes::default(),
        }
    }

    pub fn with_acceptable(mut self, values: Vec<T>) -> Self {
        self.acceptable = Some(values);
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.attributes.order = Some(order);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.attributes.browsable = Some(visibility);
        self
    }
}

/// Snapshot of an entry for presenters, independent of its value type.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryInfo {
    pub key: ConfigKey,
    pub value: String,
    pub description: String,
    pub order: Option<i32>,
    pub browsable: bool,
    pub drawer: Drawer,
    pub acceptable: Option<Vec<String>>,
}

/// Type-erased view the store keeps of every bound entry.
pub(crate) trait ErasedEntry {
    fn key(&self) -> &ConfigKey;
    fn current_string(&self) -> String;
    /// Apply a persisted string, firing change callbacks if the value moved.
    fn apply_stored(&self, text: &str);
    fn info(&self) -> EntryInfo;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

pub(crate) struct EntryInner<T: ConfigValue> {
    key: ConfigKey,
    default: T,
    value: RefCell<T>,
    description: ConfigDescription<T>,
    listeners: RefCell<Vec<Rc<dyn Fn(&T)>>>,
    store: Weak<StoreShared>,
}

impl<T: ConfigValue> EntryInner<T> {
    fn clamp(&self, value: T) -> T {
        match &self.description.acceptable {
            Some(values) if !values.is_empty() && !values.contains(&value) => values[0].clone(),
            _ => value,
        }
    }

    /// Swap in a new value. Returns false when nothing changed.
    fn replace(&self, value: T) -> bool {
        let value = self.clamp(value);
        if *self.value.borrow() == value {
            return false;
        }
        *self.value.borrow_mut() = value;
        true
    }

    fn notify(&self) {
        // Listeners may subscribe or set values while we iterate.
        let listeners: Vec<Rc<dyn Fn(&T)>> = self.listeners.borrow().clone();
        let value = self.value.borrow().clone();
        for listener in listeners {
            listener(&value);
        }
    }
}

impl<T: ConfigValue> ErasedEntry for EntryInner<T> {
    fn key(&self) -> &ConfigKey {
        &self.key
    }

    fn current_string(&self) -> String {
        self.value.borrow().to_config_string()
    }

    fn apply_stored(&self, text: &str) {
        match T::from_config_str(text) {
            Some(value) => {
                if self.replace(value) {
                    self.notify();
                }
            }
            None => bevy::log::warn!("ignoring unparsable value {:?} for {}", text, self.key),
        }
    }

    fn info(&self) -> EntryInfo {
        EntryInfo {
            key: self.key.clone(),
            value: self.current_string(),
            description: self.description.text.clone(),
            order: self.description.attributes.order,
            browsable: self.description.attributes.is_browsable(),
            drawer: self.description.attributes.drawer,
            acceptable: self
                .description
                .acceptable
                .as_ref()
                .map(|values| values.iter().map(T::to_config_string).collect()),
        }
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// A live, typed handle to one value in the config store.
pub struct ConfigEntry<T: ConfigValue> {
    inner: Rc<EntryInner<T>>,
}

impl<T: ConfigValue> Clone for ConfigEntry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: ConfigValue> fmt::Debug for ConfigEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEntry")
            .field("key", &self.inner.key)
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}

impl<T: ConfigValue> ConfigEntry<T> {
    pub(crate) fn new(
        key: ConfigKey,
        default: T,
        initial: T,
        mut description: ConfigDescription<T>,
        store: Weak<StoreShared>,
    ) -> Self {
        description.attributes.drawer = T::drawer();
        let inner = EntryInner {
            key,
            default,
            value: RefCell::new(initial.clone()),
            description,
            listeners: RefCell::new(Vec::new()),
            store,
        };
        // Run the initial value through the acceptable list.
        let clamped = inner.clamp(initial);
        *inner.value.borrow_mut() = clamped;
        Self {
            inner: Rc::new(inner),
        }
    }

    /// The typed handle behind an erased entry, if it holds a `T`.
    pub(crate) fn from_erased(erased: Rc<dyn ErasedEntry>) -> Option<Self> {
        erased
            .into_any()
            .downcast::<EntryInner<T>>()
            .ok()
            .map(|inner| Self { inner })
    }

    pub(crate) fn erased(&self) -> Rc<dyn ErasedEntry> {
        self.inner.clone()
    }

    pub fn key(&self) -> &ConfigKey {
        &self.inner.key
    }

    pub fn value(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn default_value(&self) -> &T {
        &self.inner.default
    }

    pub fn attributes(&self) -> &ConfigAttributes {
        &self.inner.description.attributes
    }

    /// Set the value, record it in the store and fire change callbacks.
    /// Setting an equal value is a no-op.
    pub fn set_value(&self, value: T) {
        if !self.inner.replace(value) {
            return;
        }
        if let Some(store) = self.inner.store.upgrade() {
            store.record(&self.inner.key, self.inner.current_string());
        }
        self.inner.notify();
    }

    /// Subscribe to value changes. Callbacks run synchronously on change and
    /// receive the new value.
    pub fn on_changed(&self, listener: impl Fn(&T) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Whether two handles point at the same bound entry.
    pub fn same_entry(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
