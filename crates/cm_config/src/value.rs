//! Conversion between typed config values and their persisted string form.

use cm_core::{Biome, Forest, GlobalKey, Range, SpawnArea, SpawnOption, SpawnTime, Toggle, Weather};

/// How a presentation layer should draw a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Drawer {
    #[default]
    Default,
    /// Two numeric endpoints edited side by side.
    Range,
}

/// A value that can live in the config store.
pub trait ConfigValue: Clone + PartialEq + std::fmt::Debug + 'static {
    fn to_config_string(&self) -> String;

    /// Parse the persisted form. `None` means the text is unusable.
    fn from_config_str(s: &str) -> Option<Self>;

    fn drawer() -> Drawer {
        Drawer::Default
    }
}

impl ConfigValue for bool {
    fn to_config_string(&self) -> String {
        self.to_string()
    }

    fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

impl ConfigValue for i32 {
    fn to_config_string(&self) -> String {
        self.to_string()
    }

    fn from_config_str(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }
}

impl ConfigValue for f32 {
    fn to_config_string(&self) -> String {
        self.to_string()
    }

    fn from_config_str(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }
}

impl ConfigValue for String {
    fn to_config_string(&self) -> String {
        self.clone()
    }

    fn from_config_str(s: &str) -> Option<Self> {
        Some(s.to_string())
    }
}

/// Persisted as `"min - max"`. A lone number sets both endpoints.
impl ConfigValue for Range {
    fn to_config_string(&self) -> String {
        format!("{} - {}", self.min, self.max)
    }

    fn from_config_str(s: &str) -> Option<Self> {
        let s = s.trim();
        // A leading sign belongs to the minimum, not the separator.
        let split = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '-')
            .map(|(i, _)| i);
        let (from, to) = match split {
            Some(i) => (&s[..i], Some(&s[i + 1..])),
            None => (s, None),
        };
        let min: f32 = from.trim().parse().ok()?;
        let max = to.and_then(|t| t.trim().parse().ok()).unwrap_or(min);
        Some(Range::new(min, max))
    }

    fn drawer() -> Drawer {
        Drawer::Range
    }
}

macro_rules! named_enum_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigValue for $ty {
                fn to_config_string(&self) -> String {
                    self.name().to_string()
                }

                fn from_config_str(s: &str) -> Option<Self> {
                    let s = s.trim();
                    <$ty>::all().iter().copied().find(|v| v.name() == s)
                }
            }
        )*
    };
}

named_enum_value!(Toggle, SpawnOption, SpawnTime, SpawnArea, Forest);

impl ConfigValue for GlobalKey {
    fn to_config_string(&self) -> String {
        self.name().to_string()
    }

    fn from_config_str(s: &str) -> Option<Self> {
        GlobalKey::from_name(s.trim())
    }
}

impl ConfigValue for Weather {
    fn to_config_string(&self) -> String {
        self.to_names()
    }

    fn from_config_str(s: &str) -> Option<Self> {
        Weather::from_names(s)
    }
}

impl ConfigValue for Biome {
    fn to_config_string(&self) -> String {
        self.to_names()
    }

    fn from_config_str(s: &str) -> Option<Self> {
        Biome::from_names(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_parses_both_endpoints() {
        assert_eq!(Range::from_config_str("5 - 1000"), Some(Range::new(5.0, 1000.0)));
        assert_eq!(Range::from_config_str("2-3"), Some(Range::new(2.0, 3.0)));
    }

    #[test]
    fn range_single_value_sets_both() {
        assert_eq!(Range::from_config_str("4"), Some(Range::exactly(4.0)));
        assert_eq!(Range::from_config_str("4 - x"), Some(Range::exactly(4.0)));
    }

    #[test]
    fn range_keeps_negative_minimum() {
        assert_eq!(Range::from_config_str("-20 - 0"), Some(Range::new(-20.0, 0.0)));
    }

    #[test]
    fn range_renders_with_separator() {
        assert_eq!(Range::new(1.0, 0.5).to_config_string(), "1 - 0.5");
        assert_eq!(Range::drawer(), Drawer::Range);
    }

    #[test]
    fn enum_values_use_names() {
        assert_eq!(SpawnOption::Custom.to_config_string(), "Custom");
        assert_eq!(SpawnTime::from_config_str(" Night "), Some(SpawnTime::Night));
        assert_eq!(Toggle::from_config_str("Maybe"), None);
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        assert_eq!(i32::from_config_str("twelve"), None);
        assert_eq!(f32::from_config_str("0.25"), Some(0.25));
        assert_eq!(bool::from_config_str("TRUE"), Some(true));
    }
}
