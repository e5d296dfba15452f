//! Small option enums exposed as tunable creature fields.

/// Two-state switch used for boolean config fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Toggle {
    #[default]
    On,
    Off,
}

impl Toggle {
    pub fn all() -> &'static [Toggle] {
        &[Self::On, Self::Off]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
        }
    }

    pub fn is_on(&self) -> bool {
        *self == Self::On
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value {
            Self::On
        } else {
            Self::Off
        }
    }
}

/// Whether a creature spawns, and whether its spawn details are user-tuned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SpawnOption {
    Disabled,
    #[default]
    Default,
    /// Spawn details are exposed for editing.
    Custom,
}

impl SpawnOption {
    pub fn all() -> &'static [SpawnOption] {
        &[Self::Disabled, Self::Default, Self::Custom]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::Default => "Default",
            Self::Custom => "Custom",
        }
    }
}

/// Time of day a creature may spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SpawnTime {
    Day,
    Night,
    #[default]
    Always,
}

impl SpawnTime {
    pub fn all() -> &'static [SpawnTime] {
        &[Self::Day, Self::Night, Self::Always]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Night => "Night",
            Self::Always => "Always",
        }
    }
}

/// Preferred placement inside the biome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SpawnArea {
    /// Towards the biome center.
    Center,
    /// Towards the biome edge.
    Edge,
    #[default]
    Everywhere,
}

impl SpawnArea {
    pub fn all() -> &'static [SpawnArea] {
        &[Self::Center, Self::Edge, Self::Everywhere]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Center => "Center",
            Self::Edge => "Edge",
            Self::Everywhere => "Everywhere",
        }
    }
}

/// Forest condition for spawning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Forest {
    Yes,
    No,
    #[default]
    Both,
}

impl Forest {
    pub fn all() -> &'static [Forest] {
        &[Self::Yes, Self::No, Self::Both]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Both => "Both",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_from_bool() {
        assert_eq!(Toggle::from(true), Toggle::On);
        assert_eq!(Toggle::from(false), Toggle::Off);
        assert!(Toggle::On.is_on());
    }

    #[test]
    fn option_names_are_unique() {
        let names: Vec<_> = SpawnOption::all().iter().map(|o| o.name()).collect();
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
    }

    #[test]
    fn defaults_match_unconstrained_spawning() {
        assert_eq!(SpawnTime::default(), SpawnTime::Always);
        assert_eq!(SpawnArea::default(), SpawnArea::Everywhere);
        assert_eq!(Forest::default(), Forest::Both);
    }
}
