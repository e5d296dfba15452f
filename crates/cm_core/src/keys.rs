//! Enumeration-to-internal-key tables for global progress flags and weather.
//!
//! Every enumerator maps to exactly one raw host identifier. The tables are
//! the single source of truth for both directions: descriptor synthesis reads
//! the internal keys, config conversion reads the enumerator names.

use bitflags::bitflags;

use crate::error::SynthesisError;

/// World progress flag that must be set before a creature spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GlobalKey {
    #[default]
    None,
    KilledBonemass,
    KilledElder,
    KilledYagluth,
    KilledModer,
    KilledEikthyr,
    KilledTroll,
    KilledSurtling,
}

/// (enumerator, config name, host key)
const GLOBAL_KEYS: &[(GlobalKey, &str, &str)] = &[
    (GlobalKey::None, "None", ""),
    (GlobalKey::KilledBonemass, "KilledBonemass", "defeated_bonemass"),
    (GlobalKey::KilledElder, "KilledElder", "defeated_gdking"),
    (GlobalKey::KilledYagluth, "KilledYagluth", "defeated_goblinking"),
    (GlobalKey::KilledModer, "KilledModer", "defeated_dragon"),
    (GlobalKey::KilledEikthyr, "KilledEikthyr", "defeated_eikthyr"),
    (GlobalKey::KilledTroll, "KilledTroll", "KilledTroll"),
    (GlobalKey::KilledSurtling, "KilledSurtling", "killed_surtling"),
];

impl GlobalKey {
    pub fn all() -> impl Iterator<Item = GlobalKey> {
        GLOBAL_KEYS.iter().map(|(key, _, _)| *key)
    }

    pub fn name(&self) -> &'static str {
        GLOBAL_KEYS
            .iter()
            .find(|(key, _, _)| key == self)
            .map_or("None", |(_, name, _)| *name)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        GLOBAL_KEYS
            .iter()
            .find(|(_, n, _)| *n == name)
            .map(|(key, _, _)| *key)
    }

    /// Host identifier for this key. `None` maps to the empty key.
    pub fn internal_name(&self) -> Result<&'static str, SynthesisError> {
        GLOBAL_KEYS
            .iter()
            .find(|(key, _, _)| key == self)
            .map(|(_, _, internal)| *internal)
            .ok_or_else(|| SynthesisError::UnmappedEnumeration {
                kind: "GlobalKey",
                value: format!("{self:?}"),
            })
    }
}

bitflags! {
    /// Weather conditions, any of which allows a spawn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Weather: u32 {
        const CLEAR_SKIES = 1 << 0;
        const MEADOWS_CLEAR_SKIES = 1 << 2;
        const LIGHT_RAIN = 1 << 3;
        const RAIN = 1 << 4;
        const THUNDER_STORM = 1 << 5;
        const CLEAR_THUNDER_STORM = 1 << 6;
        const SWAMP_RAIN = 1 << 7;
        const MISTLANDS_DARK = 1 << 8;
        const ASHLANDS_ASHRAIN = 1 << 9;
        const MOUNTAIN_SNOW = 1 << 10;
        const MOUNTAIN_BLIZZARD = 1 << 11;
        const BLACK_FOREST_FOG = 1 << 12;
        const FOG = 1 << 13;
        const DEEP_NORTH_SNOW = 1 << 14;
        const DEEP_NORTH_SNOW_STORM = 1 << 15;
        const DEEP_NORTH_CLEAR = 1 << 16;
        const EIKTHYRS_THUNDERSTORM = 1 << 17;
        const ELDERS_HAZE = 1 << 18;
        const BONEMASS_DOWNPOUR = 1 << 19;
        const MODERS_VORTEX = 1 << 20;
        const YAGLUTHS_MAGIC_BLIZZARD = 1 << 21;
        const CRYPT = 1 << 22;
        const SUNKEN_CRYPT = 1 << 23;
    }
}

/// (flag, config name, host environment key), in expansion order.
const WEATHER_KEYS: &[(Weather, &str, &str)] = &[
    (Weather::CLEAR_SKIES, "ClearSkies", "Clear"),
    (Weather::MEADOWS_CLEAR_SKIES, "MeadowsClearSkies", "Heath clear"),
    (Weather::LIGHT_RAIN, "LightRain", "LightRain"),
    (Weather::RAIN, "Rain", "Rain"),
    (Weather::THUNDER_STORM, "ThunderStorm", "ThunderStorm"),
    (Weather::CLEAR_THUNDER_STORM, "ClearThunderStorm", "nofogts"),
    (Weather::SWAMP_RAIN, "SwampRain", "SwampRain"),
    (Weather::MISTLANDS_DARK, "MistlandsDark", "Darklands_dark"),
    (Weather::ASHLANDS_ASHRAIN, "AshlandsAshrain", "Ashrain"),
    (Weather::MOUNTAIN_SNOW, "MountainSnow", "Snow"),
    (Weather::MOUNTAIN_BLIZZARD, "MountainBlizzard", "SnowStorm"),
    (Weather::BLACK_FOREST_FOG, "BlackForestFog", "DeepForest Mist"),
    (Weather::FOG, "Fog", "Misty"),
    (Weather::DEEP_NORTH_SNOW, "DeepNorthSnow", "Twilight_Snow"),
    (Weather::DEEP_NORTH_SNOW_STORM, "DeepNorthSnowStorm", "Twilight_SnowStorm"),
    (Weather::DEEP_NORTH_CLEAR, "DeepNorthClear", "Twilight_Clear"),
    (Weather::EIKTHYRS_THUNDERSTORM, "EikthyrsThunderstorm", "Eikthyr"),
    (Weather::ELDERS_HAZE, "EldersHaze", "GDKing"),
    (Weather::BONEMASS_DOWNPOUR, "BonemassDownpour", "Bonemass"),
    (Weather::MODERS_VORTEX, "ModersVortex", "Moder"),
    (Weather::YAGLUTHS_MAGIC_BLIZZARD, "YagluthsMagicBlizzard", "GoblinKing"),
    (Weather::CRYPT, "Crypt", "Crypt"),
    (Weather::SUNKEN_CRYPT, "SunkenCrypt", "SunkenCrypt"),
];

impl Weather {
    /// Host environment keys for every set bit, in table order.
    ///
    /// Bits without a table entry are a programming error and fail rather than
    /// being dropped, since an empty environment list means "any weather".
    pub fn internal_names(&self) -> Result<Vec<&'static str>, SynthesisError> {
        let mut remaining = self.bits();
        let mut keys = Vec::new();
        for (flag, _, internal) in WEATHER_KEYS {
            if self.contains(*flag) {
                keys.push(*internal);
                remaining &= !flag.bits();
            }
        }
        if remaining != 0 {
            return Err(SynthesisError::UnmappedEnumeration {
                kind: "Weather",
                value: format!("{remaining:#x}"),
            });
        }
        Ok(keys)
    }

    /// Comma separated enumerator names ("None" when empty).
    pub fn to_names(&self) -> String {
        let names: Vec<&str> = WEATHER_KEYS
            .iter()
            .filter(|(flag, _, _)| self.contains(*flag))
            .map(|(_, name, _)| *name)
            .collect();
        if names.is_empty() {
            "None".to_string()
        } else {
            names.join(", ")
        }
    }

    pub fn from_names(s: &str) -> Option<Self> {
        let mut weather = Weather::empty();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part == "None" {
                continue;
            }
            let (flag, _, _) = WEATHER_KEYS.iter().find(|(_, name, _)| *name == part)?;
            weather |= *flag;
        }
        Some(weather)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_global_key_has_one_entry() {
        for key in GlobalKey::all() {
            let hits = GLOBAL_KEYS.iter().filter(|(k, _, _)| *k == key).count();
            assert_eq!(hits, 1, "{key:?}");
        }
    }

    #[test]
    fn global_key_maps_to_host_key() {
        assert_eq!(GlobalKey::KilledElder.internal_name(), Ok("defeated_gdking"));
        assert_eq!(GlobalKey::None.internal_name(), Ok(""));
    }

    #[test]
    fn global_key_names_parse_back() {
        for key in GlobalKey::all() {
            assert_eq!(GlobalKey::from_name(key.name()), Some(key));
        }
    }

    #[test]
    fn every_weather_flag_is_in_the_table() {
        for flag in Weather::all().iter() {
            let hits = WEATHER_KEYS.iter().filter(|(f, _, _)| *f == flag).count();
            assert_eq!(hits, 1, "{flag:?}");
        }
    }

    #[test]
    fn empty_weather_expands_to_nothing() {
        assert_eq!(Weather::empty().internal_names(), Ok(Vec::new()));
    }

    #[test]
    fn weather_expands_in_table_order() {
        let weather = Weather::RAIN | Weather::CLEAR_SKIES;
        assert_eq!(weather.internal_names(), Ok(vec!["Clear", "Rain"]));
    }

    #[test]
    fn each_single_flag_yields_exactly_its_key() {
        for (flag, _, internal) in WEATHER_KEYS {
            assert_eq!(flag.internal_names(), Ok(vec![*internal]));
        }
    }

    #[test]
    fn combined_flags_have_no_duplicates_or_extras() {
        let weather = Weather::FOG | Weather::CRYPT | Weather::SWAMP_RAIN | Weather::LIGHT_RAIN;
        let keys = weather.internal_names().unwrap();
        assert_eq!(keys, vec!["LightRain", "SwampRain", "Misty", "Crypt"]);
    }

    #[test]
    fn unmapped_weather_bit_fails_fast() {
        let weather = Weather::from_bits_retain(Weather::RAIN.bits() | 1 << 1);
        assert!(matches!(
            weather.internal_names(),
            Err(SynthesisError::UnmappedEnumeration { kind: "Weather", .. })
        ));
    }

    #[test]
    fn weather_names_parse_back() {
        let weather = Weather::CLEAR_SKIES | Weather::RAIN;
        assert_eq!(weather.to_names(), "ClearSkies, Rain");
        assert_eq!(Weather::from_names("ClearSkies, Rain"), Some(weather));
        assert_eq!(Weather::from_names("Sunny"), None);
    }
}
