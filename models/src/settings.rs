use reactive_stores::Store;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{format::DisplaySettings, presets::UnitSelection};

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn toggled(self) -> Self {
        match self {
            ThemeChoice::Dark => ThemeChoice::Light,
            ThemeChoice::Light => ThemeChoice::Dark,
        }
    }
}

pub const MIN_REFRESH_INTERVAL_SECS: u32 = 10;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u32 = 60;

/// Everything the user can change, persisted as one JSON document.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Store)]
#[serde(default)]
pub struct Settings {
    pub units: UnitSelection,
    pub display: DisplaySettings,
    pub theme: ThemeChoice,
    pub refresh_interval_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            units: UnitSelection::default(),
            display: DisplaySettings::default(),
            theme: ThemeChoice::default(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(u64::from(
            self.refresh_interval_secs.max(MIN_REFRESH_INTERVAL_SECS),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        format::{ClockFormat, DisplayLocale},
        presets::UnitPreset,
        units::{QuantityKind, Unit},
    };

    #[test]
    fn test_settings_round_trip_through_json() {
        let mut settings = Settings::default();
        settings.units.apply_preset(UnitPreset::Aviation);
        settings.display.locale = DisplayLocale::Fr;
        settings.theme = ThemeChoice::Light;

        let json = settings.to_json().unwrap();
        let restored = Settings::from_json(&json).unwrap();

        assert_eq!(restored, settings);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let json = r#"{"display": {"clock": "h12"}, "units": {"pressure": "inHg"}}"#;

        let settings = Settings::from_json(json).unwrap();

        assert_eq!(settings.display.clock, ClockFormat::H12);
        assert_eq!(settings.display.locale, DisplayLocale::En);
        assert_eq!(settings.units.unit(QuantityKind::Pressure), Unit::InchOfMercury);
        assert_eq!(settings.units.unit(QuantityKind::Temperature), Unit::Celsius);
        assert_eq!(settings.theme, ThemeChoice::Dark);
        assert_eq!(settings.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);
    }

    #[test]
    fn test_corrupt_settings_are_an_error() {
        assert!(Settings::from_json("{not json").is_err());
        assert!(Settings::from_json(r#"{"theme": "sepia"}"#).is_err());
    }

    #[test]
    fn test_refresh_interval_has_a_floor() {
        let settings = Settings {
            refresh_interval_secs: 1,
            ..Default::default()
        };

        assert_eq!(settings.refresh_interval(), Duration::from_secs(10));
        assert_eq!(ThemeChoice::Dark.toggled(), ThemeChoice::Light);
    }
}
