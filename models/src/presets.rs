use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display};

use crate::{
    error::ModelError,
    units::{QuantityKind, Unit},
};

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UnitPreset {
    Metric,
    Imperial,
    Aviation,
}

impl UnitPreset {
    pub const ALL: [UnitPreset; 3] = [UnitPreset::Metric, UnitPreset::Imperial, UnitPreset::Aviation];

    pub fn unit_for(self, kind: QuantityKind) -> Unit {
        match (self, kind) {
            (UnitPreset::Metric, QuantityKind::Speed) => Unit::KilometerPerHour,
            (UnitPreset::Metric, QuantityKind::Distance) => Unit::Kilometer,
            (UnitPreset::Imperial, QuantityKind::Temperature) => Unit::Fahrenheit,
            (UnitPreset::Imperial, QuantityKind::Pressure) => Unit::InchOfMercury,
            (UnitPreset::Imperial, QuantityKind::Speed) => Unit::MilePerHour,
            (UnitPreset::Imperial, QuantityKind::Precipitation) => Unit::Inch,
            (UnitPreset::Imperial, QuantityKind::Distance) => Unit::Mile,
            (UnitPreset::Aviation, QuantityKind::Speed) => Unit::Knot,
            (UnitPreset::Aviation, QuantityKind::Distance) => Unit::Meter,
            (_, kind) => kind.base_unit(),
        }
    }

    pub fn selection(self) -> UnitSelection {
        UnitSelection {
            units: QuantityKind::ALL
                .iter()
                .map(|&kind| (kind, self.unit_for(kind)))
                .collect(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitPreset::Metric => "metric",
            UnitPreset::Imperial => "imperial",
            UnitPreset::Aviation => "aviation",
        }
    }

    pub fn from_name(name: &str) -> Option<UnitPreset> {
        UnitPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(name))
    }
}

impl Display for UnitPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitPreset::Metric => write!(f, "Metric"),
            UnitPreset::Imperial => write!(f, "Imperial"),
            UnitPreset::Aviation => write!(f, "Aviation"),
        }
    }
}

/// A unit choice for every quantity kind. Never partial: stored
/// selections missing a kind are completed from the metric preset.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "BTreeMap<QuantityKind, Unit>", into = "BTreeMap<QuantityKind, Unit>")]
pub struct UnitSelection {
    units: BTreeMap<QuantityKind, Unit>,
}

impl Default for UnitSelection {
    fn default() -> Self {
        UnitPreset::Metric.selection()
    }
}

impl From<BTreeMap<QuantityKind, Unit>> for UnitSelection {
    fn from(stored: BTreeMap<QuantityKind, Unit>) -> Self {
        let mut selection = UnitSelection::default();
        for (kind, unit) in stored {
            // mismatching entries keep the default
            let _ = selection.set(kind, unit);
        }
        selection
    }
}

impl From<UnitSelection> for BTreeMap<QuantityKind, Unit> {
    fn from(selection: UnitSelection) -> Self {
        selection.units
    }
}

impl UnitSelection {
    pub fn unit(&self, kind: QuantityKind) -> Unit {
        self.units
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.base_unit())
    }

    pub fn set(&mut self, kind: QuantityKind, unit: Unit) -> Result<(), ModelError> {
        if unit.kind() != kind {
            return Err(ModelError::IncompatibleUnits {
                from: kind.base_unit(),
                to: unit,
            });
        }
        self.units.insert(kind, unit);
        Ok(())
    }

    /// Replaces every choice in one assignment.
    pub fn apply_preset(&mut self, preset: UnitPreset) {
        *self = preset.selection();
    }

    pub fn matching_preset(&self) -> Option<UnitPreset> {
        UnitPreset::ALL
            .into_iter()
            .find(|preset| &preset.selection() == self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_complete() {
        for preset in UnitPreset::ALL {
            let selection = preset.selection();
            for kind in QuantityKind::ALL {
                assert_eq!(selection.unit(kind).kind(), kind);
            }
        }
    }

    #[test]
    fn test_preset_choices() {
        let imperial = UnitPreset::Imperial.selection();
        assert_eq!(imperial.unit(QuantityKind::Temperature), Unit::Fahrenheit);
        assert_eq!(imperial.unit(QuantityKind::Pressure), Unit::InchOfMercury);
        assert_eq!(imperial.unit(QuantityKind::Humidity), Unit::Percent);

        let aviation = UnitPreset::Aviation.selection();
        assert_eq!(aviation.unit(QuantityKind::Speed), Unit::Knot);
        assert_eq!(aviation.unit(QuantityKind::Temperature), Unit::Celsius);
    }

    #[test]
    fn test_apply_preset_replaces_overrides() {
        let mut selection = UnitSelection::default();
        selection.set(QuantityKind::Speed, Unit::Knot).unwrap();
        assert_eq!(selection.matching_preset(), None);

        selection.apply_preset(UnitPreset::Imperial);

        assert_eq!(selection, UnitPreset::Imperial.selection());
        assert_eq!(selection.matching_preset(), Some(UnitPreset::Imperial));
    }

    #[test]
    fn test_set_rejects_foreign_unit() {
        let mut selection = UnitSelection::default();

        let result = selection.set(QuantityKind::Temperature, Unit::Knot);

        assert!(result.is_err());
        assert_eq!(selection.unit(QuantityKind::Temperature), Unit::Celsius);
    }

    #[test]
    fn test_partial_stored_selection_is_completed() {
        let json = r#"{"temperature": "°F", "speed": "°C"}"#;

        let selection: UnitSelection = serde_json::from_str(json).unwrap();

        assert_eq!(selection.unit(QuantityKind::Temperature), Unit::Fahrenheit);
        assert_eq!(selection.unit(QuantityKind::Speed), Unit::KilometerPerHour);
        assert_eq!(selection.unit(QuantityKind::Pressure), Unit::Hectopascal);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(UnitPreset::from_name("Imperial"), Some(UnitPreset::Imperial));
        assert_eq!(UnitPreset::from_name("nautical"), None);
        assert_eq!(UnitPreset::Aviation.to_string(), "Aviation");
    }
}
