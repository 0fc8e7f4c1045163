use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display};

use crate::{station::SensorData, units::QuantityKind};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum SensorType {
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
    WindGust,
    WindDirection,
    Rain,
    RainRate,
    SolarRadiation,
    UvIndex,
    DewPoint,
    Visibility,
    Battery,
    Unknown(String),
}

static KNOWN_TYPES: [(SensorType, &str); 13] = [
    (SensorType::Temperature, "temperature"),
    (SensorType::Humidity, "humidity"),
    (SensorType::Pressure, "pressure"),
    (SensorType::WindSpeed, "wind_speed"),
    (SensorType::WindGust, "wind_gust"),
    (SensorType::WindDirection, "wind_direction"),
    (SensorType::Rain, "rain"),
    (SensorType::RainRate, "rain_rate"),
    (SensorType::SolarRadiation, "solar_radiation"),
    (SensorType::UvIndex, "uv_index"),
    (SensorType::DewPoint, "dew_point"),
    (SensorType::Visibility, "visibility"),
    (SensorType::Battery, "battery"),
];

/// `windSpeed`, `wind-speed` and `WIND_SPEED` all name the same type.
fn compact(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl From<String> for SensorType {
    fn from(value: String) -> Self {
        let wanted = compact(&value);
        KNOWN_TYPES
            .iter()
            .find(|(_, name)| compact(name) == wanted)
            .map(|(sensor_type, _)| sensor_type.clone())
            .unwrap_or(SensorType::Unknown(value))
    }
}

impl From<SensorType> for String {
    fn from(value: SensorType) -> Self {
        value.to_string()
    }
}

impl Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorType::Unknown(name) => write!(f, "{name}"),
            known => {
                let name = KNOWN_TYPES
                    .iter()
                    .find(|(sensor_type, _)| sensor_type == known)
                    .map_or("unknown", |(_, name)| *name);
                write!(f, "{name}")
            }
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Gauge,
    Compass,
    Chart,
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorIcon {
    Thermometer,
    Droplet,
    Barometer,
    Wind,
    Compass,
    Rain,
    Sun,
    Uv,
    Eye,
    Battery,
    Unknown,
}

/// How a sensor type is presented. `range` is in the quantity's base unit.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorUiConfig {
    pub label: String,
    pub quantity: QuantityKind,
    pub widget: WidgetKind,
    pub range: (f64, f64),
    pub precision: u8,
    pub icon: SensorIcon,
}

impl SensorUiConfig {
    fn new(
        label: &str,
        quantity: QuantityKind,
        widget: WidgetKind,
        range: (f64, f64),
        precision: u8,
        icon: SensorIcon,
    ) -> Self {
        Self {
            label: label.to_string(),
            quantity,
            widget,
            range,
            precision,
            icon,
        }
    }

    fn builtin(sensor_type: &SensorType) -> Self {
        use QuantityKind as Q;
        use WidgetKind as W;
        match sensor_type {
            SensorType::Temperature => Self::new("Temperature", Q::Temperature, W::Gauge, (-30.0, 50.0), 1, SensorIcon::Thermometer),
            SensorType::DewPoint => Self::new("Dew point", Q::Temperature, W::Gauge, (-30.0, 40.0), 1, SensorIcon::Thermometer),
            SensorType::Humidity => Self::new("Humidity", Q::Humidity, W::Gauge, (0.0, 100.0), 0, SensorIcon::Droplet),
            SensorType::Pressure => Self::new("Pressure", Q::Pressure, W::Gauge, (950.0, 1050.0), 1, SensorIcon::Barometer),
            SensorType::WindSpeed => Self::new("Wind speed", Q::Speed, W::Gauge, (0.0, 40.0), 1, SensorIcon::Wind),
            SensorType::WindGust => Self::new("Wind gust", Q::Speed, W::Gauge, (0.0, 60.0), 1, SensorIcon::Wind),
            SensorType::WindDirection => Self::new("Wind direction", Q::Direction, W::Compass, (0.0, 360.0), 0, SensorIcon::Compass),
            SensorType::Rain => Self::new("Rain", Q::Precipitation, W::Chart, (0.0, 100.0), 1, SensorIcon::Rain),
            SensorType::RainRate => Self::new("Rain rate", Q::Precipitation, W::Gauge, (0.0, 50.0), 1, SensorIcon::Rain),
            SensorType::SolarRadiation => Self::new("Solar radiation", Q::Irradiance, W::Gauge, (0.0, 1400.0), 0, SensorIcon::Sun),
            SensorType::UvIndex => Self::new("UV index", Q::UvIndex, W::Gauge, (0.0, 12.0), 1, SensorIcon::Uv),
            SensorType::Visibility => Self::new("Visibility", Q::Distance, W::Text, (0.0, 50_000.0), 0, SensorIcon::Eye),
            SensorType::Battery => Self::new("Battery", Q::Humidity, W::Text, (0.0, 100.0), 0, SensorIcon::Battery),
            SensorType::Unknown(name) => Self::new(name, Q::Dimensionless, W::Text, (0.0, 100.0), 2, SensorIcon::Unknown),
        }
    }
}

/// Maps sensor types to their presentation. Deployments can override
/// single types, e.g. to widen a gauge range for a tropical site.
#[derive(Clone, Debug, Default)]
pub struct UiConfigManager {
    overrides: HashMap<SensorType, SensorUiConfig>,
}

impl UiConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, sensor_type: SensorType, config: SensorUiConfig) -> Self {
        self.overrides.insert(sensor_type, config);
        self
    }

    pub fn config_for(&self, sensor_type: &SensorType) -> SensorUiConfig {
        self.overrides
            .get(sensor_type)
            .cloned()
            .unwrap_or_else(|| SensorUiConfig::builtin(sensor_type))
    }

    /// History views chart anything on a linear scale; directions wrap
    /// around and unknown values have no meaningful axis.
    pub fn widget_for(&self, sensor: &SensorData, history_requested: bool) -> WidgetKind {
        let config = self.config_for(&sensor.sensor_type);
        let chartable = !matches!(
            config.quantity,
            QuantityKind::Direction | QuantityKind::Dimensionless
        );
        if history_requested && chartable {
            WidgetKind::Chart
        } else if config.widget == WidgetKind::Chart && !history_requested {
            // a single reading cannot be charted
            WidgetKind::Text
        } else {
            config.widget
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::SensorLocation;

    fn sensor(sensor_type: SensorType) -> SensorData {
        SensorData {
            id: "s".to_string(),
            sensor_type,
            location: SensorLocation::Outdoor,
        }
    }

    #[test]
    fn test_sensor_type_names_are_normalized() {
        assert_eq!(SensorType::from("windSpeed".to_string()), SensorType::WindSpeed);
        assert_eq!(SensorType::from("wind-speed".to_string()), SensorType::WindSpeed);
        assert_eq!(SensorType::from("UV_INDEX".to_string()), SensorType::UvIndex);
        assert_eq!(
            SensorType::from("soil_moisture".to_string()),
            SensorType::Unknown("soil_moisture".to_string())
        );
        assert_eq!(SensorType::WindDirection.to_string(), "wind_direction");
        assert_eq!(
            SensorType::Unknown("lightning".to_string()).to_string(),
            "lightning"
        );
    }

    #[test]
    fn test_config_for_known_types() {
        let manager = UiConfigManager::new();

        let temperature = manager.config_for(&SensorType::Temperature);
        assert_eq!(temperature.quantity, QuantityKind::Temperature);
        assert_eq!(temperature.widget, WidgetKind::Gauge);

        let direction = manager.config_for(&SensorType::WindDirection);
        assert_eq!(direction.widget, WidgetKind::Compass);
        assert_eq!(direction.icon, SensorIcon::Compass);
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let manager = UiConfigManager::new();

        let config = manager.config_for(&SensorType::Unknown("lightning".to_string()));

        assert_eq!(config.label, "lightning");
        assert_eq!(config.quantity, QuantityKind::Dimensionless);
        assert_eq!(config.widget, WidgetKind::Text);
    }

    #[test]
    fn test_overrides_win() {
        let manager = UiConfigManager::new().with_override(
            SensorType::Temperature,
            SensorUiConfig::new(
                "Greenhouse",
                QuantityKind::Temperature,
                WidgetKind::Text,
                (0.0, 60.0),
                2,
                SensorIcon::Thermometer,
            ),
        );

        let config = manager.config_for(&SensorType::Temperature);

        assert_eq!(config.label, "Greenhouse");
        assert_eq!(config.range, (0.0, 60.0));
        assert_eq!(
            manager.config_for(&SensorType::Humidity).label,
            "Humidity"
        );
    }

    #[test]
    fn test_widget_for() {
        let manager = UiConfigManager::new();

        assert_eq!(manager.widget_for(&sensor(SensorType::Temperature), false), WidgetKind::Gauge);
        assert_eq!(manager.widget_for(&sensor(SensorType::Temperature), true), WidgetKind::Chart);
        assert_eq!(manager.widget_for(&sensor(SensorType::WindDirection), true), WidgetKind::Compass);
        assert_eq!(manager.widget_for(&sensor(SensorType::Rain), false), WidgetKind::Text);
        assert_eq!(manager.widget_for(&sensor(SensorType::Rain), true), WidgetKind::Chart);
        assert_eq!(
            manager.widget_for(&sensor(SensorType::Unknown("x".to_string())), true),
            WidgetKind::Text
        );
    }
}
