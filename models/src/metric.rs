use chrono::{DateTime, Utc};

use crate::{
    error::ModelError,
    format::{compass_point, DisplaySettings},
    presets::UnitSelection,
    sensor_types::{SensorIcon, UiConfigManager, WidgetKind},
    station::{ReadingData, SensorData},
    units::{convert, QuantityKind, Unit},
};

/// A reading converted to the user's unit and ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub sensor_id: String,
    pub label: String,
    pub quantity: QuantityKind,
    pub unit: Unit,
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub count: u32,
    pub precision: u8,
    pub text: String,
    pub widget: WidgetKind,
    pub range: (f64, f64),
    /// Range ends as gauge labels, at most one decimal.
    pub range_text: (String, String),
    pub icon: SensorIcon,
    pub timestamp: DateTime<Utc>,
}

/// One chart sample in display units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub unit: Unit,
    pub precision: u8,
    pub aggregated: bool,
    pub points: Vec<SeriesPoint>,
}

pub struct MetricReader<'a> {
    units: &'a UnitSelection,
    display: &'a DisplaySettings,
    ui: &'a UiConfigManager,
}

impl<'a> MetricReader<'a> {
    pub fn new(
        units: &'a UnitSelection,
        display: &'a DisplaySettings,
        ui: &'a UiConfigManager,
    ) -> Self {
        Self { units, display, ui }
    }

    pub fn read(&self, sensor: &SensorData, reading: &ReadingData) -> Result<Metric, ModelError> {
        if reading.sensor_id != sensor.id {
            return Err(ModelError::SensorMismatch {
                sensor: sensor.id.clone(),
                reading: reading.sensor_id.clone(),
            });
        }
        let config = self.ui.config_for(&sensor.sensor_type);
        let base = config.quantity.base_unit();
        let unit = self.units.unit(config.quantity);
        let precision = config.precision.max(unit.min_precision());

        let value = convert(reading.mean(), base, unit)?;
        let (min, max) = if reading.is_aggregate() {
            (
                Some(convert(reading.min(), base, unit)?),
                Some(convert(reading.max(), base, unit)?),
            )
        } else {
            (None, None)
        };
        let range = (
            convert(config.range.0, base, unit)?,
            convert(config.range.1, base, unit)?,
        );

        let range_precision = precision.min(1);
        let range_text = (
            self.display.number(range.0, range_precision),
            self.display.number(range.1, range_precision),
        );

        Ok(Metric {
            sensor_id: sensor.id.clone(),
            text: self.format_value(value, unit, precision),
            label: config.label,
            quantity: config.quantity,
            unit,
            value,
            min,
            max,
            count: reading.count(),
            precision,
            widget: self.ui.widget_for(sensor, false),
            range,
            range_text,
            icon: config.icon,
            timestamp: reading.timestamp,
        })
    }

    /// Converts a sensor's history for charting, oldest first. Readings of
    /// other sensors are skipped.
    pub fn series(&self, sensor: &SensorData, readings: &[ReadingData]) -> Result<Series, ModelError> {
        let config = self.ui.config_for(&sensor.sensor_type);
        let base = config.quantity.base_unit();
        let unit = self.units.unit(config.quantity);

        let mut points = readings
            .iter()
            .filter(|reading| reading.sensor_id == sensor.id)
            .map(|reading| {
                Ok(SeriesPoint {
                    timestamp: reading.timestamp,
                    value: convert(reading.mean(), base, unit)?,
                    min: convert(reading.min(), base, unit)?,
                    max: convert(reading.max(), base, unit)?,
                    count: reading.count(),
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;
        points.sort_by_key(|point| point.timestamp);

        Ok(Series {
            aggregated: readings
                .iter()
                .any(|reading| reading.sensor_id == sensor.id && reading.is_aggregate()),
            label: config.label,
            unit,
            precision: config.precision.max(unit.min_precision()),
            points,
        })
    }

    pub fn format_value(&self, value: f64, unit: Unit, precision: u8) -> String {
        let text = self.display.quantity(value, unit, precision);
        if unit == Unit::Degree && value.is_finite() {
            format!("{text} {}", compass_point(value))
        } else {
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        format::DisplayLocale,
        presets::UnitPreset,
        sensor_types::SensorType,
        station::{ReadingValue, SensorLocation},
    };
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    fn sensor(id: &str, sensor_type: SensorType) -> SensorData {
        SensorData {
            id: id.to_string(),
            sensor_type,
            location: SensorLocation::Outdoor,
        }
    }

    #[test]
    fn test_read_converts_to_selected_unit() {
        let units = UnitPreset::Imperial.selection();
        let display = DisplaySettings::default();
        let ui = UiConfigManager::new();
        let reader = MetricReader::new(&units, &display, &ui);

        let metric = reader
            .read(
                &sensor("t1", SensorType::Temperature),
                &ReadingData::point("t1", at(0), 20.0),
            )
            .unwrap();

        assert_eq!(metric.unit, Unit::Fahrenheit);
        assert!((metric.value - 68.0).abs() < 1e-9);
        assert_eq!(metric.text, "68.0 °F");
        assert_eq!(metric.widget, WidgetKind::Gauge);
        assert!((metric.range.0 - -22.0).abs() < 1e-9);
        assert!((metric.range.1 - 122.0).abs() < 1e-9);
        assert_eq!(metric.min, None);
        assert_eq!(metric.count, 1);
    }

    #[test]
    fn test_read_uses_coarse_unit_precision() {
        let units = UnitPreset::Imperial.selection();
        let display = DisplaySettings::default();
        let ui = UiConfigManager::new();
        let reader = MetricReader::new(&units, &display, &ui);

        let metric = reader
            .read(
                &sensor("p1", SensorType::Pressure),
                &ReadingData::point("p1", at(0), 1013.25),
            )
            .unwrap();

        assert_eq!(metric.precision, 2);
        assert_eq!(metric.text, "29.92 inHg");
    }

    #[test]
    fn test_read_aggregate_converts_bounds() {
        let units = UnitSelection::default();
        let display = DisplaySettings {
            locale: DisplayLocale::De,
            ..Default::default()
        };
        let ui = UiConfigManager::new();
        let reader = MetricReader::new(&units, &display, &ui);
        let reading = ReadingData {
            sensor_id: "w1".to_string(),
            timestamp: at(0),
            value: ReadingValue::Aggregate {
                avg: 5.0,
                min: 2.5,
                max: 10.0,
                count: 6,
            },
        };

        let metric = reader
            .read(&sensor("w1", SensorType::WindSpeed), &reading)
            .unwrap();

        assert_eq!(metric.unit, Unit::KilometerPerHour);
        assert_eq!(metric.text, "18,0 km/h");
        assert!(metric.min.is_some_and(|min| (min - 9.0).abs() < 1e-9));
        assert!(metric.max.is_some_and(|max| (max - 36.0).abs() < 1e-9));
        assert_eq!(metric.count, 6);
        assert_eq!(metric.range_text, ("0,0".to_string(), "144,0".to_string()));
    }

    #[test]
    fn test_read_direction_appends_compass_point() {
        let units = UnitSelection::default();
        let display = DisplaySettings::default();
        let ui = UiConfigManager::new();
        let reader = MetricReader::new(&units, &display, &ui);

        let metric = reader
            .read(
                &sensor("d1", SensorType::WindDirection),
                &ReadingData::point("d1", at(0), 270.0),
            )
            .unwrap();

        assert_eq!(metric.text, "270° W");
        assert_eq!(metric.widget, WidgetKind::Compass);
    }

    #[test]
    fn test_read_rejects_foreign_reading() {
        let units = UnitSelection::default();
        let display = DisplaySettings::default();
        let ui = UiConfigManager::new();
        let reader = MetricReader::new(&units, &display, &ui);

        let result = reader.read(
            &sensor("t1", SensorType::Temperature),
            &ReadingData::point("t2", at(0), 20.0),
        );

        assert_eq!(
            result,
            Err(ModelError::SensorMismatch {
                sensor: "t1".to_string(),
                reading: "t2".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_sensor_reads_as_plain_number() {
        let units = UnitSelection::default();
        let display = DisplaySettings::default();
        let ui = UiConfigManager::new();
        let reader = MetricReader::new(&units, &display, &ui);

        let metric = reader
            .read(
                &sensor("x", SensorType::Unknown("lightning".to_string())),
                &ReadingData::point("x", at(0), 3.0),
            )
            .unwrap();

        assert_eq!(metric.label, "lightning");
        assert_eq!(metric.text, "3.00");
        assert_eq!(metric.widget, WidgetKind::Text);
    }

    #[test]
    fn test_series_sorts_and_filters() {
        let units = UnitPreset::Imperial.selection();
        let display = DisplaySettings::default();
        let ui = UiConfigManager::new();
        let reader = MetricReader::new(&units, &display, &ui);
        let readings = vec![
            ReadingData::point("r1", at(10), 25.4),
            ReadingData::point("t1", at(5), 20.0),
            ReadingData::point("r1", at(0), 0.0),
        ];

        let series = reader
            .series(&sensor("r1", SensorType::Rain), &readings)
            .unwrap();

        assert_eq!(series.unit, Unit::Inch);
        assert!(!series.aggregated);
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].timestamp, at(0));
        assert!((series.points[1].value - 1.0).abs() < 1e-9);
        assert_eq!(series.points[1].min, series.points[1].value);
    }

    fn aggregate(sensor_id: &str, minute: u32, avg: f64, min: f64, max: f64, count: u32) -> ReadingData {
        ReadingData {
            sensor_id: sensor_id.to_string(),
            timestamp: at(minute),
            value: ReadingValue::Aggregate {
                avg,
                min,
                max,
                count,
            },
        }
    }

    #[test]
    fn test_series_of_aggregates() {
        let units = UnitSelection::default();
        let display = DisplaySettings::default();
        let ui = UiConfigManager::new();
        let reader = MetricReader::new(&units, &display, &ui);
        let wind = sensor("w1", SensorType::WindSpeed);
        let readings = vec![
            aggregate("w1", 10, 5.0, 2.5, 10.0, 6),
            aggregate("g1", 5, 8.0, 4.0, 12.0, 3),
            ReadingData::point("w1", at(0), 1.0),
        ];

        let series = reader.series(&wind, &readings).unwrap();

        assert!(series.aggregated);
        assert_eq!(series.unit, Unit::KilometerPerHour);
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].count, 1);
        assert!((series.points[0].min - 3.6).abs() < 1e-9);
        let newest = &series.points[1];
        assert!((newest.value - 18.0).abs() < 1e-9);
        assert!((newest.min - 9.0).abs() < 1e-9);
        assert!((newest.max - 36.0).abs() < 1e-9);
        assert_eq!(newest.count, 6);

        // only another sensor's readings are aggregated
        let points_only = vec![
            ReadingData::point("w1", at(0), 1.0),
            aggregate("g1", 5, 8.0, 4.0, 12.0, 3),
        ];
        let series = reader.series(&wind, &points_only).unwrap();
        assert!(!series.aggregated);
        assert_eq!(series.points.len(), 1);
    }
}
