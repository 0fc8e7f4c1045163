use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::{fmt::Display, time::Duration};

use crate::{error::ModelError, sensor_types::SensorType};

/// Backends disagree on whether ids are numbers or strings, accept both.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum SensorLocation {
    Indoor,
    Outdoor,
    Soil,
    Other(String),
}

impl From<String> for SensorLocation {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "indoor" | "inside" => Self::Indoor,
            "outdoor" | "outside" => Self::Outdoor,
            "soil" | "ground" => Self::Soil,
            _ => Self::Other(value),
        }
    }
}

impl From<SensorLocation> for String {
    fn from(value: SensorLocation) -> Self {
        value.to_string()
    }
}

impl Display for SensorLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorLocation::Indoor => write!(f, "indoor"),
            SensorLocation::Outdoor => write!(f, "outdoor"),
            SensorLocation::Soil => write!(f, "soil"),
            SensorLocation::Other(other) => write!(f, "{other}"),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensorData {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub location: SensorLocation,
}

impl SensorData {
    pub fn matches_query(&self, query: &str) -> bool {
        self.sensor_type.to_string().to_lowercase().contains(query)
            || self.location.to_string().to_lowercase().contains(query)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationData {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub model: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub last_reading: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sensors: Vec<SensorData>,
}

impl StationData {
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("{} #{}", self.model, self.id),
        }
    }

    pub fn sensor(&self, sensor_id: &str) -> Option<&SensorData> {
        self.sensors.iter().find(|sensor| sensor.id == sensor_id)
    }

    /// Checks that every reading references a sensor owned by this station.
    pub fn validate_readings(&self, readings: &[ReadingData]) -> Result<(), ModelError> {
        match readings
            .iter()
            .find(|reading| self.sensor(&reading.sensor_id).is_none())
        {
            Some(orphan) => Err(ModelError::UnknownSensor {
                station_id: self.id.clone(),
                sensor_id: orphan.sensor_id.clone(),
            }),
            None => Ok(()),
        }
    }

    /// The newest reading of each sensor, in sensor declaration order.
    /// Sensors without any reading are skipped.
    pub fn latest_readings<'a>(
        &'a self,
        readings: &'a [ReadingData],
    ) -> Vec<(&'a SensorData, &'a ReadingData)> {
        self.sensors
            .iter()
            .filter_map(|sensor| {
                readings
                    .iter()
                    .filter(|reading| reading.sensor_id == sensor.id)
                    .max_by_key(|reading| reading.timestamp)
                    .map(|reading| (sensor, reading))
            })
            .collect()
    }

    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        is_stale(self.last_reading, now, threshold)
    }

    /// Newest known report: the station's own `last_reading` or any of
    /// this station's readings fetched since, whichever is later.
    pub fn last_seen(&self, readings: &[ReadingData]) -> Option<DateTime<Utc>> {
        readings
            .iter()
            .filter(|reading| self.sensor(&reading.sensor_id).is_some())
            .map(|reading| reading.timestamp)
            .chain(self.last_reading)
            .max()
    }

    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.id.to_lowercase().contains(&query)
            || self.model.to_lowercase().contains(&query)
            || self
                .name
                .as_ref()
                .is_some_and(|name| name.to_lowercase().contains(&query))
            || self
                .location
                .as_ref()
                .is_some_and(|location| location.to_lowercase().contains(&query))
            || self.sensors.iter().any(|sensor| sensor.matches_query(&query))
    }
}

/// A station that never reported, or whose last report is older than
/// `threshold`, counts as stale. Timestamps in the future do not.
pub fn is_stale(last_reading: Option<DateTime<Utc>>, now: DateTime<Utc>, threshold: Duration) -> bool {
    match last_reading {
        None => true,
        Some(last) => now
            .signed_duration_since(last)
            .to_std()
            .is_ok_and(|age| age > threshold),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReadingValue {
    Point(f64),
    Aggregate {
        avg: f64,
        min: f64,
        max: f64,
        count: u32,
    },
}

#[serde_as]
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct RawReading {
    #[serde(deserialize_with = "id_from_string_or_number")]
    sensor_id: String,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawReading", into = "RawReading")]
pub struct ReadingData {
    pub sensor_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: ReadingValue,
}

impl TryFrom<RawReading> for ReadingData {
    type Error = ModelError;

    fn try_from(raw: RawReading) -> Result<Self, Self::Error> {
        let value = match raw.count {
            None => ReadingValue::Point(raw.value.ok_or(ModelError::MissingValue)?),
            Some(count) => {
                let min = raw.min.ok_or(ModelError::IncompleteAggregate("min"))?;
                let max = raw.max.ok_or(ModelError::IncompleteAggregate("max"))?;
                let avg = raw.value.unwrap_or((min + max) / 2.0);
                if count == 0 || !(min <= avg && avg <= max) {
                    return Err(ModelError::InconsistentAggregate);
                }
                ReadingValue::Aggregate {
                    avg,
                    min,
                    max,
                    count,
                }
            }
        };
        Ok(Self {
            sensor_id: raw.sensor_id,
            timestamp: raw.timestamp,
            value,
        })
    }
}

impl From<ReadingData> for RawReading {
    fn from(reading: ReadingData) -> Self {
        let (value, min, max, count) = match reading.value {
            ReadingValue::Point(value) => (Some(value), None, None, None),
            ReadingValue::Aggregate {
                avg,
                min,
                max,
                count,
            } => (Some(avg), Some(min), Some(max), Some(count)),
        };
        Self {
            sensor_id: reading.sensor_id,
            timestamp: reading.timestamp,
            value,
            min,
            max,
            count,
        }
    }
}

impl ReadingData {
    pub fn point(sensor_id: impl Into<String>, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            timestamp,
            value: ReadingValue::Point(value),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.value, ReadingValue::Aggregate { .. })
    }

    pub fn mean(&self) -> f64 {
        match self.value {
            ReadingValue::Point(value) => value,
            ReadingValue::Aggregate { avg, .. } => avg,
        }
    }

    pub fn min(&self) -> f64 {
        match self.value {
            ReadingValue::Point(value) => value,
            ReadingValue::Aggregate { min, .. } => min,
        }
    }

    pub fn max(&self) -> f64 {
        match self.value {
            ReadingValue::Point(value) => value,
            ReadingValue::Aggregate { max, .. } => max,
        }
    }

    pub fn count(&self) -> u32 {
        match self.value {
            ReadingValue::Point(_) => 1,
            ReadingValue::Aggregate { count, .. } => count,
        }
    }
}
