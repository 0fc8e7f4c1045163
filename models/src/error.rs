use crate::units::Unit;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Station `{station_id}` has no sensor `{sensor_id}`")]
    UnknownSensor {
        station_id: String,
        sensor_id: String,
    },
    #[error("Reading belongs to sensor `{reading}`, not to `{sensor}`")]
    SensorMismatch { sensor: String, reading: String },
    #[error("Cannot convert `{from}` to `{to}`")]
    IncompatibleUnits { from: Unit, to: Unit },
    #[error("Unknown unit symbol `{0}`")]
    UnknownUnit(String),
    #[error("Aggregated reading is missing `{0}`")]
    IncompleteAggregate(&'static str),
    #[error("Aggregated reading is inconsistent, expected min <= avg <= max and count >= 1")]
    InconsistentAggregate,
    #[error("Reading carries no value")]
    MissingValue,
}
