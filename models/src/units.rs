use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::ModelError;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    Temperature,
    Pressure,
    Speed,
    Precipitation,
    Distance,
    Humidity,
    Direction,
    Irradiance,
    UvIndex,
    Dimensionless,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 10] = [
        QuantityKind::Temperature,
        QuantityKind::Pressure,
        QuantityKind::Speed,
        QuantityKind::Precipitation,
        QuantityKind::Distance,
        QuantityKind::Humidity,
        QuantityKind::Direction,
        QuantityKind::Irradiance,
        QuantityKind::UvIndex,
        QuantityKind::Dimensionless,
    ];

    /// The unit the backend reports this quantity in.
    pub fn base_unit(self) -> Unit {
        match self {
            QuantityKind::Temperature => Unit::Celsius,
            QuantityKind::Pressure => Unit::Hectopascal,
            QuantityKind::Speed => Unit::MeterPerSecond,
            QuantityKind::Precipitation => Unit::Millimeter,
            QuantityKind::Distance => Unit::Meter,
            QuantityKind::Humidity => Unit::Percent,
            QuantityKind::Direction => Unit::Degree,
            QuantityKind::Irradiance => Unit::WattPerSquareMeter,
            QuantityKind::UvIndex => Unit::UvIndex,
            QuantityKind::Dimensionless => Unit::None,
        }
    }

    pub fn units(self) -> Vec<Unit> {
        UNIT_TABLE
            .iter()
            .filter(|def| def.kind == self)
            .map(|def| def.unit)
            .collect()
    }

    /// Quantities with a single unit have nothing to choose in the settings.
    pub fn is_selectable(self) -> bool {
        self.units().len() > 1
    }

    pub fn label(self) -> &'static str {
        match self {
            QuantityKind::Temperature => "Temperature",
            QuantityKind::Pressure => "Pressure",
            QuantityKind::Speed => "Wind speed",
            QuantityKind::Precipitation => "Precipitation",
            QuantityKind::Distance => "Distance",
            QuantityKind::Humidity => "Humidity",
            QuantityKind::Direction => "Direction",
            QuantityKind::Irradiance => "Irradiance",
            QuantityKind::UvIndex => "UV index",
            QuantityKind::Dimensionless => "Value",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    Celsius,
    Fahrenheit,
    Kelvin,
    Hectopascal,
    Kilopascal,
    Millibar,
    InchOfMercury,
    MillimeterOfMercury,
    MeterPerSecond,
    KilometerPerHour,
    MilePerHour,
    Knot,
    Millimeter,
    Inch,
    Meter,
    Kilometer,
    Mile,
    Foot,
    NauticalMile,
    Percent,
    Degree,
    WattPerSquareMeter,
    UvIndex,
    None,
}

/// One row of the conversion table: `base = value * scale + offset`.
struct UnitDef {
    unit: Unit,
    kind: QuantityKind,
    symbol: &'static str,
    name: &'static str,
    scale: f64,
    offset: f64,
    min_precision: u8,
}

const fn def(
    unit: Unit,
    kind: QuantityKind,
    symbol: &'static str,
    name: &'static str,
    scale: f64,
    offset: f64,
    min_precision: u8,
) -> UnitDef {
    UnitDef {
        unit,
        kind,
        symbol,
        name,
        scale,
        offset,
        min_precision,
    }
}

use QuantityKind as Q;

const UNIT_TABLE: &[UnitDef] = &[
    def(Unit::Celsius, Q::Temperature, "°C", "degrees Celsius", 1.0, 0.0, 0),
    def(Unit::Fahrenheit, Q::Temperature, "°F", "degrees Fahrenheit", 5.0 / 9.0, -160.0 / 9.0, 0),
    def(Unit::Kelvin, Q::Temperature, "K", "kelvin", 1.0, -273.15, 0),
    def(Unit::Hectopascal, Q::Pressure, "hPa", "hectopascal", 1.0, 0.0, 0),
    def(Unit::Kilopascal, Q::Pressure, "kPa", "kilopascal", 10.0, 0.0, 1),
    def(Unit::Millibar, Q::Pressure, "mbar", "millibar", 1.0, 0.0, 0),
    def(Unit::InchOfMercury, Q::Pressure, "inHg", "inches of mercury", 33.863_886_666_7, 0.0, 2),
    def(Unit::MillimeterOfMercury, Q::Pressure, "mmHg", "millimeters of mercury", 1.333_223_684_2, 0.0, 0),
    def(Unit::MeterPerSecond, Q::Speed, "m/s", "meters per second", 1.0, 0.0, 1),
    def(Unit::KilometerPerHour, Q::Speed, "km/h", "kilometers per hour", 1.0 / 3.6, 0.0, 0),
    def(Unit::MilePerHour, Q::Speed, "mph", "miles per hour", 0.447_04, 0.0, 0),
    def(Unit::Knot, Q::Speed, "kn", "knots", 1852.0 / 3600.0, 0.0, 0),
    def(Unit::Millimeter, Q::Precipitation, "mm", "millimeters", 1.0, 0.0, 1),
    def(Unit::Inch, Q::Precipitation, "in", "inches", 25.4, 0.0, 2),
    def(Unit::Meter, Q::Distance, "m", "meters", 1.0, 0.0, 0),
    def(Unit::Kilometer, Q::Distance, "km", "kilometers", 1000.0, 0.0, 1),
    def(Unit::Mile, Q::Distance, "mi", "miles", 1609.344, 0.0, 1),
    def(Unit::Foot, Q::Distance, "ft", "feet", 0.3048, 0.0, 0),
    def(Unit::NauticalMile, Q::Distance, "NM", "nautical miles", 1852.0, 0.0, 1),
    def(Unit::Percent, Q::Humidity, "%", "percent", 1.0, 0.0, 0),
    def(Unit::Degree, Q::Direction, "°", "degrees", 1.0, 0.0, 0),
    def(Unit::WattPerSquareMeter, Q::Irradiance, "W/m²", "watts per square meter", 1.0, 0.0, 0),
    def(Unit::UvIndex, Q::UvIndex, "UVI", "UV index", 1.0, 0.0, 0),
    def(Unit::None, Q::Dimensionless, "", "", 1.0, 0.0, 0),
];

impl Unit {
    fn def(self) -> &'static UnitDef {
        // every variant has a row, the table test guards that
        UNIT_TABLE
            .iter()
            .find(|def| def.unit == self)
            .unwrap_or(&UNIT_TABLE[UNIT_TABLE.len() - 1])
    }

    pub fn kind(self) -> QuantityKind {
        self.def().kind
    }

    pub fn symbol(self) -> &'static str {
        self.def().symbol
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Coarse units need extra decimals to stay meaningful (e.g. inHg).
    pub fn min_precision(self) -> u8 {
        self.def().min_precision
    }

    /// Symbols that attach to the number without a space.
    pub fn is_attached(self) -> bool {
        matches!(self, Unit::Percent | Unit::Degree | Unit::None)
    }

    pub fn from_symbol(symbol: &str) -> Result<Unit, ModelError> {
        UNIT_TABLE
            .iter()
            .find(|def| def.symbol.eq_ignore_ascii_case(symbol))
            .map(|def| def.unit)
            .ok_or_else(|| ModelError::UnknownUnit(symbol.to_string()))
    }

    pub fn to_base(self, value: f64) -> f64 {
        let def = self.def();
        value * def.scale + def.offset
    }

    pub fn from_base(self, value: f64) -> f64 {
        let def = self.def();
        (value - def.offset) / def.scale
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<String> for Unit {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Unit::from_symbol(&value)
    }
}

impl From<Unit> for String {
    fn from(value: Unit) -> Self {
        value.symbol().to_string()
    }
}

pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, ModelError> {
    if from.kind() != to.kind() {
        return Err(ModelError::IncompatibleUnits { from, to });
    }
    if from == to {
        return Ok(value);
    }
    Ok(to.from_base(from.to_base(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_every_unit_has_a_table_row() {
        let units = QuantityKind::ALL
            .iter()
            .flat_map(|kind| kind.units())
            .collect::<Vec<_>>();

        assert_eq!(units.len(), UNIT_TABLE.len());
        for kind in QuantityKind::ALL {
            assert_eq!(kind.base_unit().kind(), kind);
            assert_eq!(kind.base_unit().to_base(1.0), 1.0);
        }
    }

    #[test]
    fn test_temperature_conversions() {
        assert_close(convert(0.0, Unit::Celsius, Unit::Fahrenheit).unwrap(), 32.0);
        assert_close(convert(100.0, Unit::Celsius, Unit::Fahrenheit).unwrap(), 212.0);
        assert_close(convert(-40.0, Unit::Fahrenheit, Unit::Celsius).unwrap(), -40.0);
        assert_close(convert(0.0, Unit::Kelvin, Unit::Celsius).unwrap(), -273.15);
        assert_close(convert(32.0, Unit::Fahrenheit, Unit::Kelvin).unwrap(), 273.15);
    }

    #[test]
    fn test_pressure_conversions() {
        assert_close(convert(1013.25, Unit::Hectopascal, Unit::InchOfMercury).unwrap(), 29.921_255_347);
        assert_close(convert(1013.25, Unit::Hectopascal, Unit::Kilopascal).unwrap(), 101.325);
        assert_close(convert(760.0, Unit::MillimeterOfMercury, Unit::Hectopascal).unwrap(), 1013.25);
    }

    #[test]
    fn test_speed_and_length_conversions() {
        assert_close(convert(10.0, Unit::MeterPerSecond, Unit::KilometerPerHour).unwrap(), 36.0);
        assert_close(convert(1.0, Unit::Knot, Unit::KilometerPerHour).unwrap(), 1.852);
        assert_close(convert(60.0, Unit::MilePerHour, Unit::MeterPerSecond).unwrap(), 26.8224);
        assert_close(convert(25.4, Unit::Millimeter, Unit::Inch).unwrap(), 1.0);
        assert_close(convert(1.0, Unit::Mile, Unit::Foot).unwrap(), 5280.0);
        assert_close(convert(1.0, Unit::NauticalMile, Unit::Meter).unwrap(), 1852.0);
    }

    #[test]
    fn test_incompatible_units() {
        assert_eq!(
            convert(1.0, Unit::Celsius, Unit::Hectopascal),
            Err(ModelError::IncompatibleUnits {
                from: Unit::Celsius,
                to: Unit::Hectopascal
            })
        );
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Unit::from_symbol("hPa"), Ok(Unit::Hectopascal));
        assert_eq!(Unit::from_symbol("KM/H"), Ok(Unit::KilometerPerHour));
        assert_eq!(Unit::from_symbol("°F"), Ok(Unit::Fahrenheit));
        assert_eq!(
            Unit::from_symbol("furlong"),
            Err(ModelError::UnknownUnit("furlong".to_string()))
        );
        assert_eq!(Unit::InchOfMercury.to_string(), "inHg");
        assert_eq!(
            serde_json::to_string(&Unit::WattPerSquareMeter).unwrap(),
            "\"W/m²\""
        );
        assert_eq!(serde_json::from_str::<Unit>("\"kn\"").unwrap(), Unit::Knot);
    }

    #[test]
    fn test_selectable_quantities() {
        assert!(QuantityKind::Temperature.is_selectable());
        assert!(QuantityKind::Distance.is_selectable());
        assert!(!QuantityKind::Humidity.is_selectable());
        assert!(!QuantityKind::Dimensionless.is_selectable());
    }
}
