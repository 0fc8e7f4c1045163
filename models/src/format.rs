use chrono::{DateTime, TimeZone, Utc};
use reactive_stores::Store;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::units::Unit;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayLocale {
    #[default]
    En,
    De,
    Fr,
}

impl DisplayLocale {
    pub const ALL: [DisplayLocale; 3] = [DisplayLocale::En, DisplayLocale::De, DisplayLocale::Fr];

    fn decimal_separator(self) -> char {
        match self {
            DisplayLocale::En => '.',
            DisplayLocale::De | DisplayLocale::Fr => ',',
        }
    }

    fn group_separator(self) -> char {
        match self {
            DisplayLocale::En => ',',
            DisplayLocale::De => '.',
            DisplayLocale::Fr => '\u{202f}',
        }
    }

    fn date_pattern(self) -> &'static str {
        match self {
            DisplayLocale::En => "%m/%d/%Y",
            DisplayLocale::De => "%d.%m.%Y",
            DisplayLocale::Fr => "%d/%m/%Y",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayLocale::En => "en",
            DisplayLocale::De => "de",
            DisplayLocale::Fr => "fr",
        }
    }

    pub fn from_tag(tag: &str) -> Option<DisplayLocale> {
        let language = tag.split(['-', '_']).next().unwrap_or(tag);
        DisplayLocale::ALL
            .into_iter()
            .find(|locale| locale.as_str().eq_ignore_ascii_case(language))
    }
}

impl Display for DisplayLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayLocale::En => write!(f, "English"),
            DisplayLocale::De => write!(f, "Deutsch"),
            DisplayLocale::Fr => write!(f, "Français"),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClockFormat {
    H12,
    #[default]
    H24,
}

impl ClockFormat {
    fn time_pattern(self) -> &'static str {
        match self {
            ClockFormat::H12 => "%I:%M %p",
            ClockFormat::H24 => "%H:%M",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeZoneChoice {
    #[default]
    Local,
    Utc,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Default, Store)]
#[serde(default)]
pub struct DisplaySettings {
    pub locale: DisplayLocale,
    pub clock: ClockFormat,
    pub timezone: TimeZoneChoice,
}

impl DisplaySettings {
    pub fn number(&self, value: f64, precision: u8) -> String {
        format_number(value, precision, self.locale)
    }

    /// Number followed by its unit symbol; `%` and `°` attach directly.
    pub fn quantity(&self, value: f64, unit: Unit, precision: u8) -> String {
        let number = self.number(value, precision);
        match unit {
            Unit::None => number,
            unit if unit.is_attached() => format!("{number}{unit}"),
            unit => format!("{number} {unit}"),
        }
    }

    pub fn timestamp(&self, ts: &DateTime<Utc>) -> String {
        match self.timezone {
            TimeZoneChoice::Local => format_timestamp(ts, &chrono::Local, self.locale, self.clock),
            TimeZoneChoice::Utc => format_timestamp(ts, &Utc, self.locale, self.clock),
        }
    }

    pub fn time(&self, ts: &DateTime<Utc>) -> String {
        match self.timezone {
            TimeZoneChoice::Local => format_time(ts, &chrono::Local, self.clock),
            TimeZoneChoice::Utc => format_time(ts, &Utc, self.clock),
        }
    }
}

pub const MISSING_VALUE: &str = "–";

/// Formats with a fixed number of decimals, locale separators and
/// thousands grouping.
pub fn format_number(value: f64, precision: u8, locale: DisplayLocale) -> String {
    if !value.is_finite() {
        return MISSING_VALUE.to_string();
    }
    let formatted = format!("{:.*}", usize::from(precision), value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(locale.group_separator());
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push(locale.decimal_separator());
        grouped.push_str(fraction);
    }

    // -0.04 rounded to one decimal is not negative anymore
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_timestamp<Tz>(
    ts: &DateTime<Utc>,
    tz: &Tz,
    locale: DisplayLocale,
    clock: ClockFormat,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let pattern = format!("{} {}", locale.date_pattern(), clock.time_pattern());
    ts.with_timezone(tz).format(&pattern).to_string()
}

pub fn format_time<Tz>(ts: &DateTime<Utc>, tz: &Tz, clock: ClockFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ts.with_timezone(tz).format(clock.time_pattern()).to_string()
}

pub fn format_relative(ts: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(*ts).num_seconds();
    match seconds {
        s if s < 45 => "just now".to_string(),
        s if s < 3_600 => format!("{} min ago", (s + 30) / 60),
        s if s < 86_400 => format!("{} h ago", s / 3_600),
        s => format!("{} d ago", s / 86_400),
    }
}

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

pub fn compass_point(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return MISSING_VALUE;
    }
    let normalized = degrees.rem_euclid(360.0);
    let index = ((normalized / 22.5) + 0.5).floor() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn sample_ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_format_number_per_locale() {
        assert_eq!(format_number(1234567.891, 2, DisplayLocale::En), "1,234,567.89");
        assert_eq!(format_number(1234567.891, 2, DisplayLocale::De), "1.234.567,89");
        assert_eq!(
            format_number(1234.5, 1, DisplayLocale::Fr),
            "1\u{202f}234,5"
        );
        assert_eq!(format_number(999.0, 0, DisplayLocale::En), "999");
        assert_eq!(format_number(1000.0, 0, DisplayLocale::En), "1,000");
    }

    #[test]
    fn test_format_number_signs_and_gaps() {
        assert_eq!(format_number(-12.34, 1, DisplayLocale::En), "-12.3");
        assert_eq!(format_number(-0.04, 1, DisplayLocale::En), "0.0");
        assert_eq!(format_number(-1500.0, 0, DisplayLocale::De), "-1.500");
        assert_eq!(format_number(f64::NAN, 1, DisplayLocale::En), MISSING_VALUE);
        assert_eq!(format_number(f64::INFINITY, 1, DisplayLocale::En), MISSING_VALUE);
    }

    #[test]
    fn test_quantity_attaches_percent_and_degree() {
        let display = DisplaySettings {
            locale: DisplayLocale::De,
            ..Default::default()
        };

        assert_eq!(display.quantity(1013.26, Unit::Hectopascal, 1), "1.013,3 hPa");
        assert_eq!(display.quantity(54.0, Unit::Percent, 0), "54%");
        assert_eq!(display.quantity(50.0, Unit::Percent, 1), "50,0%");
        assert_eq!(display.quantity(3.0, Unit::None, 0), "3");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = sample_ts();

        assert_eq!(
            format_timestamp(&ts, &Utc, DisplayLocale::En, ClockFormat::H12),
            "03/07/2024 02:05 PM"
        );
        assert_eq!(
            format_timestamp(&ts, &Utc, DisplayLocale::De, ClockFormat::H24),
            "07.03.2024 14:05"
        );

        let lisbon_summer = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            format_timestamp(&ts, &lisbon_summer, DisplayLocale::Fr, ClockFormat::H24),
            "07/03/2024 15:05"
        );
        assert_eq!(format_time(&ts, &lisbon_summer, ClockFormat::H24), "15:05");
    }

    #[test]
    fn test_format_relative() {
        let now = sample_ts();

        assert_eq!(format_relative(&now, &now), "just now");
        assert_eq!(
            format_relative(&(now + chrono::Duration::seconds(30)), &now),
            "just now"
        );
        assert_eq!(
            format_relative(&(now - chrono::Duration::minutes(5)), &now),
            "5 min ago"
        );
        assert_eq!(
            format_relative(&(now - chrono::Duration::hours(3)), &now),
            "3 h ago"
        );
        assert_eq!(
            format_relative(&(now - chrono::Duration::days(2)), &now),
            "2 d ago"
        );
    }

    #[test]
    fn test_compass_point() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(11.0), "N");
        assert_eq!(compass_point(12.0), "NNE");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(225.0), "SW");
        assert_eq!(compass_point(350.0), "N");
        assert_eq!(compass_point(-90.0), "W");
        assert_eq!(compass_point(720.0 + 180.0), "S");
        assert_eq!(compass_point(f64::NAN), MISSING_VALUE);
    }

    #[test]
    fn test_locale_tags() {
        assert_eq!(DisplayLocale::from_tag("de-AT"), Some(DisplayLocale::De));
        assert_eq!(DisplayLocale::from_tag("fr_FR"), Some(DisplayLocale::Fr));
        assert_eq!(DisplayLocale::from_tag("en"), Some(DisplayLocale::En));
        assert_eq!(DisplayLocale::from_tag("pt-BR"), None);
    }
}
