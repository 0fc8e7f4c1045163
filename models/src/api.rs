use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, time::Duration};
use url::form_urlencoded;

use crate::route::encode_segment;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(alias = "access_token")]
    pub access_token: String,
    #[serde(default, alias = "refresh_token")]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(alias = "expires_in")]
    pub expires_in: u64,
}

/// Error payload the backend sends with non-2xx responses.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(alias = "error")]
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregationInterval {
    Raw,
    Hourly,
    SixHourly,
    Daily,
}

impl AggregationInterval {
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            AggregationInterval::Raw => None,
            AggregationInterval::Hourly => Some("1h"),
            AggregationInterval::SixHourly => Some("6h"),
            AggregationInterval::Daily => Some("1d"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HistoryRange {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl HistoryRange {
    pub const ALL: [HistoryRange; 4] = [
        HistoryRange::Day,
        HistoryRange::Week,
        HistoryRange::Month,
        HistoryRange::Year,
    ];

    pub fn duration(self) -> Duration {
        const DAY: u64 = 24 * 60 * 60;
        Duration::from_secs(match self {
            HistoryRange::Day => DAY,
            HistoryRange::Week => 7 * DAY,
            HistoryRange::Month => 30 * DAY,
            HistoryRange::Year => 365 * DAY,
        })
    }

    /// Longer ranges are fetched pre-aggregated to keep charts light.
    pub fn interval(self) -> AggregationInterval {
        match self {
            HistoryRange::Day => AggregationInterval::Raw,
            HistoryRange::Week => AggregationInterval::Hourly,
            HistoryRange::Month => AggregationInterval::SixHourly,
            HistoryRange::Year => AggregationInterval::Daily,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HistoryRange::Day => "24h",
            HistoryRange::Week => "7d",
            HistoryRange::Month => "30d",
            HistoryRange::Year => "365d",
        }
    }

    pub fn from_name(name: &str) -> Option<HistoryRange> {
        HistoryRange::ALL
            .into_iter()
            .find(|range| range.as_str() == name)
    }
}

impl Display for HistoryRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryRange::Day => write!(f, "Last 24 hours"),
            HistoryRange::Week => write!(f, "Last 7 days"),
            HistoryRange::Month => write!(f, "Last 30 days"),
            HistoryRange::Year => write!(f, "Last year"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct ReadingsQuery {
    pub sensor: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub interval: Option<AggregationInterval>,
}

impl ReadingsQuery {
    pub fn history(sensor_id: &str, range: HistoryRange, now: DateTime<Utc>) -> Self {
        let span = chrono::Duration::from_std(range.duration()).unwrap_or_else(|_| chrono::Duration::days(1));
        Self {
            sensor: Some(sensor_id.to_string()),
            from: Some(now - span),
            to: Some(now),
            interval: Some(range.interval()),
        }
    }

    /// Empty for a query without filters, otherwise `?key=value&...`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(sensor) = &self.sensor {
            serializer.append_pair("sensor", sensor);
        }
        if let Some(from) = &self.from {
            serializer.append_pair("from", &from.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        if let Some(to) = &self.to {
            serializer.append_pair("to", &to.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        if let Some(interval) = self.interval.and_then(AggregationInterval::as_str) {
            serializer.append_pair("interval", interval);
        }
        let query = serializer.finish();
        if query.is_empty() {
            query
        } else {
            format!("?{query}")
        }
    }
}

/// Backend paths, relative to the API base URL.
pub mod endpoints {
    use super::*;

    pub const LOGIN: &str = "/auth/login";
    pub const REFRESH: &str = "/auth/refresh";
    pub const STATIONS: &str = "/stations";

    pub fn station(station_id: &str) -> String {
        format!("{STATIONS}/{}", encode_segment(station_id))
    }

    pub fn readings(station_id: &str, query: &ReadingsQuery) -> String {
        format!("{}/readings{}", station(station_id), query.to_query_string())
    }

    pub fn latest_readings(station_id: &str) -> String {
        format!("{}/readings/latest", station(station_id))
    }

    pub fn join(base_url: &str, path: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 8, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_token_response_accepts_both_casings() {
        let camel = r#"{"accessToken": "a", "refreshToken": "r", "expiresIn": 900}"#;
        let snake = r#"{"access_token": "a", "expires_in": 900}"#;

        let camel: TokenResponse = serde_json::from_str(camel).unwrap();
        let snake: TokenResponse = serde_json::from_str(snake).unwrap();

        assert_eq!(camel.refresh_token.as_deref(), Some("r"));
        assert_eq!(snake.refresh_token, None);
        assert_eq!(snake.expires_in, 900);
    }

    #[test]
    fn test_empty_query_string() {
        assert_eq!(ReadingsQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_history_query_string() {
        let query = ReadingsQuery::history("t 1", HistoryRange::Week, now());

        assert_eq!(
            query.to_query_string(),
            "?sensor=t+1&from=2024-05-01T12%3A00%3A00Z&to=2024-05-08T12%3A00%3A00Z&interval=1h"
        );
    }

    #[test]
    fn test_raw_interval_is_omitted() {
        let query = ReadingsQuery::history("t1", HistoryRange::Day, now());

        assert!(!query.to_query_string().contains("interval"));
        assert_eq!(query.from, Some(Utc.with_ymd_and_hms(2024, 5, 7, 12, 0, 0).unwrap()));
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(endpoints::station("roof/north"), "/stations/roof%2Fnorth");
        assert_eq!(endpoints::latest_readings("7"), "/stations/7/readings/latest");
        assert_eq!(
            endpoints::readings("7", &ReadingsQuery::default()),
            "/stations/7/readings"
        );
        assert_eq!(endpoints::join("https://wx.example/api/", "/stations"), "https://wx.example/api/stations");
        assert_eq!(endpoints::join("/api", endpoints::LOGIN), "/api/auth/login");
    }

    #[test]
    fn test_history_ranges() {
        assert_eq!(HistoryRange::from_name("30d"), Some(HistoryRange::Month));
        assert_eq!(HistoryRange::Month.interval(), AggregationInterval::SixHourly);
        assert_eq!(HistoryRange::Year.interval().as_str(), Some("1d"));
        assert_eq!(HistoryRange::from_name("2w"), None);
    }
}
