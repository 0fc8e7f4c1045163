use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "/api";

/// Base URL of the REST backend, overridable at build time.
pub fn api_base_url() -> &'static str {
    option_env!("WEATHER_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL)
}

pub const SETTINGS_STORAGE_KEY: &str = "weather-dashboard.settings";
pub const SESSION_STORAGE_KEY: &str = "weather-dashboard.session";

pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
pub const MIN_TOKEN_REFRESH_DELAY: Duration = Duration::from_secs(5);
pub const STATION_STALE_AFTER: Duration = Duration::from_secs(30 * 60);

pub const STATION_SEARCH_SIMILARITY: f64 = 0.8;
pub const CLOCK_TICK_INTERVAL: Duration = Duration::from_secs(30);
