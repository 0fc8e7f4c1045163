use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::BTreeMap;

/// Characters escaped when an id is placed in a path segment.
pub(crate) const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

pub type RouteParams = BTreeMap<String, String>;

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// A path template of literal and `:param` segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(template: &str) -> Self {
        Self {
            segments: split_path(template)
                .map(|segment| match segment.strip_prefix(':') {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                })
                .collect(),
        }
    }

    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts = split_path(path).collect::<Vec<_>>();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    let value = percent_decode_str(part).decode_utf8().ok()?;
                    params.insert(name.clone(), value.into_owned());
                }
            }
        }
        Some(params)
    }
}

/// Ordered set of patterns, the first one that matches wins.
#[derive(Clone, Debug)]
pub struct RouteTable<N> {
    routes: Vec<(RoutePattern, N)>,
}

impl<N> Default for RouteTable<N> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<N: Clone> RouteTable<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, template: &str, name: N) -> Self {
        self.routes.push((RoutePattern::parse(template), name));
        self
    }

    pub fn matches(&self, path: &str) -> Option<(N, RouteParams)> {
        self.routes.iter().find_map(|(pattern, name)| {
            pattern.matches(path).map(|params| (name.clone(), params))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RouteKind {
    Home,
    Login,
    Stations,
    Station,
    Sensor,
    Settings,
}

fn route_table() -> RouteTable<RouteKind> {
    RouteTable::new()
        .route("/", RouteKind::Home)
        .route("/login", RouteKind::Login)
        .route("/stations", RouteKind::Stations)
        .route("/stations/:station_id", RouteKind::Station)
        .route("/stations/:station_id/sensors/:sensor_id", RouteKind::Sensor)
        .route("/settings", RouteKind::Settings)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Stations,
    Station { id: String },
    Sensor { station_id: String, sensor_id: String },
    Settings,
    NotFound(String),
}

impl Route {
    pub fn from_path(path: &str) -> Route {
        // the query part is not used for routing
        let path = path.split('?').next().unwrap_or_default();
        let Some((kind, mut params)) = route_table().matches(path) else {
            return Route::NotFound(path.to_string());
        };
        let mut param = |name: &str| params.remove(name).unwrap_or_default();
        match kind {
            RouteKind::Home => Route::Home,
            RouteKind::Login => Route::Login,
            RouteKind::Stations => Route::Stations,
            RouteKind::Station => Route::Station {
                id: param("station_id"),
            },
            RouteKind::Sensor => Route::Sensor {
                station_id: param("station_id"),
                sensor_id: param("sensor_id"),
            },
            RouteKind::Settings => Route::Settings,
        }
    }

    /// Parses `location.hash`, e.g. `#/stations/7`. An empty hash is home.
    pub fn from_hash(hash: &str) -> Route {
        let path = hash.strip_prefix('#').unwrap_or(hash);
        Route::from_path(path)
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Stations => "/stations".to_string(),
            Route::Station { id } => format!("/stations/{}", encode_segment(id)),
            Route::Sensor {
                station_id,
                sensor_id,
            } => format!(
                "/stations/{}/sensors/{}",
                encode_segment(station_id),
                encode_segment(sensor_id)
            ),
            Route::Settings => "/settings".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn to_hash(&self) -> String {
        format!("#{}", self.to_path())
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matching() {
        let pattern = RoutePattern::parse("/stations/:station_id/sensors/:sensor_id");

        let params = pattern.matches("/stations/7/sensors/t1").unwrap();

        assert_eq!(params.get("station_id").map(String::as_str), Some("7"));
        assert_eq!(params.get("sensor_id").map(String::as_str), Some("t1"));
        assert!(pattern.matches("/stations/7/sensors").is_none());
        assert!(pattern.matches("/stations/7/readings/t1").is_none());
    }

    #[test]
    fn test_pattern_ignores_empty_segments() {
        let pattern = RoutePattern::parse("/stations/:id");

        assert!(pattern.matches("/stations/7/").is_some());
        assert!(pattern.matches("stations//7").is_some());
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::new()
            .route("/stations/new", "create")
            .route("/stations/:id", "show")
            .route("/stations/new", "never");

        assert_eq!(table.matches("/stations/new").map(|(name, _)| name), Some("create"));
        assert_eq!(table.matches("/stations/3").map(|(name, _)| name), Some("show"));
        assert_eq!(table.matches("/nowhere"), None);
    }

    #[test]
    fn test_route_from_hash() {
        assert_eq!(Route::from_hash(""), Route::Home);
        assert_eq!(Route::from_hash("#"), Route::Home);
        assert_eq!(Route::from_hash("#/"), Route::Home);
        assert_eq!(Route::from_hash("#/login"), Route::Login);
        assert_eq!(Route::from_hash("#/settings/"), Route::Settings);
        assert_eq!(
            Route::from_hash("#/stations/42?tab=sensors"),
            Route::Station {
                id: "42".to_string()
            }
        );
        assert_eq!(
            Route::from_hash("#/stations/roof%20north/sensors/t%2F1"),
            Route::Sensor {
                station_id: "roof north".to_string(),
                sensor_id: "t/1".to_string()
            }
        );
        assert_eq!(
            Route::from_hash("#/stations/7/oops"),
            Route::NotFound("/stations/7/oops".to_string())
        );
    }

    #[test]
    fn test_route_round_trip() {
        let routes = [
            Route::Home,
            Route::Login,
            Route::Stations,
            Route::Settings,
            Route::Station {
                id: "roof north".to_string(),
            },
            Route::Sensor {
                station_id: "7".to_string(),
                sensor_id: "t/1?".to_string(),
            },
        ];
        for route in routes {
            assert_eq!(Route::from_hash(&route.to_hash()), route);
        }
    }

    #[test]
    fn test_requires_auth() {
        assert!(!Route::Login.requires_auth());
        assert!(Route::Stations.requires_auth());
        assert!(Route::NotFound("/x".to_string()).requires_auth());
    }
}
