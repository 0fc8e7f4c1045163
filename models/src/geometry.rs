use chrono::{DateTime, Utc};

use crate::metric::SeriesPoint;

/// Gauges open at the bottom: the arc runs from 225° to 135° clockwise.
pub const GAUGE_START_DEG: f64 = -135.0;
pub const GAUGE_SWEEP_DEG: f64 = 270.0;

/// Position of `value` within `[min, max]`, clamped to `[0, 1]`.
pub fn gauge_fraction(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() || !(max > min) {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Angles are compass-style: 0° points up, growing clockwise.
pub fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (cx + radius * radians.sin(), cy - radius * radians.cos())
}

/// SVG path of a clockwise arc. Arcs of 360° or more cannot be drawn in
/// one command and are cut just short of a full circle.
pub fn arc_path(cx: f64, cy: f64, radius: f64, start_deg: f64, end_deg: f64) -> String {
    let (sx, sy) = polar_to_cartesian(cx, cy, radius, start_deg);
    let sweep = (end_deg - start_deg).clamp(0.0, 359.99);
    if sweep == 0.0 {
        return format!("M {sx:.2} {sy:.2}");
    }
    let (ex, ey) = polar_to_cartesian(cx, cy, radius, start_deg + sweep);
    let large_arc = u8::from(sweep > 180.0);
    format!("M {sx:.2} {sy:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {ex:.2} {ey:.2}")
}

pub fn gauge_value_path(cx: f64, cy: f64, radius: f64, fraction: f64) -> String {
    arc_path(
        cx,
        cy,
        radius,
        GAUGE_START_DEG,
        GAUGE_START_DEG + GAUGE_SWEEP_DEG * fraction.clamp(0.0, 1.0),
    )
}

/// Maps time and value domains onto a chart viewbox.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartScale {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    t_min: i64,
    t_max: i64,
    pub v_min: f64,
    pub v_max: f64,
}

impl ChartScale {
    /// Fits the domains to the points, including min/max bands. Flat or
    /// single-point series get an artificial spread so nothing divides by
    /// zero. Returns `None` for an empty series.
    pub fn fit(points: &[SeriesPoint], width: f64, height: f64, padding: f64) -> Option<Self> {
        let first = points.first()?;
        let mut t_min = first.timestamp.timestamp_millis();
        let mut t_max = t_min;
        let mut v_min = f64::INFINITY;
        let mut v_max = f64::NEG_INFINITY;
        for point in points {
            let t = point.timestamp.timestamp_millis();
            t_min = t_min.min(t);
            t_max = t_max.max(t);
            for v in [point.value, point.min, point.max] {
                if v.is_finite() {
                    v_min = v_min.min(v);
                    v_max = v_max.max(v);
                }
            }
        }
        if !v_min.is_finite() {
            return None;
        }
        if t_min == t_max {
            t_min -= 30 * 60 * 1000;
            t_max += 30 * 60 * 1000;
        }
        if v_max - v_min < f64::EPSILON {
            let spread = (v_min.abs() * 0.1).max(1.0);
            v_min -= spread;
            v_max += spread;
        }
        Some(Self {
            width,
            height,
            padding,
            t_min,
            t_max,
            v_min,
            v_max,
        })
    }

    pub fn x(&self, ts: &DateTime<Utc>) -> f64 {
        let span = (self.t_max - self.t_min) as f64;
        let offset = (ts.timestamp_millis() - self.t_min) as f64;
        self.padding + offset / span * (self.width - 2.0 * self.padding)
    }

    pub fn y(&self, value: f64) -> f64 {
        let fraction = (value - self.v_min) / (self.v_max - self.v_min);
        self.height - self.padding - fraction * (self.height - 2.0 * self.padding)
    }

    /// `points` attribute of an SVG polyline through the series means.
    pub fn polyline(&self, points: &[SeriesPoint]) -> String {
        points
            .iter()
            .filter(|point| point.value.is_finite())
            .map(|point| format!("{:.1},{:.1}", self.x(&point.timestamp), self.y(point.value)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Closed path around the min/max envelope: along the maxima forward,
    /// back along the minima.
    pub fn band_path(&self, points: &[SeriesPoint]) -> Option<String> {
        if points.len() < 2 {
            return None;
        }
        let upper = points
            .iter()
            .map(|point| (self.x(&point.timestamp), self.y(point.max)));
        let lower = points
            .iter()
            .rev()
            .map(|point| (self.x(&point.timestamp), self.y(point.min)));
        let path = upper
            .chain(lower)
            .enumerate()
            .map(|(index, (x, y))| {
                let command = if index == 0 { 'M' } else { 'L' };
                format!("{command} {x:.1} {y:.1}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        Some(format!("{path} Z"))
    }

    /// Evenly spaced value ticks from the bottom to the top of the domain.
    pub fn value_ticks(&self, count: usize) -> Vec<f64> {
        if count < 2 {
            return vec![self.v_min];
        }
        let step = (self.v_max - self.v_min) / (count - 1) as f64;
        (0..count)
            .map(|index| self.v_min + step * index as f64)
            .collect()
    }

    pub fn time_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            DateTime::from_timestamp_millis(self.t_min).unwrap_or_default(),
            DateTime::from_timestamp_millis(self.t_max).unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(minute: u32, value: f64) -> SeriesPoint {
        SeriesPoint {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
            value,
            min: value,
            max: value,
            count: 1,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_gauge_fraction() {
        assert_close(gauge_fraction(25.0, 0.0, 100.0), 0.25);
        assert_close(gauge_fraction(-10.0, 0.0, 100.0), 0.0);
        assert_close(gauge_fraction(150.0, 0.0, 100.0), 1.0);
        assert_close(gauge_fraction(5.0, 10.0, 10.0), 0.0);
        assert_close(gauge_fraction(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let (x, y) = polar_to_cartesian(50.0, 50.0, 10.0, 0.0);
        assert_close(x, 50.0);
        assert_close(y, 40.0);

        let (x, y) = polar_to_cartesian(50.0, 50.0, 10.0, 90.0);
        assert_close(x, 60.0);
        assert_close(y, 50.0);
    }

    #[test]
    fn test_arc_path() {
        assert_eq!(
            arc_path(50.0, 50.0, 10.0, 0.0, 90.0),
            "M 50.00 40.00 A 10.00 10.00 0 0 1 60.00 50.00"
        );
        assert_eq!(
            arc_path(50.0, 50.0, 10.0, 0.0, 270.0),
            "M 50.00 40.00 A 10.00 10.00 0 1 1 40.00 50.00"
        );
        assert_eq!(arc_path(50.0, 50.0, 10.0, 0.0, 0.0), "M 50.00 40.00");
        assert_eq!(arc_path(50.0, 50.0, 10.0, 90.0, 10.0), "M 60.00 50.00");
    }

    #[test]
    fn test_gauge_value_path_spans_full_sweep() {
        let full = gauge_value_path(60.0, 60.0, 50.0, 1.0);
        let empty = gauge_value_path(60.0, 60.0, 50.0, 0.0);

        assert!(full.contains(" 1 1 "));
        assert!(!empty.contains('A'));
    }

    #[test]
    fn test_chart_scale_maps_corners() {
        let points = vec![point(0, 10.0), point(30, 20.0), point(60 - 1, 15.0)];
        let scale = ChartScale::fit(&points, 200.0, 100.0, 10.0).unwrap();

        assert_close(scale.x(&points[0].timestamp), 10.0);
        assert_close(scale.x(&points[2].timestamp), 190.0);
        assert_close(scale.y(10.0), 90.0);
        assert_close(scale.y(20.0), 10.0);
    }

    #[test]
    fn test_chart_scale_degenerate_domains() {
        assert!(ChartScale::fit(&[], 200.0, 100.0, 10.0).is_none());

        let single = vec![point(0, 5.0)];
        let scale = ChartScale::fit(&single, 200.0, 100.0, 10.0).unwrap();

        assert_close(scale.x(&single[0].timestamp), 100.0);
        assert_close(scale.y(5.0), 50.0);
        assert!(scale.band_path(&single).is_none());
    }

    #[test]
    fn test_chart_scale_flat_domain() {
        let flat = vec![point(0, 5.0), point(30, 5.0)];
        let scale = ChartScale::fit(&flat, 200.0, 100.0, 10.0).unwrap();

        assert!(scale.v_min < 5.0 && 5.0 < scale.v_max);
        assert_close(scale.v_min, 4.0);
        assert_close(scale.v_max, 6.0);
        assert_close(scale.y(5.0), 50.0);
        assert_close(scale.x(&flat[0].timestamp), 10.0);
        assert_close(scale.x(&flat[1].timestamp), 190.0);
        assert_eq!(scale.polyline(&flat), "10.0,50.0 190.0,50.0");
    }

    #[test]
    fn test_band_path_includes_envelope() {
        let mut points = vec![point(0, 10.0), point(10, 20.0)];
        points[0].min = 5.0;
        points[1].max = 30.0;
        let scale = ChartScale::fit(&points, 100.0, 100.0, 0.0).unwrap();

        let band = scale.band_path(&points).unwrap();

        assert_close(scale.y(5.0), 100.0);
        assert_close(scale.y(30.0), 0.0);
        assert!(band.starts_with("M 0.0 "));
        assert!(band.ends_with(" Z"));
        assert_eq!(band.matches('L').count(), 3);
        assert_eq!(scale.polyline(&points).split(' ').count(), 2);
    }

    #[test]
    fn test_value_ticks() {
        let points = vec![point(0, 0.0), point(1, 100.0)];
        let scale = ChartScale::fit(&points, 100.0, 100.0, 0.0).unwrap();

        assert_eq!(scale.value_ticks(5), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(scale.value_ticks(1), vec![0.0]);
    }
}
