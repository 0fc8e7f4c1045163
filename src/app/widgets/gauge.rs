use leptos::prelude::*;
use models::{
    gauge_fraction, gauge_value_path, polar_to_cartesian, Metric, GAUGE_START_DEG,
    GAUGE_SWEEP_DEG,
};

const CENTER: f64 = 60.0;
const RADIUS: f64 = 46.0;

fn angle_of(value: f64, range: (f64, f64)) -> f64 {
    GAUGE_START_DEG + GAUGE_SWEEP_DEG * gauge_fraction(value, range.0, range.1)
}

/// Tick across the arc, used for the extremes of aggregated readings.
#[component]
fn GaugeMarker(value: f64, range: (f64, f64)) -> impl IntoView {
    let angle = angle_of(value, range);
    let (x1, y1) = polar_to_cartesian(CENTER, CENTER, RADIUS - 9.0, angle);
    let (x2, y2) = polar_to_cartesian(CENTER, CENTER, RADIUS + 7.0, angle);
    view! {
        <line
            class="gauge-marker"
            x1=format!("{x1:.2}")
            y1=format!("{y1:.2}")
            x2=format!("{x2:.2}")
            y2=format!("{y2:.2}")
        />
    }
}

/// 270° arc gauge. Values outside the configured range pin to its ends.
#[component]
pub fn Gauge(metric: Metric) -> impl IntoView {
    let fraction = gauge_fraction(metric.value, metric.range.0, metric.range.1);
    let track = gauge_value_path(CENTER, CENTER, RADIUS, 1.0);
    let value = gauge_value_path(CENTER, CENTER, RADIUS, fraction);
    let range = metric.range;
    let markers = [metric.min, metric.max]
        .into_iter()
        .flatten()
        .map(|value| view! { <GaugeMarker value range /> })
        .collect::<Vec<_>>();
    let (low_x, low_y) = polar_to_cartesian(CENTER, CENTER, RADIUS, GAUGE_START_DEG);
    let (high_x, high_y) =
        polar_to_cartesian(CENTER, CENTER, RADIUS, GAUGE_START_DEG + GAUGE_SWEEP_DEG);
    let aria_label = metric.text.clone();
    view! {
        <svg class="gauge" viewBox="0 0 120 120" role="img" aria-label=aria_label>
            <path class="gauge-track" d=track />
            <path class="gauge-value" d=value />
            {markers}
            <text class="gauge-text" x="60" y="64" text-anchor="middle">
                {metric.text}
            </text>
            <text
                class="gauge-range"
                x=format!("{low_x:.1}")
                y=format!("{:.1}", low_y + 14.0)
                text-anchor="middle"
            >
                {metric.range_text.0}
            </text>
            <text
                class="gauge-range"
                x=format!("{high_x:.1}")
                y=format!("{:.1}", high_y + 14.0)
                text-anchor="middle"
            >
                {metric.range_text.1}
            </text>
        </svg>
    }
}
