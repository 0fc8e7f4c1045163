use leptos::prelude::*;
use models::{ChartScale, DisplaySettings, Series};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 260.0;
const PADDING: f64 = 36.0;
const VALUE_TICKS: usize = 5;

/// Line chart of a series. Aggregated series also show the min/max band.
#[component]
pub fn Chart(series: Series, display: DisplaySettings) -> impl IntoView {
    let Some(scale) = ChartScale::fit(&series.points, WIDTH, HEIGHT, PADDING) else {
        return view! { <p class="chart-empty">"No readings in this time range"</p> }.into_any();
    };

    let band = series
        .aggregated
        .then(|| scale.band_path(&series.points))
        .flatten()
        .map(|d| view! { <path class="chart-band" d=d /> });
    let line = scale.polyline(&series.points);
    let ticks = scale
        .value_ticks(VALUE_TICKS)
        .into_iter()
        .map(|value| {
            let y = format!("{:.1}", scale.y(value));
            let label = display.quantity(value, series.unit, series.precision);
            view! {
                <line
                    class="chart-grid"
                    x1=format!("{PADDING:.1}")
                    x2=format!("{:.1}", WIDTH - PADDING)
                    y1=y.clone()
                    y2=y.clone()
                />
                <text class="chart-tick" x="2" y=y>
                    {label}
                </text>
            }
        })
        .collect::<Vec<_>>();
    let (from, to) = scale.time_bounds();
    let bottom = format!("{:.1}", HEIGHT - 6.0);

    view! {
        <svg
            class="chart"
            viewBox=format!("0 0 {WIDTH} {HEIGHT}")
            preserveAspectRatio="none"
            role="img"
            aria-label=series.label
        >
            {ticks}
            {band}
            <polyline class="chart-line" points=line />
            <text class="chart-tick" x=format!("{PADDING:.1}") y=bottom.clone()>
                {display.timestamp(&from)}
            </text>
            <text
                class="chart-tick"
                x=format!("{:.1}", WIDTH - PADDING)
                y=bottom
                text-anchor="end"
            >
                {display.timestamp(&to)}
            </text>
        </svg>
    }
    .into_any()
}
