use leptos::prelude::*;
use models::{compass_point, polar_to_cartesian, Metric};

const CENTER: f64 = 60.0;
const RADIUS: f64 = 46.0;
const CARDINALS: [(&str, f64); 4] = [("N", 0.0), ("E", 90.0), ("S", 180.0), ("W", 270.0)];

/// Wind rose with a needle pointing where the wind comes from.
#[component]
pub fn Compass(metric: Metric) -> impl IntoView {
    let direction = metric.value.rem_euclid(360.0);
    let has_direction = direction.is_finite();
    let needle = format!("rotate({direction:.1} {CENTER} {CENTER})");
    let cardinals = CARDINALS
        .into_iter()
        .map(|(label, degrees)| {
            let (x, y) = polar_to_cartesian(CENTER, CENTER, RADIUS - 12.0, degrees);
            view! {
                <text
                    class="compass-cardinal"
                    x=format!("{x:.1}")
                    y=format!("{:.1}", y + 4.0)
                    text-anchor="middle"
                >
                    {label}
                </text>
            }
        })
        .collect::<Vec<_>>();
    let label = if has_direction {
        compass_point(direction).to_string()
    } else {
        models::MISSING_VALUE.to_string()
    };
    view! {
        <svg class="compass" viewBox="0 0 120 134" role="img" aria-label=metric.text>
            <circle class="compass-ring" cx="60" cy="60" r=RADIUS.to_string() />
            {cardinals}
            <Show when=move || has_direction>
                <g transform=needle.clone()>
                    <path class="compass-needle" d="M 60 22 L 66 60 L 60 54 L 54 60 Z" />
                    <path class="compass-tail" d="M 60 98 L 64 60 L 60 66 L 56 60 Z" />
                </g>
            </Show>
            <text class="compass-text" x="60" y="128" text-anchor="middle">
                {label}
            </text>
        </svg>
    }
}
