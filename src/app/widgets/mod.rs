mod chart;
mod compass;
mod gauge;
mod metric_widget;

pub use chart::Chart;
pub use compass::Compass;
pub use gauge::Gauge;
pub use metric_widget::{MetricCard, MetricWidget};
