mod api;
mod error;
mod format;
mod geometry;
mod metric;
mod presets;
mod route;
mod sensor_types;
mod session;
mod settings;
mod station;
mod units;

pub use api::*;
pub use error::*;
pub use format::*;
pub use geometry::*;
pub use metric::*;
pub use presets::*;
pub use route::*;
pub use sensor_types::*;
pub use session::*;
pub use settings::*;
pub use station::*;
pub use units::*;
