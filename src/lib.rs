//! Wine production by region and vintage: row statistics, region aggregation
//! joined with reprojected region geometry, and the slices a dashboard
//! recomputes on every selection change.

pub mod config;
pub mod error;
mod frame;
pub mod geometry;
pub mod join;
pub mod loader;
pub mod logging;
pub mod names;
pub mod pipeline;
pub mod schema;
pub mod stats;
pub mod views;

#[cfg(feature = "python")]
mod python;

pub use config::{NameRepair, PipelineConfig};
pub use error::{AtlasError, Result};
pub use geometry::{CrsCode, RegionCollection, RegionFeature, RegionPoint};
pub use join::{add_geometry, JoinReport};
pub use pipeline::{DashboardSelection, DashboardView, WinePipeline};
pub use stats::add_basic_stats;
pub use views::{AreaGranularity, ProductionSummary, RegionSeries, WineColor};
