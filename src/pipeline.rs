use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::geometry::RegionCollection;
use crate::join::{add_geometry, normalize_region_column, JoinReport};
use crate::loader::{read_geometry_geojson, read_production_csv};
use crate::schema::year;
use crate::stats::add_basic_stats;
use crate::views::{self, AreaGranularity, ProductionSummary, RegionSeries, WineColor};

/// Parameters of the all-regions dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSelection {
    /// A vintage label or `average`.
    pub year: String,
    pub area: AreaGranularity,
}

impl Default for DashboardSelection {
    fn default() -> Self {
        Self {
            year: year::AVERAGE.to_string(),
            area: AreaGranularity::Aoc,
        }
    }
}

/// Everything the all-regions dashboard shows for one selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub production_by_area: DataFrame,
    pub summary: ProductionSummary,
    pub map_red: DataFrame,
    pub map_white: DataFrame,
}

/// Base tables computed once at startup and read-only afterwards.
pub struct WinePipeline {
    config: PipelineConfig,
    production: DataFrame,
    augmented: DataFrame,
    enriched: DataFrame,
    join_report: JoinReport,
}

impl WinePipeline {
    /// Augment the production table and join it with the region geometry.
    pub fn new(production: DataFrame, regions: &RegionCollection, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let mut augmented = add_basic_stats(&production, &config.vintage_names())?;
        // Bar slices and map slices must agree on region keys.
        if config.repair_region_names {
            augmented = normalize_region_column(&augmented)?;
        }
        let (enriched, join_report) = add_geometry(&augmented, regions, &config)?;

        info!(
            production_rows = production.height(),
            enriched_rows = enriched.height(),
            regions = regions.features.len(),
            "wine pipeline ready"
        );

        Ok(Self {
            config,
            production,
            augmented,
            enriched,
            join_report,
        })
    }

    /// Load `production_file` and `geometry_file` from `base_path`, then build.
    pub fn from_dir(base_path: impl AsRef<Path>, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let base = base_path.as_ref();
        let production = read_production_csv(base.join(&config.production_file), &config.vintage_names())?;
        let regions = read_geometry_geojson(base.join(&config.geometry_file), &config.geometry_name_property)?;
        Self::new(production, &regions, config)
    }

    // ── Base tables ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn production(&self) -> &DataFrame {
        &self.production
    }

    pub fn augmented(&self) -> &DataFrame {
        &self.augmented
    }

    pub fn enriched(&self) -> &DataFrame {
        &self.enriched
    }

    pub fn join_report(&self) -> &JoinReport {
        &self.join_report
    }

    pub fn vintages(&self) -> Vec<&str> {
        self.config.vintage_names()
    }

    /// Year selections in display order: `average` first, then the vintages.
    pub fn year_options(&self) -> Vec<&str> {
        let mut years = vec![year::AVERAGE];
        years.extend(self.vintages());
        years
    }

    // ── Slices ──────────────────────────────────────────────────────────────

    pub fn production_by_year_and_area(&self, year: &str, area: AreaGranularity) -> Result<DataFrame> {
        views::production_by_year_and_area(&self.augmented, year, area, &self.vintages())
    }

    pub fn map_points_by_year_and_color(&self, year: &str, color: WineColor) -> Result<DataFrame> {
        views::map_points_by_year_and_color(&self.enriched, year, color, &self.vintages())
    }

    pub fn list_of_regions(&self) -> Result<Vec<String>> {
        views::list_of_regions(&self.enriched)
    }

    pub fn region_view(&self, region: &str) -> Result<RegionSeries> {
        views::region_series(&self.enriched, region, &self.vintages())
    }

    pub fn dashboard_view(&self, selection: &DashboardSelection) -> Result<DashboardView> {
        let production_by_area = self.production_by_year_and_area(&selection.year, selection.area)?;
        let summary = views::production_summary(&production_by_area)?;
        Ok(DashboardView {
            summary,
            map_red: self.map_points_by_year_and_color(&selection.year, WineColor::RedAndRose)?,
            map_white: self.map_points_by_year_and_color(&selection.year, WineColor::White)?,
            production_by_area,
        })
    }
}
