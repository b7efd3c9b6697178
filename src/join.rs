//! Region-level aggregation of the augmented production table and its join
//! with the region representative points.

use std::collections::HashSet;

use polars::prelude::*;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::{AtlasError, Result};
use crate::frame::{require_columns, require_rows, unique_strings};
use crate::geometry::{region_points_frame, reproject_regions, RegionCollection};
use crate::names::normalize_join_key;
use crate::schema::{geometry, production, stats};

/// What the inner join left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Production regions with no geometry feature.
    pub missing_geometry: Vec<String>,
    /// Geometry features with no production rows.
    pub unmatched_geometry: Vec<String>,
    /// Aggregated (Region, wine_type) rows dropped by the join.
    pub dropped_rows: usize,
}

impl JoinReport {
    pub fn is_complete(&self) -> bool {
        self.missing_geometry.is_empty() && self.unmatched_geometry.is_empty()
    }
}

/// Copy of `stats_df` with every `Region` value NFC-composed and trimmed.
pub fn normalize_region_column(stats_df: &DataFrame) -> Result<DataFrame> {
    require_columns(stats_df, &[stats::REGION])?;
    let normalized: Vec<Option<String>> = stats_df
        .column(stats::REGION)?
        .str()?
        .into_iter()
        .map(|r| r.map(normalize_join_key))
        .collect();
    let mut df = stats_df.clone();
    df.with_column(Column::new(stats::REGION.into(), normalized))?;
    Ok(df)
}

/// Sum the augmented table per (Region, wine_type), excluding subset AOCs.
///
/// `average` is summed like the vintage columns, so a region's value is the
/// sum of its AOC averages. Output is sorted by `average` descending, ties by
/// Region then wine_type.
pub fn aggregate_regions(stats_df: &DataFrame, config: &PipelineConfig) -> Result<DataFrame> {
    let vintages = config.vintage_names();
    require_rows(stats_df, "augmented production")?;
    require_columns(
        stats_df,
        &[
            production::AOC,
            stats::REGION,
            production::WINE_TYPE,
            stats::MIN,
            stats::MAX,
            stats::AVERAGE,
        ],
    )?;
    require_columns(stats_df, &vintages)?;

    let df = if config.repair_region_names {
        normalize_region_column(stats_df)?
    } else {
        stats_df.clone()
    };

    let mut sums: Vec<Expr> = vintages
        .iter()
        .map(|v| col(*v).cast(DataType::Float64).sum())
        .collect();
    sums.push(col(stats::AVERAGE).sum());

    let aggregated = df
        .lazy()
        .filter(
            col(production::AOC)
                .str()
                .contains_literal(lit(config.subset_marker.as_str()))
                .not(),
        )
        .group_by([col(stats::REGION), col(production::WINE_TYPE)])
        .agg(sums)
        .sort(
            [stats::AVERAGE, stats::REGION, production::WINE_TYPE],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false, false])
                .with_maintain_order(true),
        )
        .collect()?;

    debug!(
        input_rows = stats_df.height(),
        region_rows = aggregated.height(),
        "aggregated production by region"
    );
    Ok(aggregated)
}

/// Aggregate per region and attach each region's representative point.
///
/// Regions missing on either side are dropped (inner join); the losses are
/// returned in the [`JoinReport`] and logged.
pub fn add_geometry(
    stats_df: &DataFrame,
    regions: &RegionCollection,
    config: &PipelineConfig,
) -> Result<(DataFrame, JoinReport)> {
    let aggregated = aggregate_regions(stats_df, config)?;

    let points = reproject_regions(regions, config)?;
    let mut seen = HashSet::new();
    if let Some(dup) = points.iter().find(|p| !seen.insert(p.name.as_str())) {
        return Err(AtlasError::InvalidGeometry(format!(
            "duplicate geometry for region '{}'",
            dup.name
        )));
    }
    let points_df = region_points_frame(&points)?
        .lazy()
        .select([
            col(geometry::BASSIN).alias(stats::REGION),
            col(geometry::LATITUDE),
            col(geometry::LONGITUDE),
        ]);

    let enriched = aggregated
        .clone()
        .lazy()
        .join(
            points_df,
            [col(stats::REGION)],
            [col(stats::REGION)],
            JoinArgs::new(JoinType::Inner),
        )
        .sort(
            [stats::AVERAGE, stats::REGION, production::WINE_TYPE],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false, false])
                .with_maintain_order(true),
        )
        .collect()?;

    let production_regions = unique_strings(&aggregated, stats::REGION)?;
    let geometry_names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
    let report = JoinReport {
        missing_geometry: production_regions
            .iter()
            .filter(|r| !geometry_names.contains(&r.as_str()))
            .cloned()
            .collect(),
        unmatched_geometry: geometry_names
            .iter()
            .filter(|g| !production_regions.iter().any(|r| r.as_str() == **g))
            .map(|g| g.to_string())
            .collect(),
        dropped_rows: aggregated.height() - enriched.height(),
    };

    if !report.missing_geometry.is_empty() {
        warn!(
            regions = ?report.missing_geometry,
            dropped_rows = report.dropped_rows,
            "production regions without geometry were dropped"
        );
    }
    if !report.unmatched_geometry.is_empty() {
        warn!(regions = ?report.unmatched_geometry, "geometry features without production");
    }
    debug!(rows = enriched.height(), "joined production with geometry");

    Ok((enriched, report))
}
