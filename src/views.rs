//! Presentation slices recomputed on every selection change.
//!
//! Every function here is pure: it reads the base tables by reference and
//! returns a fresh `DataFrame`.

use std::fmt;

use polars::prelude::*;

use crate::error::{AtlasError, Result};
use crate::frame::{require_columns, unique_strings, vintage_columns};
use crate::schema::{area, geometry, production, stats, view, wine_type, year as year_sel};

// ── Selection parameters ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WineColor {
    RedAndRose,
    White,
}

impl WineColor {
    pub const ALL: [WineColor; 2] = [WineColor::RedAndRose, WineColor::White];

    pub fn as_str(&self) -> &'static str {
        match self {
            WineColor::RedAndRose => wine_type::RED_AND_ROSE,
            WineColor::White => wine_type::WHITE,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            wine_type::RED_AND_ROSE => Ok(WineColor::RedAndRose),
            wine_type::WHITE => Ok(WineColor::White),
            _ => Err(AtlasError::UnknownSelection(format!("wine type '{s}'"))),
        }
    }
}

impl fmt::Display for WineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column used as the bar-chart category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaGranularity {
    Aoc,
    Region,
}

impl AreaGranularity {
    pub fn column(&self) -> &'static str {
        match self {
            AreaGranularity::Aoc => production::AOC,
            AreaGranularity::Region => stats::REGION,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            area::AOC => Ok(AreaGranularity::Aoc),
            area::REGION => Ok(AreaGranularity::Region),
            _ => Err(AtlasError::UnknownSelection(format!("area type '{s}'"))),
        }
    }
}

/// A year selection is a vintage label or `average`.
pub fn validate_year(year: &str, vintages: &[&str]) -> Result<()> {
    if year == year_sel::AVERAGE || vintages.contains(&year) {
        Ok(())
    } else {
        Err(AtlasError::UnknownSelection(format!("year '{year}'")))
    }
}

fn scaled(year: &str) -> Expr {
    col(year).cast(DataType::Float64) / lit(view::DISPLAY_DIVISOR)
}

/// Shorter bar-chart label: drops an "x/ " prefix, parenthesised and
/// "including ..." suffixes.
fn short_label(name: Expr) -> Expr {
    name.str()
        .replace_all(lit(r"[a-zA-Z]/ "), lit(""), false)
        .str()
        .replace_all(lit(r" \(.+"), lit(""), false)
        .str()
        .replace_all(lit(r" including.+"), lit(""), false)
}

// ── Slices ──────────────────────────────────────────────────────────────────

/// Production of one year per area and wine type, in million liters.
///
/// Columns: Region (the selected area), wine_type, Production, Wine Region.
/// Sorted by Production ascending.
pub fn production_by_year_and_area(
    augmented: &DataFrame,
    year: &str,
    area: AreaGranularity,
    vintages: &[&str],
) -> Result<DataFrame> {
    validate_year(year, vintages)?;
    require_columns(augmented, &[area.column(), production::WINE_TYPE, year])?;

    let df = augmented
        .clone()
        .lazy()
        .select([
            col(area.column()).alias(stats::REGION),
            col(production::WINE_TYPE),
            scaled(year).alias(view::PRODUCTION),
        ])
        .group_by([col(stats::REGION), col(production::WINE_TYPE)])
        .agg([col(view::PRODUCTION).sum()])
        .sort(
            [view::PRODUCTION, stats::REGION, production::WINE_TYPE],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .with_column(short_label(col(stats::REGION)).alias(view::WINE_REGION))
        .collect()?;
    Ok(df)
}

/// Map markers for one wine type.
///
/// Columns: Region, latitude, longitude, Production, size, text.
pub fn map_points_by_year_and_color(
    enriched: &DataFrame,
    year: &str,
    color: WineColor,
    vintages: &[&str],
) -> Result<DataFrame> {
    validate_year(year, vintages)?;
    require_columns(
        enriched,
        &[
            stats::REGION,
            production::WINE_TYPE,
            geometry::LATITUDE,
            geometry::LONGITUDE,
            year,
        ],
    )?;

    let mut df = enriched
        .clone()
        .lazy()
        .filter(col(production::WINE_TYPE).eq(lit(color.as_str())))
        .select([
            col(stats::REGION),
            col(geometry::LATITUDE),
            col(geometry::LONGITUDE),
            scaled(year).alias(view::PRODUCTION),
        ])
        .with_column((col(view::PRODUCTION) / lit(view::SIZE_DIVISOR)).alias(view::SIZE))
        .collect()?;

    let texts: Vec<String> = df
        .column(stats::REGION)?
        .str()?
        .into_iter()
        .zip(df.column(view::PRODUCTION)?.f64()?.into_iter())
        .map(|(region, production)| match production {
            Some(p) => format!("{}: {:?} Ml", region.unwrap_or_default(), p),
            None => format!("{}: - Ml", region.unwrap_or_default()),
        })
        .collect();
    df.with_column(Column::new(view::TEXT.into(), texts))?;
    Ok(df)
}

// ── Region time series ──────────────────────────────────────────────────────

/// Harvest series of one region, one table per wine type.
#[derive(Debug, Clone)]
pub struct RegionSeries {
    pub red: DataFrame,
    pub white: DataFrame,
}

/// Regions of the enriched table, in table order.
pub fn list_of_regions(enriched: &DataFrame) -> Result<Vec<String>> {
    unique_strings(enriched, stats::REGION)
}

/// Per-vintage production of `region` in million liters.
///
/// Each table has columns Harvest and years. A wine type the region does not
/// produce yields the zero-filled placeholder series.
pub fn region_series(enriched: &DataFrame, region: &str, vintages: &[&str]) -> Result<RegionSeries> {
    require_columns(enriched, &[stats::REGION, production::WINE_TYPE])?;
    require_columns(enriched, vintages)?;
    if !list_of_regions(enriched)?.iter().any(|r| r == region) {
        return Err(AtlasError::UnknownRegion(region.to_string()));
    }

    let series_for = |color: WineColor| -> Result<DataFrame> {
        let rows = enriched
            .clone()
            .lazy()
            .filter(
                col(stats::REGION)
                    .eq(lit(region))
                    .and(col(production::WINE_TYPE).eq(lit(color.as_str()))),
            )
            .collect()?;
        if rows.height() == 0 {
            return placeholder_series();
        }

        let harvest = vintage_columns(&rows, vintages)?
            .iter()
            .map(|c| -> Result<f64> { Ok(c.f64()?.get(0).unwrap_or(0.0) / view::DISPLAY_DIVISOR) })
            .collect::<Result<Vec<_>>>()?;
        Ok(DataFrame::new(vec![
            Column::new(view::HARVEST.into(), harvest),
            Column::new(view::YEARS.into(), vintages.to_vec()),
        ])?)
    };

    Ok(RegionSeries {
        red: series_for(WineColor::RedAndRose)?,
        white: series_for(WineColor::White)?,
    })
}

fn placeholder_series() -> Result<DataFrame> {
    let years = view::PLACEHOLDER_YEARS;
    Ok(DataFrame::new(vec![
        Column::new(view::HARVEST.into(), vec![0.0f64; years.len()]),
        Column::new(view::YEARS.into(), years.to_vec()),
    ])?)
}

// ── Totals ──────────────────────────────────────────────────────────────────

/// Production totals of a by-year slice, in million liters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProductionSummary {
    pub total: f64,
    pub red_and_rose: f64,
    pub white: f64,
}

pub fn production_summary(slice: &DataFrame) -> Result<ProductionSummary> {
    require_columns(slice, &[production::WINE_TYPE, view::PRODUCTION])?;
    let types = slice.column(production::WINE_TYPE)?.str()?;
    let values = slice.column(view::PRODUCTION)?.f64()?;

    let mut summary = ProductionSummary::default();
    for (wine, value) in types.into_iter().zip(values.into_iter()) {
        let value = value.unwrap_or(0.0);
        summary.total += value;
        match wine {
            Some(wine_type::RED_AND_ROSE) => summary.red_and_rose += value,
            Some(wine_type::WHITE) => summary.white += value,
            _ => {}
        }
    }
    Ok(summary)
}
