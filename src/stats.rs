use polars::prelude::*;
use tracing::debug;

use crate::error::{AtlasError, Result};
use crate::frame::{require_columns, require_rows, vintage_columns};
use crate::schema::{production, stats};

/// Round to 2 decimals, halves away from zero (0.125 -> 0.13).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Add per-row `min`, `max` and `average` over the vintage columns and rename
/// `wine_basin` to `Region`.
///
/// Row count and order are unchanged; the input frame is not modified.
pub fn add_basic_stats(production_df: &DataFrame, vintages: &[&str]) -> Result<DataFrame> {
    require_rows(production_df, "production")?;
    require_columns(production_df, &[production::WINE_BASIN])?;
    require_columns(production_df, vintages)?;
    if vintages.is_empty() {
        return Err(AtlasError::InvalidData("no vintage columns configured".into()));
    }

    let columns = vintage_columns(production_df, vintages)?;
    let values = columns
        .iter()
        .map(|c| c.f64())
        .collect::<PolarsResult<Vec<_>>>()?;

    let n = production_df.height();
    let mut mins = Vec::with_capacity(n);
    let mut maxs = Vec::with_capacity(n);
    let mut avgs = Vec::with_capacity(n);

    for i in 0..n {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for (j, ca) in values.iter().enumerate() {
            let v = ca.get(i).ok_or_else(|| {
                AtlasError::InvalidData(format!("null value in '{}' at row {}", vintages[j], i))
            })?;
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        mins.push(min);
        maxs.push(max);
        avgs.push(round2(sum / values.len() as f64));
    }

    let df = production_df
        .hstack(&[
            Column::new(stats::MIN.into(), mins),
            Column::new(stats::MAX.into(), maxs),
            Column::new(stats::AVERAGE.into(), avgs),
        ])?
        .lazy()
        .rename([production::WINE_BASIN], [stats::REGION], true)
        .collect()?;

    debug!(rows = df.height(), "added basic stats");
    Ok(df)
}
