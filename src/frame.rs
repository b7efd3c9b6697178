//! Small DataFrame helpers shared by the pipeline stages.

use std::collections::HashSet;

use polars::prelude::*;

use crate::error::{AtlasError, Result};

pub(crate) fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(AtlasError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

pub(crate) fn require_rows(df: &DataFrame, what: &str) -> Result<()> {
    if df.height() == 0 {
        return Err(AtlasError::EmptyTable(what.to_string()));
    }
    Ok(())
}

/// Vintage columns as Float64, in vintage order.
pub(crate) fn vintage_columns(df: &DataFrame, vintages: &[&str]) -> Result<Vec<Column>> {
    vintages
        .iter()
        .map(|v| -> Result<Column> { Ok(df.column(v)?.cast(&DataType::Float64)?) })
        .collect()
}

/// Distinct non-null values of a string column, in first-appearance order.
pub(crate) fn unique_strings(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    Ok(df
        .column(column)?
        .str()?
        .into_iter()
        .flatten()
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect())
}
