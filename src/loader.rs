use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{AtlasError, Result};
use crate::frame::require_columns;
use crate::geometry::RegionCollection;
use crate::schema::production;

/// Load the production CSV.
///
/// Required columns: AOC, wine_basin, wine_type, + every vintage column.
/// Vintage columns are parsed to Float64; every other column stays a string.
pub fn read_production_csv(path: impl AsRef<Path>, vintages: &[&str]) -> Result<DataFrame> {
    let raw = read_csv_as_strings(path.as_ref())?;

    require_columns(
        &raw,
        &[production::AOC, production::WINE_BASIN, production::WINE_TYPE],
    )?;
    require_columns(&raw, vintages)?;

    let df = raw
        .lazy()
        .with_columns(
            vintages
                .iter()
                .map(|v| {
                    col(*v)
                        .str()
                        .strip_chars(lit(" \t\r\n"))
                        .cast(DataType::Float64)
                })
                .collect::<Vec<_>>(),
        )
        .collect()?;

    for v in vintages {
        let null_count = df.column(v)?.null_count();
        if null_count > 0 {
            return Err(AtlasError::InvalidData(format!(
                "Vintage column '{}' has {} missing or non-numeric values",
                v, null_count
            )));
        }
    }

    debug!(rows = df.height(), path = %path.as_ref().display(), "loaded production table");
    Ok(df)
}

/// Load region geometry from a GeoJSON FeatureCollection.
pub fn read_geometry_geojson(path: impl AsRef<Path>, name_property: &str) -> Result<RegionCollection> {
    let regions = RegionCollection::from_geojson_file(path.as_ref(), name_property)?;
    debug!(features = regions.features.len(), path = %path.as_ref().display(), "loaded region geometry");
    Ok(regions)
}

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
fn read_csv_as_strings(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .into_reader_with_file_handle(file)
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}
