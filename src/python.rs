use std::path::PathBuf;

use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::config::PipelineConfig;
use crate::logging;
use crate::pipeline::WinePipeline;
use crate::schema;
use crate::views::{self, AreaGranularity, WineColor};

#[pyclass(name = "WinePipeline")]
pub struct PyWinePipeline {
    inner: WinePipeline,
}

#[pymethods]
impl PyWinePipeline {
    /// Load the production CSV and region GeoJSON from `base_path` and build
    /// the base tables. `config_file` is a TOML file relative to `base_path`.
    #[new]
    #[pyo3(signature = (base_path, config_file=None))]
    fn new(base_path: String, config_file: Option<String>) -> PyResult<Self> {
        let base = PathBuf::from(base_path);
        let config = match config_file {
            Some(file) => PipelineConfig::from_toml_file(base.join(file))?,
            None => PipelineConfig::default(),
        };
        Ok(Self {
            inner: WinePipeline::from_dir(&base, config)?,
        })
    }

    // ── Base tables ─────────────────────────────────────────────────────────

    #[getter]
    fn production_df(&self) -> PyDataFrame {
        PyDataFrame(self.inner.production().clone())
    }

    /// Production table with min, max and average per row.
    #[getter]
    fn augmented_df(&self) -> PyDataFrame {
        PyDataFrame(self.inner.augmented().clone())
    }

    /// Region totals with representative latitude / longitude.
    #[getter]
    fn enriched_df(&self) -> PyDataFrame {
        PyDataFrame(self.inner.enriched().clone())
    }

    #[getter]
    fn year_list(&self) -> Vec<String> {
        self.inner.year_options().into_iter().map(String::from).collect()
    }

    /// Production regions the geometry file has no feature for.
    #[getter]
    fn dropped_regions(&self) -> Vec<String> {
        self.inner.join_report().missing_geometry.clone()
    }

    // ── Slices ──────────────────────────────────────────────────────────────

    #[pyo3(signature = (year="average", area="AOC"))]
    fn production_by_year_and_area(&self, year: &str, area: &str) -> PyResult<PyDataFrame> {
        let df = self
            .inner
            .production_by_year_and_area(year, AreaGranularity::parse(area)?)?;
        Ok(PyDataFrame(df))
    }

    fn map_points_by_year_and_color(&self, year: &str, color: &str) -> PyResult<PyDataFrame> {
        let df = self
            .inner
            .map_points_by_year_and_color(year, WineColor::parse(color)?)?;
        Ok(PyDataFrame(df))
    }

    /// Returns (red_and_rose, white) harvest series for one region.
    fn region_series(&self, region: &str) -> PyResult<(PyDataFrame, PyDataFrame)> {
        let series = self.inner.region_view(region)?;
        Ok((PyDataFrame(series.red), PyDataFrame(series.white)))
    }

    /// Returns (total, red_and_rose, white) in million liters.
    #[pyo3(signature = (year="average", area="AOC"))]
    fn production_summary(&self, year: &str, area: &str) -> PyResult<(f64, f64, f64)> {
        let df = self
            .inner
            .production_by_year_and_area(year, AreaGranularity::parse(area)?)?;
        let s = views::production_summary(&df)?;
        Ok((s.total, s.red_and_rose, s.white))
    }

    fn list_of_regions(&self) -> PyResult<Vec<String>> {
        Ok(self.inner.list_of_regions()?)
    }
}

/// Route Rust log output to stderr. Returns False if logging was already set up.
#[pyfunction]
#[pyo3(signature = (filter="info"))]
fn init_logging(filter: &str) -> bool {
    logging::init_tracing(filter)
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Production
    let production = PyModule::new(m.py(), "production")?;
    production.add("AOC", schema::production::AOC)?;
    production.add("WINE_BASIN", schema::production::WINE_BASIN)?;
    production.add("WINE_TYPE", schema::production::WINE_TYPE)?;
    production.add("VINTAGES", schema::production::VINTAGES.to_vec())?;
    m.add_submodule(&production)?;

    // Stats
    let stats = PyModule::new(m.py(), "stats")?;
    stats.add("MIN", schema::stats::MIN)?;
    stats.add("MAX", schema::stats::MAX)?;
    stats.add("AVERAGE", schema::stats::AVERAGE)?;
    stats.add("REGION", schema::stats::REGION)?;
    m.add_submodule(&stats)?;

    // Geometry
    let geometry = PyModule::new(m.py(), "geometry")?;
    geometry.add("LATITUDE", schema::geometry::LATITUDE)?;
    geometry.add("LONGITUDE", schema::geometry::LONGITUDE)?;
    m.add_submodule(&geometry)?;

    // View
    let view = PyModule::new(m.py(), "view")?;
    view.add("PRODUCTION", schema::view::PRODUCTION)?;
    view.add("SIZE", schema::view::SIZE)?;
    view.add("TEXT", schema::view::TEXT)?;
    view.add("WINE_REGION", schema::view::WINE_REGION)?;
    view.add("HARVEST", schema::view::HARVEST)?;
    view.add("YEARS", schema::view::YEARS)?;
    m.add_submodule(&view)?;

    // Wine type
    let wine_type = PyModule::new(m.py(), "wine_type")?;
    wine_type.add("RED_AND_ROSE", schema::wine_type::RED_AND_ROSE)?;
    wine_type.add("WHITE", schema::wine_type::WHITE)?;
    m.add_submodule(&wine_type)?;

    // Area
    let area = PyModule::new(m.py(), "area")?;
    area.add("AOC", schema::area::AOC)?;
    area.add("REGION", schema::area::REGION)?;
    m.add_submodule(&area)?;

    Ok(())
}

#[pymodule]
#[pyo3(name = "_core")]
fn wine_atlas_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyWinePipeline>()?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}
