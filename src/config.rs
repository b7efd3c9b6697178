use std::path::Path;

use serde::Deserialize;

use crate::error::{AtlasError, Result};
use crate::geometry::CrsCode;
use crate::schema::{geometry, production};

/// A literal substitution applied to geometry region names before the join.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameRepair {
    pub from: String,
    pub to: String,
}

/// Pipeline settings. Every field has a default, so an empty TOML document is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Ordered vintage column labels shared by every production row.
    pub vintages: Vec<String>,
    /// Substring marking AOC rows already counted in a parent AOC.
    pub subset_marker: String,
    /// CRS the geometry coordinates are expressed in, unless the file declares one.
    pub source_crs: String,
    /// Feature property carrying the region name.
    pub geometry_name_property: String,
    /// Normalize both join keys before matching regions to geometry.
    pub repair_region_names: bool,
    pub name_repairs: Vec<NameRepair>,
    pub production_file: String,
    pub geometry_file: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vintages: production::VINTAGES.iter().map(|v| v.to_string()).collect(),
            subset_marker: production::SUBSET_MARKER.to_string(),
            source_crs: "EPSG:3857".to_string(),
            geometry_name_property: geometry::BASSIN.to_string(),
            repair_region_names: true,
            name_repairs: vec![NameRepair {
                from: "VALLEE DU RHÃ”NE".to_string(),
                to: "VALLEE DU RHÔNE".to_string(),
            }],
            production_file: "wine_production.csv".to_string(),
            geometry_file: "wine_regions.geojson".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Parsed form of `source_crs`.
    pub fn source_crs_code(&self) -> Result<CrsCode> {
        CrsCode::parse(&self.source_crs)
    }

    pub fn vintage_names(&self) -> Vec<&str> {
        self.vintages.iter().map(String::as_str).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.vintages.is_empty() {
            return Err(AtlasError::Config("vintages must not be empty".into()));
        }
        for (i, v) in self.vintages.iter().enumerate() {
            if self.vintages[..i].contains(v) {
                return Err(AtlasError::Config(format!("duplicate vintage '{v}'")));
            }
        }
        if self.subset_marker.is_empty() {
            return Err(AtlasError::Config("subset_marker must not be empty".into()));
        }
        self.source_crs_code()?;
        Ok(())
    }
}
