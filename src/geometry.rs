//! Region geometry: GeoJSON parsing, reprojection to WGS84 and
//! representative point extraction.

use std::fmt;
use std::path::Path;

use geo::{Centroid, Coord, Geometry, LineString, MapCoords, MultiPolygon, Point, Polygon};
use polars::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::{AtlasError, Result};
use crate::names::normalize_region_name;
use crate::schema::geometry as geo_cols;

/// WGS84 semi-major axis, the sphere radius used by Web Mercator.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

// ── CRS ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrsCode {
    /// WGS84 Geographic (lat/lon in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
}

impl CrsCode {
    /// Accepts "EPSG:3857", "epsg:4326", "CRS:84", bare codes and the
    /// `urn:ogc:def:crs:EPSG::3857` form found in legacy GeoJSON `crs` members.
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase();
        let code = normalized
            .strip_prefix("URN:OGC:DEF:CRS:")
            .unwrap_or(&normalized)
            .replace("::", ":");

        match code.as_str() {
            "EPSG:4326" | "4326" | "CRS:84" | "OGC:1.3:CRS84" => Ok(CrsCode::Epsg4326),
            "EPSG:3857" | "3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            _ => Err(AtlasError::UnsupportedCrs(s.to_string())),
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Epsg3857 => "EPSG:3857",
        };
        write!(f, "{}", code)
    }
}

/// Inverse spherical Mercator: meters to (lon, lat) degrees.
pub fn web_mercator_to_wgs84(c: Coord<f64>) -> Coord<f64> {
    let lon = (c.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    Coord { x: lon, y: lat }
}

// ── GeoJSON documents ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FeatureCollectionDoc {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    crs: Option<CrsMemberDoc>,
    features: Vec<FeatureDoc>,
}

#[derive(Deserialize)]
struct CrsMemberDoc {
    properties: CrsPropertiesDoc,
}

#[derive(Deserialize)]
struct CrsPropertiesDoc {
    name: String,
}

#[derive(Deserialize)]
struct FeatureDoc {
    geometry: Option<GeometryDoc>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeometryDoc {
    Point { coordinates: Vec<f64> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

fn to_coord(position: &[f64]) -> Result<Coord<f64>> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
        _ => Err(AtlasError::InvalidGeometry(format!(
            "position {position:?} needs two finite coordinates"
        ))),
    }
}

fn to_polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        ring.iter()
            .map(|p| to_coord(p))
            .collect::<Result<Vec<_>>>()
            .map(LineString::new)
    });
    let exterior = rings
        .next()
        .ok_or_else(|| AtlasError::InvalidGeometry("polygon without exterior ring".into()))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

impl GeometryDoc {
    fn into_geometry(self) -> Result<Geometry<f64>> {
        Ok(match self {
            GeometryDoc::Point { coordinates } => Geometry::Point(Point::from(to_coord(&coordinates)?)),
            GeometryDoc::Polygon { coordinates } => Geometry::Polygon(to_polygon(&coordinates)?),
            GeometryDoc::MultiPolygon { coordinates } => Geometry::MultiPolygon(MultiPolygon::new(
                coordinates
                    .iter()
                    .map(|p| to_polygon(p))
                    .collect::<Result<Vec<_>>>()?,
            )),
        })
    }
}

// ── Region features ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeature {
    pub name: String,
    pub geometry: Geometry<f64>,
}

/// Named region features plus the CRS declared by the source document, if any.
#[derive(Debug, Clone, Default)]
pub struct RegionCollection {
    pub crs: Option<CrsCode>,
    pub features: Vec<RegionFeature>,
}

impl RegionCollection {
    pub fn new(crs: Option<CrsCode>, features: Vec<RegionFeature>) -> Self {
        Self { crs, features }
    }

    /// Parse a GeoJSON FeatureCollection, reading region names from `name_property`.
    pub fn from_geojson_str(text: &str, name_property: &str) -> Result<Self> {
        let doc: FeatureCollectionDoc = serde_json::from_str(text)?;
        if doc.type_ != "FeatureCollection" {
            return Err(AtlasError::InvalidGeometry(format!(
                "expected a FeatureCollection, got '{}'",
                doc.type_
            )));
        }
        let crs = doc
            .crs
            .map(|c| CrsCode::parse(&c.properties.name))
            .transpose()?;

        let mut features = Vec::with_capacity(doc.features.len());
        for (i, feature) in doc.features.into_iter().enumerate() {
            let name = feature
                .properties
                .as_ref()
                .and_then(|p| p.get(name_property))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    AtlasError::InvalidGeometry(format!(
                        "feature {i} has no string property '{name_property}'"
                    ))
                })?
                .to_string();
            let geometry = feature
                .geometry
                .ok_or_else(|| AtlasError::InvalidGeometry(format!("feature '{name}' has no geometry")))?
                .into_geometry()?;
            features.push(RegionFeature { name, geometry });
        }
        Ok(Self { crs, features })
    }

    pub fn from_geojson_file(path: impl AsRef<Path>, name_property: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_geojson_str(&text, name_property)
    }
}

/// A region reduced to one geographic point.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Reproject every feature to EPSG:4326 and keep only its representative point.
///
/// The CRS declared by the collection wins over `config.source_crs`. Region
/// names go through [`normalize_region_name`] unless `repair_region_names` is off.
pub fn reproject_regions(regions: &RegionCollection, config: &PipelineConfig) -> Result<Vec<RegionPoint>> {
    let source = match regions.crs {
        Some(crs) => crs,
        None => config.source_crs_code()?,
    };
    debug!(crs = %source, features = regions.features.len(), "reprojecting region geometry");

    regions
        .features
        .iter()
        .map(|feature| {
            let geographic = match source {
                CrsCode::Epsg4326 => feature.geometry.clone(),
                CrsCode::Epsg3857 => feature.geometry.map_coords(web_mercator_to_wgs84),
            };
            let point = geographic.centroid().ok_or_else(|| {
                AtlasError::InvalidGeometry(format!("feature '{}' has an empty geometry", feature.name))
            })?;
            let name = if config.repair_region_names {
                normalize_region_name(&feature.name, &config.name_repairs)
            } else {
                feature.name.clone()
            };
            Ok(RegionPoint {
                name,
                latitude: point.y(),
                longitude: point.x(),
            })
        })
        .collect()
}

/// Geometry-side table: `Bassin`, `latitude`, `longitude`.
pub fn region_points_frame(points: &[RegionPoint]) -> Result<DataFrame> {
    let names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
    let lats: Vec<f64> = points.iter().map(|p| p.latitude).collect();
    let lons: Vec<f64> = points.iter().map(|p| p.longitude).collect();
    let df = DataFrame::new(vec![
        Column::new(geo_cols::BASSIN.into(), names),
        Column::new(geo_cols::LATITUDE.into(), lats),
        Column::new(geo_cols::LONGITUDE.into(), lons),
    ])?;
    Ok(df)
}
