#![allow(dead_code)]

use geo::{Geometry, LineString, Point, Polygon};
use polars::prelude::*;
use wine_atlas::schema::production;
use wine_atlas::{CrsCode, RegionCollection, RegionFeature};

pub const BORDEAUX: &str = "BORDEAUX";
pub const RHONE: &str = "VALLEE DU RHÔNE";
pub const RHONE_MOJIBAKE: &str = "VALLEE DU RHÃ”NE";
pub const CHAMPAGNE: &str = "CHAMPAGNE";

pub type Row<'a> = (&'a str, &'a str, &'a str, [f64; 11]);

pub fn flat(v: f64) -> [f64; 11] {
    [v; 11]
}

/// base, base + 10, ..., base + 100; the mean is base + 50.
pub fn ramp(base: f64) -> [f64; 11] {
    std::array::from_fn(|j| base + 10.0 * j as f64)
}

pub fn production_frame(rows: &[Row]) -> DataFrame {
    let mut columns = vec![
        Column::new(production::AOC.into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()),
        Column::new(production::WINE_BASIN.into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()),
        Column::new(production::WINE_TYPE.into(), rows.iter().map(|r| r.2).collect::<Vec<_>>()),
    ];
    for (j, v) in production::VINTAGES.iter().enumerate() {
        columns.push(Column::new((*v).into(), rows.iter().map(|r| r.3[j]).collect::<Vec<_>>()));
    }
    DataFrame::new(columns).unwrap()
}

/// Two regions, two colours, one subset AOC.
pub fn two_region_production() -> DataFrame {
    production_frame(&[
        ("Pauillac", BORDEAUX, "RED AND ROSE", flat(1000.0)),
        ("Pauillac - Grand Cru (subset)", BORDEAUX, "RED AND ROSE", flat(400.0)),
        ("Entre-deux-Mers", BORDEAUX, "WHITE", flat(300.0)),
        ("Côtes du Rhône", RHONE, "RED AND ROSE", ramp(500.0)),
        ("Condrieu", RHONE, "WHITE", flat(20.0)),
        ("Hermitage", RHONE, "WHITE", flat(30.0)),
    ])
}

pub fn to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let r = 6_378_137.0;
    let x = r * lon.to_radians();
    let y = r * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

fn mercator_point(lon: f64, lat: f64) -> Geometry<f64> {
    let (x, y) = to_web_mercator(lon, lat);
    Geometry::Point(Point::new(x, y))
}

fn mercator_square(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Geometry<f64> {
    let (x0, y0) = to_web_mercator(lon0, lat0);
    let (x1, y1) = to_web_mercator(lon1, lat1);
    Geometry::Polygon(Polygon::new(
        LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
        vec![],
    ))
}

/// Bordeaux as a point, the Rhône valley as a polygon whose name is mis-encoded.
pub fn two_region_geometry() -> RegionCollection {
    RegionCollection::new(
        Some(CrsCode::Epsg3857),
        vec![
            RegionFeature {
                name: BORDEAUX.to_string(),
                geometry: mercator_point(-0.58, 44.84),
            },
            RegionFeature {
                name: RHONE_MOJIBAKE.to_string(),
                geometry: mercator_square(4.0, 44.0, 5.0, 46.0),
            },
        ],
    )
}

/// Champagne produces no red wine.
pub fn champagne_production() -> DataFrame {
    production_frame(&[
        ("Champagne", CHAMPAGNE, "WHITE", flat(2000.0)),
        ("Pauillac", BORDEAUX, "RED AND ROSE", flat(1000.0)),
        ("Entre-deux-Mers", BORDEAUX, "WHITE", flat(300.0)),
    ])
}

pub fn champagne_geometry() -> RegionCollection {
    RegionCollection::new(
        None,
        vec![
            RegionFeature {
                name: CHAMPAGNE.to_string(),
                geometry: mercator_point(4.03, 49.25),
            },
            RegionFeature {
                name: BORDEAUX.to_string(),
                geometry: mercator_point(-0.58, 44.84),
            },
        ],
    )
}

pub fn f64_values(df: &DataFrame, column: &str) -> Vec<f64> {
    df.column(column)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

pub fn str_values(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .map(str::to_string)
        .collect()
}
