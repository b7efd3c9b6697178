mod common;

use std::fs;
use std::path::Path;

use common::{f64_values, str_values, to_web_mercator, BORDEAUX, RHONE, RHONE_MOJIBAKE};
use wine_atlas::schema::{geometry, stats};
use wine_atlas::{AtlasError, PipelineConfig, WinePipeline};

const HEADER: &str = "AOC,wine_basin,wine_type,08/09,09/10,10/11,11/12,12/13,13/14,14/15,15/16,16/17,17/18,18/19";

fn csv_row(aoc: &str, region: &str, wine: &str, value: f64) -> String {
    let values: Vec<String> = (0..11).map(|_| format!("{value}")).collect();
    format!("{aoc},{region},{wine},{}", values.join(","))
}

fn write_production(dir: &Path, file: &str) {
    let rows = [
        HEADER.to_string(),
        csv_row("Pauillac", BORDEAUX, "RED AND ROSE", 1000.0),
        csv_row("Entre-deux-Mers", BORDEAUX, "WHITE", 300.0),
        csv_row("Côtes du Rhône", RHONE, "RED AND ROSE", 550.0),
        csv_row("Condrieu", RHONE, "WHITE", 50.0),
    ];
    fs::write(dir.join(file), rows.join("\n") + "\n").unwrap();
}

fn write_geometry(dir: &Path, file: &str, name_property: &str) {
    let (bx, by) = to_web_mercator(-0.58, 44.84);
    let (x0, y0) = to_web_mercator(4.0, 44.0);
    let (x1, y1) = to_web_mercator(5.0, 46.0);
    let doc = serde_json::json!({
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::3857" } },
        "features": [
            {
                "type": "Feature",
                "properties": { name_property: BORDEAUX },
                "geometry": { "type": "Point", "coordinates": [bx, by] }
            },
            {
                "type": "Feature",
                "properties": { name_property: RHONE_MOJIBAKE },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]]
                }
            }
        ]
    });
    fs::write(dir.join(file), doc.to_string()).unwrap();
}

#[test]
fn default_layout_loads_and_joins_every_region() {
    let dir = tempfile::tempdir().unwrap();
    write_production(dir.path(), "wine_production.csv");
    write_geometry(dir.path(), "wine_regions.geojson", "Bassin");

    let pipeline = WinePipeline::from_dir(dir.path(), PipelineConfig::default()).unwrap();

    assert_eq!(pipeline.production().height(), 4);
    assert_eq!(pipeline.enriched().height(), 4);
    assert!(pipeline.join_report().is_complete());
    assert_eq!(pipeline.list_of_regions().unwrap(), vec![BORDEAUX, RHONE]);

    let regions = str_values(pipeline.enriched(), stats::REGION);
    let lon = f64_values(pipeline.enriched(), geometry::LONGITUDE);
    let rhone = regions.iter().position(|r| r == RHONE).unwrap();
    assert!((lon[rhone] - 4.5).abs() < 1e-9);
}

#[test]
fn config_file_renames_inputs() {
    let dir = tempfile::tempdir().unwrap();
    write_production(dir.path(), "production_2019.csv");
    write_geometry(dir.path(), "bassins.json", "nom");
    fs::write(
        dir.path().join("atlas.toml"),
        r#"
production_file = "production_2019.csv"
geometry_file = "bassins.json"
geometry_name_property = "nom"
"#,
    )
    .unwrap();

    let config = PipelineConfig::from_toml_file(dir.path().join("atlas.toml")).unwrap();
    let pipeline = WinePipeline::from_dir(dir.path(), config).unwrap();
    assert_eq!(pipeline.enriched().height(), 4);
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    write_geometry(dir.path(), "wine_regions.geojson", "Bassin");

    let err = WinePipeline::from_dir(dir.path(), PipelineConfig::default()).err().unwrap();
    assert!(matches!(err, AtlasError::Io(_)));
}

#[test]
fn missing_vintage_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("wine_production.csv"),
        "AOC,wine_basin,wine_type,08/09\nPauillac,BORDEAUX,RED AND ROSE,10\n",
    )
    .unwrap();
    write_geometry(dir.path(), "wine_regions.geojson", "Bassin");

    let err = WinePipeline::from_dir(dir.path(), PipelineConfig::default()).err().unwrap();
    assert!(matches!(err, AtlasError::MissingColumn(c) if c == "09/10"));
}
