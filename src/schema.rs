/// Column-name constants for the wine production tables.
/// Single source of truth - exported to Python via PyO3.

// ── Raw production columns ──────────────────────────────────────────────────
pub mod production {
    pub const AOC: &str = "AOC";
    pub const WINE_BASIN: &str = "wine_basin";
    pub const WINE_TYPE: &str = "wine_type";

    pub const SUBSET_MARKER: &str = "(subset)";

    pub const VINTAGES: [&str; 11] = [
        "08/09", "09/10", "10/11", "11/12", "12/13", "13/14", "14/15", "15/16", "16/17", "17/18",
        "18/19",
    ];
}

// ── Row statistics columns ──────────────────────────────────────────────────
pub mod stats {
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const AVERAGE: &str = "average";
    pub const REGION: &str = "Region";
}

// ── Geometry columns ────────────────────────────────────────────────────────
pub mod geometry {
    pub const BASSIN: &str = "Bassin";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
}

// ── View slice columns ──────────────────────────────────────────────────────
pub mod view {
    pub const PRODUCTION: &str = "Production";
    pub const SIZE: &str = "size";
    pub const TEXT: &str = "text";
    pub const WINE_REGION: &str = "Wine Region";
    pub const HARVEST: &str = "Harvest";
    pub const YEARS: &str = "years";

    /// Source quantities are thousands of hectolitres; dividing by 10 yields million liters.
    pub const DISPLAY_DIVISOR: f64 = 10.0;
    /// Marker size on the map, relative to the scaled production.
    pub const SIZE_DIVISOR: f64 = 5.0;

    /// Labels of the zero-filled series used when a region has no rows for a colour.
    /// 16/17 is absent, so the series has ten rows.
    pub const PLACEHOLDER_YEARS: [&str; 10] = [
        "08/09", "09/10", "10/11", "11/12", "12/13", "13/14", "14/15", "15/16", "17/18", "18/19",
    ];
}

// ── Wine type values ────────────────────────────────────────────────────────
pub mod wine_type {
    pub const RED_AND_ROSE: &str = "RED AND ROSE";
    pub const WHITE: &str = "WHITE";
}

// ── Area granularity values ─────────────────────────────────────────────────
pub mod area {
    pub const AOC: &str = "AOC";
    pub const REGION: &str = "Region";
}

// ── Year selection values ───────────────────────────────────────────────────
pub mod year {
    pub const AVERAGE: &str = "average";
}
