/// Core data types for the SWOT surface-water retrieval crate.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic and no I/O — only types, constants, and the crate
/// error type.

// ---------------------------------------------------------------------------
// Sentinels and quality limits
// ---------------------------------------------------------------------------

/// SWOT fill value for missing measurements. Rows carrying this value in
/// `wse` must never survive filtering.
pub const NODATA: f64 = -999999999999.0;

/// Reach observations are kept only if `reach_q` is strictly below this.
pub const REACH_QUALITY_LIMIT: i64 = 2;

/// Default upper bound (inclusive) on `node_q` for long-profile rows.
pub const DEFAULT_NODE_QUALITY_MAX: i64 = 1;

/// Fixed lower bound of the reach time-series window. SWOT science-orbit
/// data begins around this date; the upper bound is the fetch-time clock
/// (see `ingest::hydrocron::fetch_reach_series_at`).
pub const REACH_WINDOW_START: &str = "2022-12-01T00:00:00Z";

// ---------------------------------------------------------------------------
// Hydrocron field lists (re-used verbatim in URL construction)
// ---------------------------------------------------------------------------

/// Fields requested from the Hydrocron timeseries endpoint in reach mode.
pub const REACH_FIELDS: &str = "time_str,wse,reach_q,p_lon,p_lat,slope";

/// Fields requested from the Hydrocron timeseries endpoint in node mode.
pub const NODE_FIELDS: &str = "time_str,wse,p_dist_out,node_q,width";

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single water-surface-elevation measurement for a reach.
///
/// Corresponds to one row of the CSV blob under `results.csv` in a
/// Hydrocron reach-mode response. Rows are kept in the service's output
/// order, which is effectively chronological.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachObservation {
    /// ISO 8601 UTC, e.g. "2023-04-01T12:00:00Z".
    pub time_str: String,
    /// Water-surface elevation in meters.
    pub wse: f64,
    /// Reach quality flag; lower is better.
    pub reach_q: i64,
    /// Prior-database longitude of the reach centroid (WGS84).
    pub p_lon: f64,
    /// Prior-database latitude of the reach centroid (WGS84).
    pub p_lat: f64,
    /// Water-surface slope, when the service reports one.
    pub slope: Option<f64>,
}

/// A single measurement for one node of a reach, used for longitudinal
/// (along-channel) profiling.
///
/// Corresponds to one feature of the GeoJSON payload under
/// `results.geojson.features[]` in a Hydrocron node-mode response,
/// tagged with the node identifier the request was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeObservation {
    pub node_id: String,
    /// ISO 8601 UTC; the first 10 characters are the calendar date.
    pub time_str: String,
    /// Water-surface elevation in meters.
    pub wse: f64,
    /// Distance from the river outlet in meters.
    pub p_dist_out: f64,
    /// Node quality flag; lower is better.
    pub node_q: i64,
    /// River width in meters.
    pub width: f64,
}

/// Result of a vertical-datum conversion for one representative location.
///
/// `offset_m` is `converted_wse_m` minus the input elevation. Callers apply
/// the offset to other elevations in the same local area under the
/// assumption that the vertical shift is locally constant.
#[derive(Debug, Clone, PartialEq)]
pub struct DatumShift {
    pub offset_m: f64,
    pub converted_wse_m: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or processing SWOT surface-water data.
#[derive(Debug)]
pub enum HydroError {
    /// Non-2xx HTTP response from a remote service.
    Http(u16),
    /// The response body carried an explicit `error` key.
    Remote(String),
    /// The response could not be parsed, or an expected key was absent.
    Parse(String),
    /// Datum conversion input referenced more than one location.
    AmbiguousLocation { lons: usize, lats: usize },
    /// An input table or node list was empty where data is required.
    NoData(String),
    /// Connection failure or timeout, propagated from the HTTP client.
    Network(reqwest::Error),
}

impl std::fmt::Display for HydroError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HydroError::Http(code) => write!(f, "HTTP error: {}", code),
            HydroError::Remote(msg) => write!(f, "Remote service error: {}", msg),
            HydroError::Parse(msg) => write!(f, "Parse error: {}", msg),
            HydroError::AmbiguousLocation { lons, lats } => write!(
                f,
                "Ambiguous location: table references {} longitudes and {} latitudes, expected one of each",
                lons, lats
            ),
            HydroError::NoData(what) => write!(f, "No data: {}", what),
            HydroError::Network(err) => write!(f, "Network error: {}", err),
        }
    }
}

impl std::error::Error for HydroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HydroError::Network(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HydroError {
    fn from(err: reqwest::Error) -> Self {
        HydroError::Network(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
