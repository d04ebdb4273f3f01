/// Hydrocron Timeseries API Client
///
/// Retrieves SWOT water-surface-elevation time series from the PO.DAAC
/// Hydrocron service, in reach mode (CSV payload) for elevation history and
/// in node mode (GeoJSON payload) for longitudinal profiles.
///
/// API documentation: https://podaac.github.io/hydrocron/
///
/// Responses are JSON envelopes; the tabular payload is embedded under
/// `results.csv` or `results.geojson` depending on the requested output
/// format. A failed query is reported with an `error` key in the envelope
/// rather than a non-2xx status.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::filters;
use crate::logging::{self, DataSource};
use crate::model::{
    HydroError, NODE_FIELDS, NodeObservation, REACH_FIELDS, REACH_WINDOW_START, ReachObservation,
};

const HYDROCRON_BASE_URL: &str = "https://soto.podaac.earthdatacloud.nasa.gov/hydrocron/v1";

// ============================================================================
// Hydrocron Response Structures
// ============================================================================

/// Outer envelope of a timeseries response.
///
/// Every field is optional at the serde boundary; which ones must be present
/// is decided by the validation in the parse functions, so a missing key is
/// reported as an explicit parse failure instead of surfacing downstream.
#[derive(Debug, Deserialize)]
struct TimeseriesEnvelope {
    /// Descriptive message present only when the query failed.
    error: Option<String>,
    /// "200 OK" on success.
    status: Option<String>,
    results: Option<TimeseriesResults>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResults {
    /// Reach mode: CSV text blob with a header row.
    csv: Option<String>,
    /// Node mode: GeoJSON FeatureCollection. Feature properties mix string
    /// and numeric encodings across deployments, so this stays untyped
    /// until `parse_node_geojson` converts each field explicitly.
    geojson: Option<Value>,
}

// ============================================================================
// URL Construction
// ============================================================================

/// Builds the reach-mode timeseries URL for the fixed retrieval window
/// `REACH_WINDOW_START` through `end_time`.
pub fn build_reach_timeseries_url(reach_id: &str, end_time: DateTime<Utc>) -> String {
    format!(
        "{}/timeseries?feature=Reach&feature_id={}&start_time={}&end_time={}&output=csv&fields={}",
        HYDROCRON_BASE_URL,
        reach_id,
        REACH_WINDOW_START,
        end_time.format("%Y-%m-%dT%H:%M:%SZ"),
        REACH_FIELDS,
    )
}

/// Builds the node-mode timeseries URL covering `start_date` 00:00:00Z
/// through `end_date` 23:59:59Z (both "YYYY-MM-DD").
pub fn build_node_timeseries_url(node_id: &str, start_date: &str, end_date: &str) -> String {
    format!(
        "{}/timeseries?feature=Node&feature_id={}&start_time={}T00:00:00Z&end_time={}T23:59:59Z&output=geojson&fields={}",
        HYDROCRON_BASE_URL, node_id, start_date, end_date, NODE_FIELDS,
    )
}

// ============================================================================
// Reach Series Fetch
// ============================================================================

/// Fetch the water-surface-elevation time series for one reach, filtered
/// for NODATA elevations and degraded quality flags.
///
/// Convenience wrapper over `fetch_reach_series_at` using the real current
/// time as the window's upper bound. Tests use the `_at` variant to keep
/// the constructed URL deterministic.
pub fn fetch_reach_series(
    client: &reqwest::blocking::Client,
    reach_id: &str,
) -> Result<Vec<ReachObservation>, HydroError> {
    fetch_reach_series_at(client, reach_id, Utc::now())
}

/// Fetch the reach time series with an injected clock for the window's
/// upper bound.
pub fn fetch_reach_series_at(
    client: &reqwest::blocking::Client,
    reach_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<ReachObservation>, HydroError> {
    let url = build_reach_timeseries_url(reach_id, now);

    logging::info(
        DataSource::Hydrocron,
        Some(reach_id),
        "waiting for SWOT reach data to download...",
    );

    let response = client.get(&url).header("Accept", "application/json").send()?;

    if !response.status().is_success() {
        return Err(HydroError::Http(response.status().as_u16()));
    }

    let body = response.text()?;
    let rows = parse_reach_response(reach_id, &body)?;

    logging::info(
        DataSource::Hydrocron,
        Some(reach_id),
        &format!("pulled {} reach observations before filtering", rows.len()),
    );

    Ok(filters::filter_reach_rows(rows))
}

/// Parses a reach-mode response body into unfiltered observations.
///
/// An `error` key in the envelope aborts with `HydroError::Remote` — the
/// CSV payload is never consulted once the service has declared the query
/// failed. A status other than "200 OK" is logged but parsing proceeds,
/// since the payload may still be usable.
pub fn parse_reach_response(reach_id: &str, body: &str) -> Result<Vec<ReachObservation>, HydroError> {
    let envelope: TimeseriesEnvelope = serde_json::from_str(body)
        .map_err(|e| HydroError::Parse(format!("reach response is not valid JSON: {}", e)))?;

    if let Some(message) = envelope.error {
        logging::error(
            DataSource::Hydrocron,
            Some(reach_id),
            &format!("error pulling reach data: {}", message),
        );
        return Err(HydroError::Remote(message));
    }

    match envelope.status.as_deref() {
        Some("200 OK") => logging::info(
            DataSource::Hydrocron,
            Some(reach_id),
            "successfully pulled SWOT reach data",
        ),
        _ => logging::warn(
            DataSource::Hydrocron,
            Some(reach_id),
            "reach data not pulled cleanly: unexpected status in response",
        ),
    }

    let csv = envelope
        .results
        .and_then(|r| r.csv)
        .ok_or_else(|| HydroError::Parse("results.csv missing from reach response".to_string()))?;

    parse_reach_csv(&csv)
}

/// Parses the CSV blob embedded in a reach-mode response.
///
/// Columns are located by header name rather than position: Hydrocron
/// appends unit columns (e.g. `wse_units`) beyond the requested fields.
fn parse_reach_csv(csv: &str) -> Result<Vec<ReachObservation>, HydroError> {
    let mut lines = csv.lines();

    let header = lines
        .next()
        .ok_or_else(|| HydroError::Parse("reach CSV payload is empty".to_string()))?;
    let columns: Vec<&str> = header.split(',').map(|c| c.trim()).collect();

    let column_index = |name: &str| -> Result<usize, HydroError> {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| HydroError::Parse(format!("reach CSV missing '{}' column", name)))
    };

    let time_idx = column_index("time_str")?;
    let wse_idx = column_index("wse")?;
    let quality_idx = column_index("reach_q")?;
    let lon_idx = column_index("p_lon")?;
    let lat_idx = column_index("p_lat")?;
    // Older Hydrocron deployments omit slope from CSV output entirely.
    let slope_idx = columns.iter().position(|c| *c == "slope");

    let mut rows = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < columns.len() {
            continue; // Skip incomplete rows
        }

        let float_field = |idx: usize, name: &str| -> Result<f64, HydroError> {
            fields[idx].trim().parse().map_err(|_| {
                HydroError::Parse(format!(
                    "reach CSV field '{}' is not numeric: '{}'",
                    name, fields[idx]
                ))
            })
        };

        rows.push(ReachObservation {
            time_str: fields[time_idx].trim().to_string(),
            wse: float_field(wse_idx, "wse")?,
            // Quality flags arrive as "1" or "1.0" depending on deployment.
            reach_q: float_field(quality_idx, "reach_q")? as i64,
            p_lon: float_field(lon_idx, "p_lon")?,
            p_lat: float_field(lat_idx, "p_lat")?,
            slope: slope_idx.and_then(|idx| fields[idx].trim().parse().ok()),
        });
    }

    Ok(rows)
}

// ============================================================================
// Node Series Fetch
// ============================================================================

/// Fetch all observations for one node within the given date window.
///
/// Returns unfiltered rows; the long-profile orchestration in
/// `crate::profile` applies the date and quality filters after combining
/// rows across nodes.
pub fn fetch_node_series(
    client: &reqwest::blocking::Client,
    node_id: &str,
    start_date: &str,
    end_date: &str,
) -> Result<Vec<NodeObservation>, HydroError> {
    let url = build_node_timeseries_url(node_id, start_date, end_date);

    let response = client.get(&url).header("Accept", "application/json").send()?;

    if !response.status().is_success() {
        return Err(HydroError::Http(response.status().as_u16()));
    }

    let body = response.text()?;
    parse_node_response(node_id, &body)
}

/// Parses a node-mode response body into observations tagged with `node_id`.
pub fn parse_node_response(node_id: &str, body: &str) -> Result<Vec<NodeObservation>, HydroError> {
    let envelope: TimeseriesEnvelope = serde_json::from_str(body)
        .map_err(|e| HydroError::Parse(format!("node response is not valid JSON: {}", e)))?;

    if let Some(message) = envelope.error {
        return Err(HydroError::Remote(message));
    }

    let geojson = envelope
        .results
        .and_then(|r| r.geojson)
        .ok_or_else(|| HydroError::Parse("results.geojson missing from node response".to_string()))?;

    parse_node_geojson(node_id, &geojson)
}

/// Walks a GeoJSON FeatureCollection, converting each feature's properties
/// into a typed observation. Numeric fields are converted explicitly since
/// Hydrocron encodes them as strings in GeoJSON output.
fn parse_node_geojson(node_id: &str, geojson: &Value) -> Result<Vec<NodeObservation>, HydroError> {
    let features = geojson
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| HydroError::Parse("results.geojson.features missing or not an array".to_string()))?;

    let mut rows = Vec::with_capacity(features.len());

    for feature in features {
        let properties = feature
            .get("properties")
            .and_then(|p| p.as_object())
            .ok_or_else(|| HydroError::Parse("feature without a properties map".to_string()))?;

        rows.push(NodeObservation {
            node_id: node_id.to_string(),
            time_str: string_property(properties, "time_str")?,
            wse: float_property(properties, "wse")?,
            p_dist_out: float_property(properties, "p_dist_out")?,
            node_q: float_property(properties, "node_q")? as i64,
            width: float_property(properties, "width")?,
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Property conversion helpers
// ---------------------------------------------------------------------------

fn string_property(
    properties: &serde_json::Map<String, Value>,
    name: &str,
) -> Result<String, HydroError> {
    match properties.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(HydroError::Parse(format!("feature property '{}' missing", name))),
    }
}

fn float_property(
    properties: &serde_json::Map<String, Value>,
    name: &str,
) -> Result<f64, HydroError> {
    let value = properties
        .get(name)
        .ok_or_else(|| HydroError::Parse(format!("feature property '{}' missing", name)))?;

    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| HydroError::Parse(format!("feature property '{}' not representable as f64", name))),
        Value::String(s) => s.trim().parse().map_err(|_| {
            HydroError::Parse(format!("feature property '{}' is not numeric: '{}'", name, s))
        }),
        other => Err(HydroError::Parse(format!(
            "feature property '{}' has unexpected type: {}",
            name, other
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NODATA;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 6, 30, 0).unwrap()
    }

    // -- URL construction ---------------------------------------------------

    #[test]
    fn test_reach_url_contains_window_and_fields() {
        let url = build_reach_timeseries_url("75411201243", fixed_now());
        assert!(url.starts_with(HYDROCRON_BASE_URL));
        assert!(url.contains("feature=Reach"));
        assert!(url.contains("feature_id=75411201243"));
        assert!(url.contains("start_time=2022-12-01T00:00:00Z"));
        assert!(url.contains("end_time=2024-03-15T06:30:00Z"));
        assert!(url.contains("output=csv"));
        assert!(url.contains("fields=time_str,wse,reach_q,p_lon,p_lat,slope"));
    }

    #[test]
    fn test_node_url_covers_whole_days() {
        let url = build_node_timeseries_url("75411201240061", "2023-05-01", "2023-07-01");
        assert!(url.contains("feature=Node"));
        assert!(url.contains("feature_id=75411201240061"));
        assert!(url.contains("start_time=2023-05-01T00:00:00Z"));
        assert!(url.contains("end_time=2023-07-01T23:59:59Z"));
        assert!(url.contains("output=geojson"));
        assert!(url.contains("fields=time_str,wse,p_dist_out,node_q,width"));
    }

    // -- Reach response parsing ---------------------------------------------

    fn reach_body(csv: &str) -> String {
        serde_json::json!({
            "status": "200 OK",
            "time": 723.0,
            "hits": 2,
            "results": { "csv": csv }
        })
        .to_string()
    }

    #[test]
    fn test_parse_reach_response_reads_embedded_csv() {
        let csv = "reach_id,time_str,wse,reach_q,p_lon,p_lat,slope,wse_units\n\
                   75411201243,2023-06-01T01:00:00Z,10.5,0,-149.5,61.2,0.00012,m\n\
                   75411201243,2023-06-11T01:00:00Z,10.7,1,-149.5,61.2,0.00013,m\n";
        let rows = parse_reach_response("75411201243", &reach_body(csv)).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].time_str, "2023-06-01T01:00:00Z");
        assert_eq!(rows[0].wse, 10.5);
        assert_eq!(rows[0].reach_q, 0);
        assert_eq!(rows[0].p_lon, -149.5);
        assert_eq!(rows[0].p_lat, 61.2);
        assert_eq!(rows[0].slope, Some(0.00012));
        assert_eq!(rows[1].reach_q, 1);
    }

    #[test]
    fn test_parse_reach_response_without_slope_column() {
        let csv = "time_str,wse,reach_q,p_lon,p_lat\n\
                   2023-06-01T01:00:00Z,10.5,0,-149.5,61.2\n";
        let rows = parse_reach_response("75411201243", &reach_body(csv)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].slope, None);
    }

    #[test]
    fn test_parse_reach_response_aborts_on_error_key() {
        // Error-keyed responses must fail here, before any CSV access,
        // rather than surfacing as a missing-key failure downstream.
        let body = r#"{"error": "400: Query of Feature ID 123 failed"}"#;
        let result = parse_reach_response("123", body);
        match result {
            Err(HydroError::Remote(msg)) => assert!(msg.contains("Feature ID 123")),
            other => panic!("expected Remote error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reach_response_missing_csv_is_parse_error() {
        let body = r#"{"status": "200 OK", "results": {}}"#;
        assert!(matches!(
            parse_reach_response("123", body),
            Err(HydroError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_reach_response_rejects_non_json() {
        assert!(matches!(
            parse_reach_response("123", "<html>gateway timeout</html>"),
            Err(HydroError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_reach_csv_rejects_missing_required_column() {
        let csv = "time_str,reach_q,p_lon,p_lat\n2023-06-01T01:00:00Z,0,-149.5,61.2\n";
        let result = parse_reach_response("123", &reach_body(csv));
        match result {
            Err(HydroError::Parse(msg)) => assert!(msg.contains("wse")),
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_reach_fetch_pipeline_filters_sentinels_and_quality() {
        // parse + filter composition: the sentinel row and the reach_q=2
        // row must not survive, matching what fetch_reach_series returns.
        let csv = format!(
            "time_str,wse,reach_q,p_lon,p_lat,slope\n\
             2023-06-01T01:00:00Z,10.5,0,-149.5,61.2,0.0001\n\
             2023-06-11T01:00:00Z,{},0,-149.5,61.2,0.0001\n\
             2023-06-21T01:00:00Z,10.9,2,-149.5,61.2,0.0001\n",
            NODATA
        );
        let rows = parse_reach_response("75411201243", &reach_body(&csv)).unwrap();
        let filtered = crate::filters::filter_reach_rows(rows);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].wse, 10.5);
    }

    // -- Node response parsing ----------------------------------------------

    fn node_body(features: serde_json::Value) -> String {
        serde_json::json!({
            "status": "200 OK",
            "results": {
                "geojson": { "type": "FeatureCollection", "features": features }
            }
        })
        .to_string()
    }

    #[test]
    fn test_parse_node_response_converts_string_numerics() {
        // Hydrocron GeoJSON encodes numeric properties as strings.
        let body = node_body(serde_json::json!([
            {
                "type": "Feature",
                "properties": {
                    "time_str": "2023-05-01T09:11:00Z",
                    "wse": "11.25",
                    "p_dist_out": "48213.0",
                    "node_q": "1",
                    "width": "83.4"
                }
            }
        ]));

        let rows = parse_node_response("75411201240061", &body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node_id, "75411201240061");
        assert_eq!(rows[0].wse, 11.25);
        assert_eq!(rows[0].p_dist_out, 48213.0);
        assert_eq!(rows[0].node_q, 1);
        assert_eq!(rows[0].width, 83.4);
    }

    #[test]
    fn test_parse_node_response_accepts_native_numbers() {
        let body = node_body(serde_json::json!([
            {
                "type": "Feature",
                "properties": {
                    "time_str": "2023-05-01T09:11:00Z",
                    "wse": 11.25,
                    "p_dist_out": 48213.0,
                    "node_q": 0,
                    "width": 83.4
                }
            }
        ]));

        let rows = parse_node_response("75411201240061", &body).unwrap();
        assert_eq!(rows[0].wse, 11.25);
        assert_eq!(rows[0].node_q, 0);
    }

    #[test]
    fn test_parse_node_response_error_key() {
        let body = r#"{"error": "404: Results with the specified Feature ID 75411201240061 were not found."}"#;
        assert!(matches!(
            parse_node_response("75411201240061", body),
            Err(HydroError::Remote(_))
        ));
    }

    #[test]
    fn test_parse_node_response_missing_features_is_parse_error() {
        let body = r#"{"status": "200 OK", "results": {"geojson": {"type": "FeatureCollection"}}}"#;
        assert!(matches!(
            parse_node_response("75411201240061", body),
            Err(HydroError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_node_response_rejects_non_numeric_elevation() {
        let body = node_body(serde_json::json!([
            {
                "type": "Feature",
                "properties": {
                    "time_str": "2023-05-01T09:11:00Z",
                    "wse": "not-a-number",
                    "p_dist_out": "48213.0",
                    "node_q": "0",
                    "width": "83.4"
                }
            }
        ]));

        match parse_node_response("75411201240061", &body) {
            Err(HydroError::Parse(msg)) => assert!(msg.contains("wse")),
            other => panic!("expected Parse error, got {:?}", other),
        }
    }
}
