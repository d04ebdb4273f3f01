/// NOAA VDatum Web API Client
///
/// Converts a representative water-surface elevation from the SWOT native
/// vertical datum (EGM2008 over WGS84_G1674) to NAVD88, so a whole reach
/// table can be shifted onto the gauge datum with one remote lookup. The
/// vertical offset between datums varies with location, so the conversion
/// is tied to the single (lon, lat) the input table references.
///
/// API documentation: https://vdatum.noaa.gov/docs/services.html

use serde_json::Value;

use crate::logging::{self, DataSource};
use crate::model::{DatumShift, HydroError, ReachObservation};

const VDATUM_BASE_URL: &str = "https://vdatum.noaa.gov/vdatumweb/api/convert";

// ---------------------------------------------------------------------------
// Location extraction
// ---------------------------------------------------------------------------

/// Extracts the single (lon, lat) referenced by a reach table.
///
/// Fails with `AmbiguousLocation` if the table mixes locations — applying
/// one location's datum offset to another's elevations would be silently
/// wrong — and with `NoData` if the table is empty. Uniqueness is exact
/// float equality: rows for one reach repeat the identical prior-database
/// centroid, so any difference means rows from another reach leaked in.
pub fn reference_location(rows: &[ReachObservation]) -> Result<(f64, f64), HydroError> {
    if rows.is_empty() {
        return Err(HydroError::NoData(
            "reach table is empty, no location to convert".to_string(),
        ));
    }

    let lons = distinct(rows.iter().map(|r| r.p_lon));
    let lats = distinct(rows.iter().map(|r| r.p_lat));

    if lons.len() != 1 || lats.len() != 1 {
        return Err(HydroError::AmbiguousLocation {
            lons: lons.len(),
            lats: lats.len(),
        });
    }

    Ok((lons[0], lats[0]))
}

fn distinct(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut seen: Vec<f64> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| *s == value) {
            seen.push(value);
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// URL Construction
// ---------------------------------------------------------------------------

/// Builds the VDatum convert URL for one elevation at one location.
///
/// Source and target frames are fixed: EGM2008 (horizontal WGS84_G1674,
/// geoid egm2008) to NAVD88 (geoid12b), meters, Alaska region.
pub fn build_convert_url(lon: f64, lat: f64, elevation_m: f64) -> String {
    format!(
        "{}?region=ak&s_x={}&s_y={}&s_z={}&s_v_unit=m&s_h_frame=WGS84_G1674&s_v_frame=EGM2008&s_v_geoid=egm2008&t_v_frame=NAVD88&t_v_geoid=geoid12b",
        VDATUM_BASE_URL, lon, lat, elevation_m,
    )
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert the reach table's representative elevation to NAVD88.
///
/// Validates the single-location precondition before any network traffic,
/// takes the first row's elevation as the input value, and returns both the
/// converted elevation and the offset to apply across the table.
pub fn fetch_datum_shift(
    client: &reqwest::blocking::Client,
    rows: &[ReachObservation],
) -> Result<DatumShift, HydroError> {
    let (lon, lat) = reference_location(rows)?;
    let input_wse = rows[0].wse;

    let url = build_convert_url(lon, lat, input_wse);

    logging::info(
        DataSource::Vdatum,
        None,
        &format!("converting wse {:.3} m at ({:.4}, {:.4}) to NAVD88", input_wse, lon, lat),
    );

    let response = client.get(&url).header("Accept", "application/json").send()?;

    if !response.status().is_success() {
        return Err(HydroError::Http(response.status().as_u16()));
    }

    let body = response.text()?;
    let converted = parse_converted_elevation(&body)?;

    Ok(shift_from(input_wse, converted))
}

/// Parses the converted elevation (`t_z`) from a VDatum response body.
/// The service has returned it both as a JSON number and as a quoted
/// string, so both encodings are accepted.
pub fn parse_converted_elevation(body: &str) -> Result<f64, HydroError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| HydroError::Parse(format!("VDatum response is not valid JSON: {}", e)))?;

    if let Some(message) = value.get("error") {
        return Err(HydroError::Remote(
            message.as_str().unwrap_or("unspecified VDatum error").to_string(),
        ));
    }

    let t_z = value
        .get("t_z")
        .ok_or_else(|| HydroError::Parse("t_z missing from VDatum response".to_string()))?;

    match t_z {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| HydroError::Parse("t_z not representable as f64".to_string())),
        Value::String(s) => s.trim().parse().map_err(|_| {
            HydroError::Parse(format!("t_z is not numeric: '{}'", s))
        }),
        other => Err(HydroError::Parse(format!("t_z has unexpected type: {}", other))),
    }
}

/// Computes the shift record for an input/converted elevation pair.
pub fn shift_from(input_wse: f64, converted_wse: f64) -> DatumShift {
    DatumShift {
        offset_m: converted_wse - input_wse,
        converted_wse_m: converted_wse,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
