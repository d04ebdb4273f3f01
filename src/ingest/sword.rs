/// SWORD Feature Translation Service Client
///
/// Discovers the nodes belonging to a reach by querying the PO.DAAC
/// feature-lookup service. SWOT identifiers are hierarchical: dropping the
/// last character of a reach id yields the prefix shared by all of that
/// reach's node ids, and the node-listing endpoint accepts that prefix
/// directly.
///
/// Endpoint: https://fts.podaac.earthdata.nasa.gov/rivers/node/{prefix}

use serde_json::Value;

use crate::model::HydroError;

const SWORD_BASE_URL: &str = "https://fts.podaac.earthdata.nasa.gov";

// ---------------------------------------------------------------------------
// URL Construction
// ---------------------------------------------------------------------------

/// Derives the node-group prefix for a reach: the reach id with its last
/// character (the reach-type digit) removed.
///
/// Slicing is by character, not byte, so a malformed id ending in a
/// multi-byte character yields an error path instead of a panic.
pub fn node_group_id(reach_id: &str) -> Result<&str, HydroError> {
    reach_id
        .char_indices()
        .last()
        .map(|(idx, _)| &reach_id[..idx])
        .filter(|prefix| !prefix.is_empty())
        .ok_or_else(|| {
            HydroError::Parse(format!(
                "reach id '{}' too short to derive a node-group prefix",
                reach_id
            ))
        })
}

/// Builds the node-listing URL for a node-group prefix.
pub fn build_node_list_url(group_id: &str) -> String {
    format!("{}/rivers/node/{}", SWORD_BASE_URL, group_id)
}

// ---------------------------------------------------------------------------
// Node Discovery
// ---------------------------------------------------------------------------

/// Fetch the identifiers of all nodes belonging to `reach_id`.
///
/// Only the key set of the response's `results` map is used; the attached
/// per-node metadata is ignored. Ids come back in sorted order — SWORD node
/// ids are fixed-width numeric strings, so sorted order is along-channel
/// order and gives the long-profile fan-out a deterministic iteration
/// sequence.
pub fn fetch_node_ids(
    client: &reqwest::blocking::Client,
    reach_id: &str,
) -> Result<Vec<String>, HydroError> {
    let group_id = node_group_id(reach_id)?;
    let url = build_node_list_url(group_id);

    let response = client.get(&url).header("Accept", "application/json").send()?;

    if !response.status().is_success() {
        return Err(HydroError::Http(response.status().as_u16()));
    }

    let body = response.text()?;
    parse_node_listing(&body)
}

/// Parses a node-listing response body into a sorted list of node ids.
pub fn parse_node_listing(body: &str) -> Result<Vec<String>, HydroError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| HydroError::Parse(format!("node listing is not valid JSON: {}", e)))?;

    if let Some(message) = value.get("error") {
        return Err(HydroError::Remote(
            message.as_str().unwrap_or("unspecified node-listing error").to_string(),
        ));
    }

    let results = value
        .get("results")
        .and_then(|r| r.as_object())
        .ok_or_else(|| HydroError::Parse("results map missing from node listing".to_string()))?;

    let mut node_ids: Vec<String> = results.keys().cloned().collect();
    node_ids.sort();
    Ok(node_ids)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_group_id_strips_reach_type_digit() {
        assert_eq!(node_group_id("75411201241").unwrap(), "7541120124");
    }

    #[test]
    fn test_node_group_id_rejects_degenerate_ids() {
        assert!(matches!(node_group_id(""), Err(HydroError::Parse(_))));
        assert!(matches!(node_group_id("7"), Err(HydroError::Parse(_))));
    }

    #[test]
    fn test_node_group_id_trims_by_character_not_byte() {
        // A malformed id ending in a multi-byte character must not panic
        // on a char boundary; the prefix is still everything before it.
        assert_eq!(node_group_id("7541120124ß").unwrap(), "7541120124");
        assert!(matches!(node_group_id("ß"), Err(HydroError::Parse(_))));
    }

    #[test]
    fn test_build_node_list_url() {
        assert_eq!(
            build_node_list_url("7541120124"),
            "https://fts.podaac.earthdata.nasa.gov/rivers/node/7541120124"
        );
    }

    #[test]
    fn test_parse_node_listing_collects_sorted_keys() {
        let body = serde_json::json!({
            "status": "200 OK",
            "results": {
                "75411201240021": {"river_name": "Knik River"},
                "75411201240011": {"river_name": "Knik River"},
                "75411201240031": {"river_name": "Knik River"}
            }
        })
        .to_string();

        let ids = parse_node_listing(&body).unwrap();
        assert_eq!(
            ids,
            vec!["75411201240011", "75411201240021", "75411201240031"]
        );
    }

    #[test]
    fn test_parse_node_listing_error_key() {
        let body = r#"{"error": "no nodes matched the given prefix"}"#;
        assert!(matches!(
            parse_node_listing(body),
            Err(HydroError::Remote(_))
        ));
    }

    #[test]
    fn test_parse_node_listing_missing_results_is_parse_error() {
        let body = r#"{"status": "200 OK"}"#;
        assert!(matches!(
            parse_node_listing(body),
            Err(HydroError::Parse(_))
        ));
    }
}
