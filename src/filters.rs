/// Data-quality filtering for reach and node observations.
///
/// SWOT grants no guarantee that every downlinked measurement is usable:
/// missing passes are reported with the NODATA fill value and degraded
/// measurements carry elevated quality flags. This module holds the pure
/// row predicates applied after ingestion, separated from the fetch logic
/// so they can be tested in isolation.
///
/// All filters are idempotent: re-applying one to an already-filtered
/// table yields the identical table.

use crate::model::{NODATA, NodeObservation, REACH_QUALITY_LIMIT, ReachObservation};

// ---------------------------------------------------------------------------
// Date derivation
// ---------------------------------------------------------------------------

/// Returns the calendar date of an observation: the first 10 characters of
/// its ISO 8601 timestamp ("YYYY-MM-DD"). Shorter strings are returned
/// unchanged rather than panicking on a malformed timestamp.
pub fn observation_date(time_str: &str) -> &str {
    time_str.get(..10).unwrap_or(time_str)
}

// ---------------------------------------------------------------------------
// Reach filtering
// ---------------------------------------------------------------------------

/// Drops reach rows with a NODATA elevation or a quality flag at or above
/// `REACH_QUALITY_LIMIT`. Row order is preserved.
pub fn filter_reach_rows(mut rows: Vec<ReachObservation>) -> Vec<ReachObservation> {
    rows.retain(|row| row.wse != NODATA && row.reach_q < REACH_QUALITY_LIMIT);
    rows
}

// ---------------------------------------------------------------------------
// Node filtering
// ---------------------------------------------------------------------------

/// Drops node rows that fall outside the profile's date window, carry a
/// NODATA elevation, or exceed the node quality threshold (inclusive bound).
/// Row order is preserved.
///
/// The window membership test is an exact-date match against the window's
/// start or end day, not a range check: a two-date profile compares two
/// specific overpass days, and rows from days in between are not wanted.
pub fn filter_node_rows(
    mut rows: Vec<NodeObservation>,
    quality_max: i64,
    start_date: &str,
    end_date: &str,
) -> Vec<NodeObservation> {
    rows.retain(|row| {
        let date = observation_date(&row.time_str);
        (date == start_date || date == end_date) && row.wse != NODATA && row.node_q <= quality_max
    });
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
