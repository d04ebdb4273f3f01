/// Longitudinal profile assembly.
///
/// Builds the along-channel water-surface profile of a reach: discover the
/// reach's nodes via SWORD, pull each node's observations for the requested
/// dates from Hydrocron, and combine the survivors into one table.
///
/// This is the most expensive operation in the crate — one request per node,
/// potentially dozens per reach. The per-node pulls are independent, so they
/// fan out over a bounded worker pool; results are recombined in node-id
/// order before filtering, so the output is identical regardless of which
/// requests finish first. A node whose pull fails is logged and skipped —
/// a partial profile is still a profile.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::filters;
use crate::ingest::{hydrocron, sword};
use crate::logging::{self, DataSource};
use crate::model::{DEFAULT_NODE_QUALITY_MAX, HydroError, NodeObservation};

// ---------------------------------------------------------------------------
// Date window resolution
// ---------------------------------------------------------------------------

/// Resolves the requested dates into the profile's (start, end) window.
///
/// Dates are validated as "YYYY-MM-DD" calendar dates and sorted; the
/// earliest and latest bound the window. One date yields a single-day
/// window. More than two dates is accepted with a warning, since only the
/// extremes are used.
pub fn resolve_date_window(dates: &[&str]) -> Result<(String, String), HydroError> {
    if dates.is_empty() {
        return Err(HydroError::NoData(
            "at least one profile date is required".to_string(),
        ));
    }

    let mut parsed: Vec<NaiveDate> = dates
        .iter()
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| HydroError::Parse(format!("invalid profile date '{}', expected YYYY-MM-DD", d)))
        })
        .collect::<Result<_, _>>()?;

    if dates.len() > 2 {
        logging::warn(
            DataSource::System,
            None,
            &format!(
                "{} dates supplied; only the earliest and latest will be used",
                dates.len()
            ),
        );
    }

    parsed.sort();

    let first = parsed.first().unwrap();
    let last = parsed.last().unwrap();
    Ok((
        first.format("%Y-%m-%d").to_string(),
        last.format("%Y-%m-%d").to_string(),
    ))
}

// ---------------------------------------------------------------------------
// Profile fetch
// ---------------------------------------------------------------------------

/// Fetch the long profile for a reach with the default node quality bound.
pub fn fetch_long_profile(
    client: &reqwest::blocking::Client,
    reach_id: &str,
    dates: &[&str],
) -> Result<Vec<NodeObservation>, HydroError> {
    fetch_long_profile_with_quality(client, reach_id, dates, DEFAULT_NODE_QUALITY_MAX)
}

/// Fetch the long profile for a reach at one or two dates, keeping rows
/// whose `node_q` does not exceed `quality_max`.
///
/// Node discovery and date validation failures abort; per-node fetch
/// failures are logged and skipped.
pub fn fetch_long_profile_with_quality(
    client: &reqwest::blocking::Client,
    reach_id: &str,
    dates: &[&str],
    quality_max: i64,
) -> Result<Vec<NodeObservation>, HydroError> {
    let (start_date, end_date) = resolve_date_window(dates)?;

    let node_ids = sword::fetch_node_ids(client, reach_id)?;
    if node_ids.is_empty() {
        return Err(HydroError::NoData(format!(
            "no nodes discovered for reach {}",
            reach_id
        )));
    }

    logging::info(
        DataSource::Hydrocron,
        Some(reach_id),
        &format!(
            "pulling SWOT data for {} nodes. this takes about 60 seconds...",
            node_ids.len()
        ),
    );

    let (rows, failed) = collect_node_rows(&node_ids, |node_id| {
        hydrocron::fetch_node_series(client, node_id, &start_date, &end_date)
    });

    logging::log_profile_summary(reach_id, node_ids.len(), node_ids.len() - failed, failed);

    Ok(filters::filter_node_rows(rows, quality_max, &start_date, &end_date))
}

/// Runs `fetch` for every node id on the worker pool and combines the
/// results in input order. Failed nodes are logged and counted, not
/// propagated.
///
/// Collecting the parallel map into a `Vec` pairs each result with its
/// input position, which is what makes the combined table's order
/// independent of request completion order.
fn collect_node_rows<F>(node_ids: &[String], fetch: F) -> (Vec<NodeObservation>, usize)
where
    F: Fn(&str) -> Result<Vec<NodeObservation>, HydroError> + Send + Sync,
{
    let per_node: Vec<Result<Vec<NodeObservation>, HydroError>> =
        node_ids.par_iter().map(|node_id| fetch(node_id)).collect();

    let mut rows = Vec::new();
    let mut failed = 0;

    for (node_id, result) in node_ids.iter().zip(per_node) {
        match result {
            Ok(mut node_rows) => rows.append(&mut node_rows),
            Err(err) => {
                failed += 1;
                logging::log_node_failure(node_id, &err);
            }
        }
    }

    (rows, failed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
