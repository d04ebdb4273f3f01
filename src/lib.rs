//! SWOT river surface-water retrieval.
//!
//! Pulls water-surface-elevation measurements from the SWOT mission's
//! Hydrocron timeseries service, discovers reach nodes through the SWORD
//! feature lookup, and adjusts elevations between vertical datums with the
//! NOAA VDatum web API. Rows failing the mission's data-quality predicates
//! (NODATA fill values, degraded quality flags) are dropped before tables
//! are returned.
//!
//! Three entry points, each a self-contained request/transform pipeline:
//!
//! - [`ingest::hydrocron::fetch_reach_series`] — elevation time series for
//!   one reach, from the start of the science orbit to now.
//! - [`profile::fetch_long_profile`] — per-node long profile of a reach at
//!   one or two dates.
//! - [`ingest::vdatum::fetch_datum_shift`] — EGM2008 → NAVD88 conversion
//!   for a reach table's representative elevation.
//!
//! All fetches are blocking and borrow a caller-constructed
//! [`reqwest::blocking::Client`]; no retries, caching, or timeouts are
//! applied internally, so wrap calls with a client-level timeout if one is
//! wanted.
//!
//! Diagnostics — download progress, discarded-date warnings, per-node skip
//! notices — go through [`logging`]. The logger is a no-op until
//! [`logging::init_logger`] is called, so call it once at startup (with an
//! optional file sink) if you want those notices surfaced.
//!
//! ```no_run
//! use hydropull::ingest::{hydrocron, vdatum};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = reqwest::blocking::Client::builder()
//!         .timeout(std::time::Duration::from_secs(120))
//!         .build()?;
//!
//!     let series = hydrocron::fetch_reach_series(&client, "75411201241")?;
//!     let shift = vdatum::fetch_datum_shift(&client, &series)?;
//!     println!("NAVD88 offset: {:.3} m", shift.offset_m);
//!     Ok(())
//! }
//! ```

pub mod filters;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod profile;

pub use model::{DatumShift, HydroError, NodeObservation, ReachObservation};
