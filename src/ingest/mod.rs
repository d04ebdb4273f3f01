/// Remote data-source clients.
///
/// One submodule per external service, each with the same shape: URL
/// builders, a blocking fetch taking `&reqwest::blocking::Client`, and a
/// parser that works on a response body string so it can be tested on
/// canned payloads without network access.
///
/// Submodules:
/// - `hydrocron` — SWOT timeseries (reach CSV mode, node GeoJSON mode).
/// - `sword` — node discovery via the feature-lookup service.
/// - `vdatum` — vertical-datum conversion.

pub mod hydrocron;
pub mod sword;
pub mod vdatum;
