//! Recovery status loader
//!
//! Each row is one baseline metric reading on one session date. Metric
//! names encode their measurement kind as a suffix
//! (`sleep_baseline_score`, `soreness_baseline_completeness`, ...); the
//! loader splits them into a base concept and a [`MetricType`].

use std::path::Path;

use chrono::Datelike;

use crate::data::read;
use crate::{MetricType, RecoveryRecord, Result};

const CONSUMED: [&str; 4] = ["sessionDate", "seasonName", "metric", "value"];

/// Metric name with any of the known baseline suffixes stripped.
///
/// All three replacements are applied unconditionally; at most one
/// matches a given export value and the rest are no-ops.
fn base_metric_name(metric: &str) -> String {
    metric
        .replace("_baseline_completeness", "")
        .replace("_baseline_composite", "")
        .replace("_baseline_score", "")
}

/// Load the recovery export filtered to rows whose `seasonName` equals
/// `season`, sorted ascending by session date.
///
/// Rows with a missing `value` cell are dropped before coercion; cells
/// that survive the drop but hold non-numeric text become missing values.
pub fn load_recovery_status(path: &Path, season: &str) -> Result<Vec<RecoveryRecord>> {
    log::info!("Loading recovery status data from {}", path.display());

    let mut reader = read::open_utf8(path)?;
    let headers = reader.headers()?.clone();
    let columns = read::header_map(&headers);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;

        let season_name = read::field(&record, &columns, "seasonName")?.unwrap_or("");
        if season_name != season {
            continue;
        }

        let session_date =
            read::parse_date("sessionDate", read::field(&record, &columns, "sessionDate")?)?;

        // Missing readings are dropped; unparseable ones are kept as None.
        let raw_value = match read::field(&record, &columns, "value")? {
            Some(text) => text,
            None => continue,
        };
        let value = raw_value.parse::<f64>().ok();

        let metric = read::field(&record, &columns, "metric")?.unwrap_or("").to_string();

        rows.push(RecoveryRecord {
            session_date,
            season_name: season_name.to_string(),
            value,
            week: session_date.iso_week().week(),
            month: session_date.format("%B").to_string(),
            metric_type: MetricType::classify(&metric),
            base_metric: base_metric_name(&metric),
            metric,
            extras: read::collect_extras(&headers, &record, &CONSUMED),
        });
    }

    rows.sort_by_key(|r| r.session_date);
    log::debug!("Recovery: {} rows for season {}", rows.len(), season);

    Ok(rows)
}
