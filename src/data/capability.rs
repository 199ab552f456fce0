//! Physical capability test loader
//!
//! Unlike the other exports the capability file has no season column; the
//! season label is translated into a fixed calendar window on `testDate`.

use std::path::Path;

use chrono::NaiveDate;

use crate::data::read;
use crate::{CapabilityRecord, Result};

const CONSUMED: [&str; 2] = ["testDate", "benchmarkPct"];

/// Calendar window a season label selects on `testDate`.
///
/// `None` means the label is not recognized and no filtering applies; an
/// open end means the season has started but not finished.
fn season_window(season: &str) -> Option<(NaiveDate, Option<NaiveDate>)> {
    let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date");
    match season {
        "2023/2024" => Some((ymd(2023, 7, 1), Some(ymd(2024, 6, 30)))),
        "2024/2025" => Some((ymd(2024, 7, 1), None)),
        _ => None,
    }
}

/// Load the capability export filtered to `season`'s calendar window,
/// sorted ascending by test date.
///
/// `benchmarkPct` is coerced leniently: cells that are not numeric become
/// missing values rather than errors. Unrecognized season labels pass all
/// rows through unfiltered.
pub fn load_physical_capabilities(path: &Path, season: &str) -> Result<Vec<CapabilityRecord>> {
    log::info!("Loading physical capability data from {}", path.display());

    let mut reader = read::open_utf8(path)?;
    let headers = reader.headers()?.clone();
    let columns = read::header_map(&headers);
    let window = season_window(season);
    if window.is_none() {
        log::warn!("Unrecognized season {:?}: capability rows are not filtered", season);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let test_date =
            read::parse_date("testDate", read::field(&record, &columns, "testDate")?)?;

        if let Some((start, end)) = window {
            if test_date < start {
                continue;
            }
            if let Some(end) = end {
                if test_date > end {
                    continue;
                }
            }
        }

        rows.push(CapabilityRecord {
            test_date,
            benchmark_pct: read::parse_numeric(read::field(&record, &columns, "benchmarkPct")?),
            extras: read::collect_extras(&headers, &record, &CONSUMED),
        });
    }

    rows.sort_by_key(|r| r.test_date);
    log::debug!("Capability: {} rows for season {}", rows.len(), season);

    Ok(rows)
}
