//! GPS session loader
//!
//! Parses the per-session GPS export, filters it to one season and derives
//! the columns the analysis needs: per-zone heart-rate durations in
//! seconds, match-day flag, week index and weekday name.

use std::path::Path;

use crate::data::read;
use crate::{GpsRecord, Result, TracksideError};

/// Heart-rate-zone duration columns, in `HH:MM:SS` text form
pub const HR_ZONE_COLUMNS: [&str; 5] = [
    "hr_zone_1_hms",
    "hr_zone_2_hms",
    "hr_zone_3_hms",
    "hr_zone_4_hms",
    "hr_zone_5_hms",
];

const CONSUMED: [&str; 9] = [
    "date",
    "season",
    "distance",
    "md_plus_code",
    "hr_zone_1_hms",
    "hr_zone_2_hms",
    "hr_zone_3_hms",
    "hr_zone_4_hms",
    "hr_zone_5_hms",
];

/// Load the GPS export, keep rows of `season`, and return the enriched
/// table together with its active subset (rows where distance > 0).
///
/// The two returned tables are independent copies; mutating one never
/// affects the other. An unmatched season label yields empty tables.
pub fn load_gps(
    path: &Path,
    encoding: &str,
    season: &str,
) -> Result<(Vec<GpsRecord>, Vec<GpsRecord>)> {
    log::info!("Loading GPS data from {}", path.display());

    let mut reader = read::open_decoded(path, encoding)?;
    let headers = reader.headers()?.clone();
    let columns = read::header_map(&headers);

    let mut full = Vec::new();
    for result in reader.records() {
        let record = result?;

        // Dates are validated for every row, even rows another season
        // filter would drop.
        let date = read::parse_date("date", read::field(&record, &columns, "date")?)?;
        let row_season = read::field(&record, &columns, "season")?.unwrap_or("");
        if row_season != season {
            continue;
        }

        let distance = read::parse_numeric(read::field(&record, &columns, "distance")?);
        let md_plus_code = read::field(&record, &columns, "md_plus_code")?
            .and_then(|s| s.parse::<i64>().ok());

        let mut hr_zone_hms: [Option<String>; 5] = Default::default();
        let mut hr_zone_seconds = [0i64; 5];
        for (zone, column) in HR_ZONE_COLUMNS.iter().enumerate() {
            let cell = read::field(&record, &columns, column)?;
            // Durations are only parsed for rows the season filter keeps.
            hr_zone_seconds[zone] = match cell {
                Some(text) if text != "00:00:00" => colon_duration_seconds(text)?,
                _ => 0,
            };
            hr_zone_hms[zone] = cell.map(str::to_string);
        }

        full.push(GpsRecord {
            date,
            season: row_season.to_string(),
            distance,
            hr_zone_hms,
            hr_zone_seconds,
            md_plus_code,
            is_match_day: md_plus_code == Some(0),
            week_num: 0, // filled in below, needs the filtered minimum date
            day_name: date.format("%A").to_string(),
            extras: read::collect_extras(&headers, &record, &CONSUMED),
        });
    }

    // Week numbering is 1-based and relative to the earliest date in the
    // filtered set, so a narrower season filter renumbers the weeks.
    if let Some(min_date) = full.iter().map(|r| r.date).min() {
        for row in &mut full {
            row.week_num = (row.date - min_date).num_days() / 7 + 1;
        }
    }

    let active: Vec<GpsRecord> = full.iter().filter(|r| r.is_active()).cloned().collect();
    log::debug!("GPS: {} rows for season {}, {} active", full.len(), season, active.len());

    Ok((full, active))
}

/// Parse a colon-separated duration, rightmost component = seconds.
///
/// Components are read right-to-left as units of 60^i seconds, so any
/// component count is accepted: "45" is 45s, "02:05" is 125s,
/// "01:00:00" is 3600s.
pub fn colon_duration_seconds(text: &str) -> Result<i64> {
    let mut total = 0i64;
    for (i, part) in text.split(':').rev().enumerate() {
        let value: i64 = part.trim().parse().map_err(|_| {
            TracksideError::Parse(format!("invalid duration component `{part}` in `{text}`"))
        })?;
        total += value * 60i64.pow(i as u32);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "date,season,distance,md_plus_code,hr_zone_1_hms,hr_zone_2_hms,hr_zone_3_hms,hr_zone_4_hms,hr_zone_5_hms,opposition";

    fn fixture(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn test_colon_duration_components() {
        assert_eq!(colon_duration_seconds("45").unwrap(), 45);
        assert_eq!(colon_duration_seconds("02:05").unwrap(), 125);
        assert_eq!(colon_duration_seconds("01:00:00").unwrap(), 3600);
        assert_eq!(colon_duration_seconds("00:10:00").unwrap(), 600);
        // Four components: the leftmost counts 60^3 seconds
        assert_eq!(colon_duration_seconds("1:00:00:00").unwrap(), 216_000);
        assert!(colon_duration_seconds("ten:00").is_err());
    }

    #[test]
    fn test_season_filter_and_active_subset() {
        let file = fixture(&[
            "02/09/2023,2023/2024,5000,3,00:10:00,00:00:00,,00:01:30,00:00:05,ARS",
            "03/09/2023,2023/2024,0,0,00:00:00,00:00:00,00:00:00,00:00:00,00:00:00,ARS",
            "10/08/2024,2024/2025,4200,1,00:09:00,00:02:00,00:00:00,00:00:00,00:00:00,MCI",
        ]);

        let (full, active) = load_gps(file.path(), "UTF-8", "2023/2024").unwrap();
        assert_eq!(full.len(), 2);
        assert!(full.iter().all(|r| r.season == "2023/2024"));

        // distance=5000 is active, distance=0 is not
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].distance, Some(5000.0));
    }

    #[test]
    fn test_zone_seconds_missing_and_zero() {
        let file = fixture(&[
            "02/09/2023,2023/2024,5000,3,00:10:00,00:00:00,,00:01:30,00:00:05,ARS",
        ]);
        let (full, _) = load_gps(file.path(), "UTF-8", "2023/2024").unwrap();
        assert_eq!(full[0].hr_zone_seconds, [600, 0, 0, 90, 5]);
        assert_eq!(full[0].total_zone_seconds(), 695);
    }

    #[test]
    fn test_match_day_flag() {
        let file = fixture(&[
            "02/09/2023,2023/2024,5000,0,,,,,,ARS",
            "03/09/2023,2023/2024,4000,1,,,,,,ARS",
            "04/09/2023,2023/2024,4000,-2,,,,,,ARS",
        ]);
        let (full, _) = load_gps(file.path(), "UTF-8", "2023/2024").unwrap();
        assert!(full[0].is_match_day);
        assert!(!full[1].is_match_day);
        assert!(!full[2].is_match_day);
    }

    #[test]
    fn test_week_num_relative_to_filtered_minimum() {
        let file = fixture(&[
            "01/09/2023,2023/2024,5000,3,,,,,,ARS",
            "07/09/2023,2023/2024,4000,2,,,,,,ARS",
            "08/09/2023,2023/2024,4000,1,,,,,,ARS",
            "22/09/2023,2023/2024,4000,0,,,,,,ARS",
        ]);
        let (full, _) = load_gps(file.path(), "UTF-8", "2023/2024").unwrap();
        let weeks: Vec<i64> = full.iter().map(|r| r.week_num).collect();
        assert_eq!(weeks, vec![1, 1, 2, 4]);
    }

    #[test]
    fn test_day_name() {
        let file = fixture(&["02/09/2023,2023/2024,5000,3,,,,,,ARS"]);
        let (full, _) = load_gps(file.path(), "UTF-8", "2023/2024").unwrap();
        assert_eq!(full[0].day_name, "Saturday");
    }

    #[test]
    fn test_extras_untouched() {
        let file = fixture(&["02/09/2023,2023/2024,5000,3,,,,,,ARS"]);
        let (full, _) = load_gps(file.path(), "UTF-8", "2023/2024").unwrap();
        assert_eq!(full[0].extras.get("opposition").map(String::as_str), Some("ARS"));
        assert!(!full[0].extras.contains_key("date"));
    }

    #[test]
    fn test_full_and_active_are_independent() {
        let file = fixture(&["02/09/2023,2023/2024,5000,3,,,,,,ARS"]);
        let (full, mut active) = load_gps(file.path(), "UTF-8", "2023/2024").unwrap();
        active[0].season.clear();
        assert_eq!(full[0].season, "2023/2024");
    }

    #[test]
    fn test_unmatched_season_is_empty_not_error() {
        let file = fixture(&["02/09/2023,2023/2024,5000,3,,,,,,ARS"]);
        let (full, active) = load_gps(file.path(), "UTF-8", "1999/2000").unwrap();
        assert!(full.is_empty());
        assert!(active.is_empty());
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let file = fixture(&["2023-09-02,2023/2024,5000,3,,,,,,ARS"]);
        let err = load_gps(file.path(), "UTF-8", "2023/2024").unwrap_err();
        assert!(matches!(err, TracksideError::DateParse { .. }));
    }

    #[test]
    fn test_bad_duration_only_fatal_in_kept_rows() {
        let file = fixture(&[
            "02/09/2023,2023/2024,5000,3,bogus,,,,,ARS",
            "10/08/2024,2024/2025,4200,1,also bogus,,,,,MCI",
        ]);
        // The foreign-season row never reaches the duration parser
        assert!(load_gps(file.path(), "UTF-8", "1999/2000").is_ok());
        let err = load_gps(file.path(), "UTF-8", "2023/2024").unwrap_err();
        assert!(matches!(err, TracksideError::Parse(_)));
    }

    #[test]
    fn test_idempotent() {
        let file = fixture(&[
            "02/09/2023,2023/2024,5000,3,00:10:00,,,,,ARS",
            "03/09/2023,2023/2024,0,0,,,,,,ARS",
        ]);
        let first = load_gps(file.path(), "UTF-8", "2023/2024").unwrap();
        let second = load_gps(file.path(), "UTF-8", "2023/2024").unwrap();
        assert_eq!(first, second);
    }
}
