//! Athlete performance data preprocessing
//!
//! Loads, cleans and enriches per-athlete CSV exports (GPS tracking,
//! physical capability tests, recovery status, priority/reference data)
//! into analysis-ready in-memory tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub mod data;

/// Date format used by every export in the per-athlete data directory
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One GPS session for one day, enriched with derived columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsRecord {
    pub date: NaiveDate,
    pub season: String,
    /// Distance covered in meters; `None` when the cell was empty or not numeric
    pub distance: Option<f64>,
    /// Raw `HH:MM:SS` heart-rate-zone cells, zones 1 through 5
    pub hr_zone_hms: [Option<String>; 5],
    /// Derived per-zone duration in seconds
    pub hr_zone_seconds: [i64; 5],
    /// Offset from the nearest match day; 0 on the match day itself
    pub md_plus_code: Option<i64>,
    pub is_match_day: bool,
    /// 1-based week index relative to the earliest date in the filtered set
    pub week_num: i64,
    /// English weekday name, e.g. "Saturday"
    pub day_name: String,
    /// Columns not interpreted by the loader, preserved verbatim
    pub extras: BTreeMap<String, String>,
}

impl GpsRecord {
    /// An active session is one where real distance was covered
    pub fn is_active(&self) -> bool {
        self.distance.map(|d| d > 0.0).unwrap_or(false)
    }

    /// Total time across all five heart-rate zones, in seconds
    pub fn total_zone_seconds(&self) -> i64 {
        self.hr_zone_seconds.iter().sum()
    }
}

/// One physical capability test result on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    pub test_date: NaiveDate,
    /// Benchmark percentile; `None` when the cell was empty or not numeric
    pub benchmark_pct: Option<f64>,
    /// Test-specific columns preserved verbatim
    pub extras: BTreeMap<String, String>,
}

/// One recovery metric reading on one session date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryRecord {
    pub session_date: NaiveDate,
    pub season_name: String,
    /// Full metric name as exported, e.g. "sleep_baseline_score"
    pub metric: String,
    /// Numeric reading; `None` when the cell held non-numeric text
    pub value: Option<f64>,
    /// ISO-8601 week number of the session date
    pub week: u32,
    /// English month name, e.g. "March"
    pub month: String,
    pub metric_type: MetricType,
    /// Metric name with the baseline type suffix stripped, e.g. "sleep"
    pub base_metric: String,
    pub extras: BTreeMap<String, String>,
}

/// Kind of measurement a recovery metric name encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricType {
    Completeness,
    Composite,
    Score,
}

impl MetricType {
    /// Classify a metric name by substring, checked in priority order.
    /// Anything that is neither a completeness nor a composite is a score.
    pub fn classify(metric: &str) -> Self {
        if metric.contains("completeness") {
            MetricType::Completeness
        } else if metric.contains("composite") {
            MetricType::Composite
        } else {
            MetricType::Score
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricType::Completeness => write!(f, "completeness"),
            MetricType::Composite => write!(f, "composite"),
            MetricType::Score => write!(f, "score"),
        }
    }
}

/// Untyped table for reference data that is passed through verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    /// One Vec of cell values per row, in header order
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum TracksideError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("File {path} is not valid {encoding}")]
    Decode { path: String, encoding: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid date in `{column}`: expected DD/MM/YYYY, got `{value}`")]
    DateParse { column: String, value: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TracksideError>;

/// Application configuration loaded from trackside.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
}

/// Where the per-athlete CSV exports live and how to read them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub gps_path: String,
    pub capability_path: String,
    pub recovery_path: String,
    pub priority_path: String,
    /// Text encoding of the GPS and priority exports
    pub encoding: String,
    /// Season label, e.g. "2023/2024"
    pub season: String,
}

impl Default for Config {
    fn default() -> Self {
        let dir = "data/players_data/marc_cucurella";
        Config {
            data: DataConfig {
                gps_path: format!("{dir}/CFC GPS Data.csv"),
                capability_path: format!("{dir}/CFC Physical Capability Data.csv"),
                recovery_path: format!("{dir}/CFC Recovery status Data.csv"),
                priority_path: format!("{dir}/CFC Individual Priority Areas.csv"),
                encoding: "ISO-8859-1".to_string(),
                season: "2023/2024".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TracksideError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| TracksideError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TracksideError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
