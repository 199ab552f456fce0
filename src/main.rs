//! Trackside CLI
//!
//! Loads one of the per-athlete exports and prints a short summary, mostly
//! useful for eyeballing a dataset before wiring it into a dashboard.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trackside::{Config, Result};

#[derive(Parser)]
#[command(name = "trackside")]
#[command(about = "Athlete performance data preprocessing", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "trackside.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the GPS export for a season
    Gps {
        /// Override the configured CSV path
        #[arg(long)]
        file: Option<PathBuf>,
        /// Override the configured season label
        #[arg(long)]
        season: Option<String>,
        /// Override the configured text encoding
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Summarize the physical capability export for a season
    Capability {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        season: Option<String>,
    },
    /// Summarize the recovery status export for a season
    Recovery {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        season: Option<String>,
    },
    /// Print the priority/reference table verbatim
    Priority {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Create a default trackside.toml
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Gps { file, season, encoding } => {
            commands::gps(&config, file, season, encoding)
        }
        Commands::Capability { file, season } => commands::capability(&config, file, season),
        Commands::Recovery { file, season } => commands::recovery(&config, file, season),
        Commands::Priority { file, encoding } => commands::priority(&config, file, encoding),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use trackside::data;

    fn path_or(file: Option<PathBuf>, configured: &str) -> PathBuf {
        file.unwrap_or_else(|| PathBuf::from(configured))
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);
        println!("Edit the [data] paths to point at your athlete's exports");
        Ok(())
    }

    pub fn gps(
        config: &Config,
        file: Option<PathBuf>,
        season: Option<String>,
        encoding: Option<String>,
    ) -> Result<()> {
        let path = path_or(file, &config.data.gps_path);
        let season = season.unwrap_or_else(|| config.data.season.clone());
        let encoding = encoding.unwrap_or_else(|| config.data.encoding.clone());

        let (full, active) = data::load_gps(&path, &encoding, &season)?;

        println!(
            "GPS sessions ({}): {} rows, {} active",
            season,
            full.len(),
            active.len()
        );
        if let (Some(first), Some(last)) = (full.first(), full.last()) {
            println!("Date range: {} to {}", first.date, last.date);
        }
        let matches = full.iter().filter(|r| r.is_match_day).count();
        println!("Match days: {}", matches);

        let total_distance: f64 = active.iter().filter_map(|r| r.distance).sum();
        let total_zone_time: i64 = active.iter().map(|r| r.total_zone_seconds()).sum();
        println!(
            "Active totals: {:.1} km covered, {:.1} h in heart-rate zones",
            total_distance / 1000.0,
            total_zone_time as f64 / 3600.0
        );
        Ok(())
    }

    pub fn capability(
        config: &Config,
        file: Option<PathBuf>,
        season: Option<String>,
    ) -> Result<()> {
        let path = path_or(file, &config.data.capability_path);
        let season = season.unwrap_or_else(|| config.data.season.clone());

        let rows = data::load_physical_capabilities(&path, &season)?;

        println!("Capability tests ({}): {} rows", season, rows.len());
        if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
            println!("Date range: {} to {}", first.test_date, last.test_date);
        }
        let benchmarked: Vec<f64> = rows.iter().filter_map(|r| r.benchmark_pct).collect();
        if !benchmarked.is_empty() {
            let mean = benchmarked.iter().sum::<f64>() / benchmarked.len() as f64;
            println!("Benchmark pct: {} readings, mean {:.1}", benchmarked.len(), mean);
        }
        Ok(())
    }

    pub fn recovery(
        config: &Config,
        file: Option<PathBuf>,
        season: Option<String>,
    ) -> Result<()> {
        let path = path_or(file, &config.data.recovery_path);
        let season = season.unwrap_or_else(|| config.data.season.clone());

        let rows = data::load_recovery_status(&path, &season)?;

        println!("Recovery readings ({}): {} rows", season, rows.len());
        if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
            println!("Date range: {} to {}", first.session_date, last.session_date);
        }

        let mut bases: Vec<&str> = rows.iter().map(|r| r.base_metric.as_str()).collect();
        bases.sort();
        bases.dedup();
        println!("Base metrics: {}", bases.join(", "));
        Ok(())
    }

    pub fn priority(
        config: &Config,
        file: Option<PathBuf>,
        encoding: Option<String>,
    ) -> Result<()> {
        let path = path_or(file, &config.data.priority_path);
        let encoding = encoding.unwrap_or_else(|| config.data.encoding.clone());

        let table = data::load_priority(&path, &encoding)?;

        println!("{}", table.headers.join(" | "));
        for row in &table.rows {
            println!("{}", row.join(" | "));
        }
        Ok(())
    }
}
