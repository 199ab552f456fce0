//! Priority / reference data loader
//!
//! A typed passthrough: the export is decoded and returned cell-for-cell
//! with no transformation, for layers that render it as-is.

use std::path::Path;

use crate::data::read;
use crate::{Result, Table};

/// Load a reference CSV verbatim with the given text encoding
pub fn load_priority(path: &Path, encoding: &str) -> Result<Table> {
    log::info!("Loading priority data from {}", path.display());

    let mut reader = read::open_decoded(path, encoding)?;
    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        rows.push(result?.iter().map(str::to_string).collect());
    }

    Ok(Table { headers, rows })
}
