// SPDX-License-Identifier: MIT

//! CSV export of normalized activities.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::Result;
use crate::models::Activity;

/// Write activities as CSV to any writer.
///
/// Rows follow the fixed `Activity` schema; absent optionals become
/// empty cells, never zeros.
pub fn write_csv<W: Write>(writer: W, activities: &[Activity]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for activity in activities {
        csv_writer.serialize(activity)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write activities to a dated CSV file in `output_dir`, creating the
/// directory if needed. Returns the path written.
pub fn export_to_dir(output_dir: &Path, activities: &[Activity]) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let filename = format!("strava_activities_{}.csv", Utc::now().format("%Y-%m-%d"));
    let path = output_dir.join(filename);
    let file = std::fs::File::create(&path)?;
    write_csv(file, activities)?;
    tracing::info!(path = %path.display(), count = activities.len(), "Activities exported");
    Ok(path)
}
