//! Output writers for analysis results.
//!
//! This module handles writing data to disk in various formats:
//! - CSV tables (events, function stats, call-graph stats)
//! - JSON reports
//! - SVG flamegraphs
//! - Text summaries

pub mod csv;
pub mod json;
pub mod summary;
pub mod svg;

use crate::utils::error::OutputError;
use log::debug;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// Re-export main functions
pub use csv::{
    write_edge_stats, write_edge_stats_csv, write_events, write_events_csv, write_function_stats,
    write_function_stats_csv,
};
pub use json::{build_report, read_report, write_report};
pub use summary::generate_text_summary;
pub use svg::write_svg;

/// Validate `path`, create missing parent directories and open it for writing
///
/// **Private** - shared by every file writer
pub(crate) fn create_output_file(path: &Path) -> Result<BufWriter<File>, OutputError> {
    validate_output_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(path).map_err(OutputError::WriteFailed)?;
    Ok(BufWriter::new(file))
}

/// Validate that output path is writable
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Refuse to clobber a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_create_output_file_makes_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("nested/dirs/out.csv");

        create_output_file(&nested).unwrap();

        assert!(nested.exists());
    }
}
