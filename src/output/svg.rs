//! SVG flamegraph output writer.

use super::create_output_file;
use crate::utils::error::OutputError;
use log::{info, warn};
use std::io::Write;
use std::path::Path;

/// Write SVG content to a file
///
/// **Public** - main entry point for SVG output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
///
/// # Example
/// ```ignore
/// let svg = generate_flamegraph(&stacks, None)?;
/// write_svg(&svg, "flamegraph.svg")?;
/// ```
pub fn write_svg(svg_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing SVG to: {}", output_path.display());

    if output_path.extension().is_some_and(|ext| ext != "svg") {
        warn!(
            "File does not have .svg extension: {}",
            output_path.display()
        );
    }

    let mut writer = create_output_file(output_path)?;

    writer
        .write_all(svg_content.as_bytes())
        .map_err(OutputError::WriteFailed)?;

    writer.flush().map_err(OutputError::WriteFailed)?;

    let file_size = svg_content.len();
    info!(
        "SVG written successfully ({} bytes, {:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );

    Ok(())
}
