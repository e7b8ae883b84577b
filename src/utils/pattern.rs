use super::parse_rle;
use crate::{frame, Field};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Reads a start pattern, either a plain PBM image or an RLE file.
pub fn load_pattern(path: &Path) -> Result<Field> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let pattern = if data.trim_ascii_start().starts_with(b"P1") {
        frame::decode(data.as_slice())
    } else {
        parse_rle(&data)
    };
    pattern.with_context(|| format!("failed to parse pattern {}", path.display()))
}

/// Places `pattern` in the middle of a blank `rows x cols` field.
pub fn centered(pattern: &Field, rows: usize, cols: usize) -> Result<Field> {
    if pattern.rows() > rows || pattern.cols() > cols {
        bail!(
            "pattern of {}x{} cells does not fit into a {}x{} grid",
            pattern.rows(),
            pattern.cols(),
            rows,
            cols
        );
    }
    let mut field = Field::blank(rows, cols);
    field.paste(pattern, (rows - pattern.rows()) / 2, (cols - pattern.cols()) / 2);
    Ok(field)
}
