//! Tract file reader.
//!
//! A tract file holds one fiber per line as whitespace-separated floats,
//! `x y z` repeated for every point. Blank lines are skipped. Any malformed
//! line aborts the read with an error naming its 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;

use crate::domain::Tract;
use crate::error::AppError;

/// Read every fiber of a tract file.
pub fn read_tract_file(path: &Path) -> Result<Vec<Tract>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open tract file '{}': {e}", path.display()))
    })?;
    parse_tracts(BufReader::new(file))
}

/// Parse tract lines from any buffered reader.
pub fn parse_tracts(reader: impl BufRead) -> Result<Vec<Tract>, AppError> {
    let mut fibers = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| {
            AppError::new(2, format!("Failed to read tract file line {line_no}: {e}"))
        })?;
        let Some(nums) = parse_float_line(&line, line_no, "tract file")? else {
            continue;
        };
        if nums.len() % 3 != 0 {
            return Err(AppError::new(
                2,
                format!(
                    "Line {line_no} in tract file does not have a 3N number of floats (found {}).",
                    nums.len()
                ),
            ));
        }
        let points = nums
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        fibers.push(points);
    }
    Ok(fibers)
}

/// Split a line into floats. Blank lines yield `None`.
pub(crate) fn parse_float_line(
    line: &str,
    line_no: usize,
    what: &str,
) -> Result<Option<Vec<f64>>, AppError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| {
                let msg = format!("Line {line_no} in {what} has a non-numeric value '{tok}'.");
                AppError::new(2, msg)
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points_and_skips_blank_lines() {
        let text = "0 0 0 1 1 1\n\n  2 3 4  \n";
        let fibers = parse_tracts(text.as_bytes()).unwrap();
        assert_eq!(fibers.len(), 2);
        assert_eq!(fibers[0], vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)]);
        assert_eq!(fibers[1], vec![Point3::new(2.0, 3.0, 4.0)]);
    }

    #[test]
    fn uneven_line_names_the_line() {
        let text = "0 0 0\n\n1 2 3 4\n";
        let err = parse_tracts(text.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().starts_with("Line 3 in tract file"), "{err}");
    }

    #[test]
    fn garbage_token_names_the_line() {
        let err = parse_tracts("1 2 x\n".as_bytes()).unwrap_err();
        assert!(err.message().contains("Line 1"));
        assert!(err.message().contains("'x'"));
    }
}
