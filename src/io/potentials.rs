//! EC potential file reader: one fiber per line, one value per node.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::AppError;
use crate::io::tract::parse_float_line;

pub fn read_potentials_file(path: &Path) -> Result<Vec<Vec<f64>>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open potentials file '{}': {e}", path.display()))
    })?;
    let fibers = parse_potentials(BufReader::new(file))?;
    if fibers.is_empty() {
        return Err(AppError::new(3, format!("No fibers found in '{}'.", path.display())));
    }
    Ok(fibers)
}

pub fn parse_potentials(reader: impl BufRead) -> Result<Vec<Vec<f64>>, AppError> {
    let mut fibers = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| {
            AppError::new(2, format!("Failed to read potentials file line {line_no}: {e}"))
        })?;
        if let Some(values) = parse_float_line(&line, line_no, "potentials file")? {
            fibers.push(values);
        }
    }
    Ok(fibers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_fiber_per_line() {
        let fibers = parse_potentials("-1.5 -2 -0.5\n\n3e-1 4\n".as_bytes()).unwrap();
        assert_eq!(fibers, vec![vec![-1.5, -2.0, -0.5], vec![0.3, 4.0]]);
    }

    #[test]
    fn bad_value_is_rejected() {
        let err = parse_potentials("1 2\n1 two\n".as_bytes()).unwrap_err();
        assert!(err.message().starts_with("Line 2 in potentials file"), "{err}");
    }
}
