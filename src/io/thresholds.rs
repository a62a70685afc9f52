//! Activation threshold table reader.
//!
//! The file is a JSON object keyed by pulse width in milliseconds (`"0.06"`,
//! `"0.075"`, ...). Each entry maps a fiber index (`"0"`, `"1"`, ...) to that
//! fiber's activation threshold (V):
//!
//! ```text
//! { "0.06": { "0": 2.5, "1": 3.1 }, "0.075": { ... }, ... }
//! ```
//!
//! Rows are returned in `PULSE_WIDTHS_US` order. A `null` or non-numeric
//! threshold is kept as `None`; that fiber never activates.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::domain::{PULSE_WIDTHS_US, pulse_width_key};
use crate::error::AppError;

type RawTable = HashMap<String, HashMap<String, serde_json::Value>>;

/// Thresholds per pulse width (row) and fiber (column).
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    pub rows: Vec<Vec<Option<f64>>>,
}

impl ThresholdTable {
    /// Thresholds for the pulse width at `pw_index`; empty when absent.
    pub fn row(&self, pw_index: usize) -> &[Option<f64>] {
        self.rows.get(pw_index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of fibers covered by the first row.
    pub fn fibers(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

pub fn load_thresholds(path: &Path) -> Result<ThresholdTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open thresholds JSON '{}': {e}", path.display()))
    })?;
    parse_thresholds(BufReader::new(file))
}

pub fn parse_thresholds(reader: impl Read) -> Result<ThresholdTable, AppError> {
    let raw: RawTable = serde_json::from_reader(reader)
        .map_err(|e| AppError::new(2, format!("Invalid thresholds JSON: {e}")))?;

    let mut rows = Vec::with_capacity(PULSE_WIDTHS_US.len());
    for pw in PULSE_WIDTHS_US {
        let key = pulse_width_key(pw);
        let entry = raw.get(&key).ok_or_else(|| {
            AppError::new(
                2,
                format!("Thresholds JSON has no entry for pulse width {pw} us (key \"{key}\")."),
            )
        })?;

        let row = (0..entry.len())
            .map(|fib| {
                entry.get(&fib.to_string()).map(serde_json::Value::as_f64).ok_or_else(|| {
                    AppError::new(
                        2,
                        format!("Thresholds JSON entry \"{key}\" is missing fiber index {fib}."),
                    )
                })
            })
            .collect::<Result<Vec<Option<f64>>, AppError>>()?;
        rows.push(row);
    }

    Ok(ThresholdTable { rows })
}
