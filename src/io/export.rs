//! Exports: activation summary JSON and per-fiber window CSV.
//!
//! Both are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::activation::ActivationSummary;
use crate::analysis::FiberReport;
use crate::error::AppError;

/// File name of the summary written into the output folder.
pub const SUMMARY_FILE: &str = "activation_summary.json";

/// Write the activation summary as pretty JSON.
pub fn write_activation_summary(path: &Path, summary: &ActivationSummary) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}

/// Write one CSV row per fiber: site, validity, and the extracted window.
pub fn write_windows_csv(path: &Path, reports: &[FiberReport]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    write_windows(csv::Writer::from_writer(file), reports)
}

fn write_windows<W: std::io::Write>(
    mut writer: csv::Writer<W>,
    reports: &[FiberReport],
) -> Result<(), AppError> {
    let width = reports.iter().map(|r| r.window.len()).max().unwrap_or(0);

    let mut header = vec![
        "fiber".to_string(),
        "nodes".to_string(),
        "site".to_string(),
        "valid".to_string(),
        "strategy".to_string(),
        "kind".to_string(),
        "error".to_string(),
    ];
    header.extend((0..width).map(|i| format!("v{i}")));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in reports {
        let mut row = vec![
            r.fiber.to_string(),
            r.nodes.to_string(),
            r.site.map(|s| s.index.to_string()).unwrap_or_default(),
            r.is_valid().to_string(),
            r.site.map(|s| s.strategy.to_string()).unwrap_or_default(),
            r.kind.to_string(),
            r.error.clone().unwrap_or_default(),
        ];
        row.extend(r.window.iter().map(|v| format!("{v:.10}")));
        row.resize(header.len(), String::new());
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_fibers;
    use crate::domain::{AnalysisConfig, CenteringStrategy, WindowKind};

    #[test]
    fn csv_has_one_row_per_fiber() {
        let fibers = vec![
            (0..9).map(|i| (i as f64 - 4.0).abs()).collect::<Vec<_>>(),
            vec![1.0],
        ];
        let config = AnalysisConfig {
            strategy: CenteringStrategy::Ec,
            site_window: 3,
            kind: WindowKind::Ec,
            num_values: 3,
        };
        let reports = analyze_fibers(&fibers, &config);

        let mut buf = Vec::new();
        write_windows(csv::Writer::from_writer(&mut buf), &reports).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "fiber,nodes,site,valid,strategy,kind,error,v0,v1,v2");
        assert_eq!(
            lines[1],
            "0,9,4,true,ec,ec,,1.0000000000,0.0000000000,1.0000000000"
        );
        assert!(lines[2].starts_with("1,1,0,false,ec,err,"), "{}", lines[2]);
    }
}
