//! Formatted terminal output for analysis and activation runs.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::activation::PulseWidthActivation;
use crate::analysis::{BatchSummary, FiberReport};
use crate::domain::{AnalysisConfig, Conductivity};

/// Header block for an analysis run.
pub fn format_analysis_summary(summary: &BatchSummary, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    out.push_str("=== fdti - fiber site-of-initiation analysis ===\n");
    out.push_str(&format!(
        "Strategy: {} | site window: {} | window: {} x {}\n",
        config.strategy, config.site_window, config.kind, config.num_values
    ));
    out.push_str(&format!(
        "Fibers: n={} | valid={} | too close to an end={} | failed={}\n",
        summary.total, summary.valid, summary.invalid, summary.failed
    ));

    out
}

/// One row per fiber: site, validity, and the extracted window.
pub fn format_site_table(reports: &[FiberReport], max_rows: usize) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>6} {:>6} {:>6} {:<6} {:<4} {}\n",
            "fiber", "nodes", "site", "valid", "kind", "window"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<6} {:-<6} {:-<6} {:-<6} {:-<4} {:-<6}\n", "", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for r in reports.iter().take(max_rows) {
        let site = r.site.map(|s| s.index.to_string()).unwrap_or_else(|| "-".to_string());
        let detail = match &r.error {
            Some(err) => format!("error: {err}"),
            None => fmt_vec(&r.window),
        };
        out.push_str(
            format!(
                "{:>6} {:>6} {:>6} {:<6} {:<4} {}\n",
                r.fiber,
                r.nodes,
                site,
                if r.is_valid() { "yes" } else { "no" },
                r.kind,
                truncate(&detail, 72),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    if reports.len() > max_rows {
        out.push_str(&format!("... {} more fibers\n", reports.len() - max_rows));
    }

    out
}

/// Per-pulse-width activation counts.
pub fn format_activation_table(
    results: &[PulseWidthActivation],
    n_fibers: usize,
    voltage_limit: f64,
    conductivity: Conductivity,
) -> String {
    let mut out = String::new();
    out.push_str("=== fdti - fiber activation by pulse width ===\n");
    out.push_str(&format!(
        "Fibers: n={n_fibers} | voltage limit={voltage_limit} V | conductivity={conductivity:?}\n\n"
    ));
    out.push_str(
        format!("{:>5} {:>8} {:>10} {:>8}\n", "index", "pw (us)", "activated", "share").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<5} {:-<8} {:-<10} {:-<8}\n", "", "", "", "").trim_end());
    out.push('\n');

    for r in results {
        let count = r.count();
        let share = if n_fibers == 0 {
            0.0
        } else {
            100.0 * count as f64 / n_fibers as f64
        };
        out.push_str(&format!(
            "{:>5} {:>8} {:>10} {:>7.1}%\n",
            r.index, r.pulse_width_us, count, share
        ));
    }

    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_fibers;
    use crate::domain::{CenteringStrategy, WindowKind};

    #[test]
    fn site_table_lists_fibers_and_errors() {
        let config = AnalysisConfig {
            strategy: CenteringStrategy::Ec,
            site_window: 1,
            kind: WindowKind::Ec,
            num_values: 3,
        };
        let fibers = vec![vec![3.0, 1.0, 2.0, 5.0], Vec::new()];
        let reports = analyze_fibers(&fibers, &config);
        let txt = format_site_table(&reports, 10);
        let lines: Vec<&str> = txt.lines().collect();

        assert_eq!(lines[0], " fiber  nodes   site valid  kind window");
        assert_eq!(lines[2], "     0      4      1 yes    ec   [3.0000, 1.0000, 2.0000]");
        assert_eq!(lines[3], "     1      0      - no     err  error: fiber has no EC potentials");
    }

    #[test]
    fn site_table_truncates_long_runs() {
        let reports = analyze_fibers(&vec![vec![1.0, 0.0, 1.0]; 5], &AnalysisConfig::default());
        let txt = format_site_table(&reports, 2);
        assert!(txt.ends_with("... 3 more fibers\n"));
    }

    #[test]
    fn activation_table_reports_share() {
        let results = vec![PulseWidthActivation {
            index: 0,
            pulse_width_us: 60,
            activated: vec![true, false, true, false],
        }];
        let txt = format_activation_table(&results, 4, 3.0, Conductivity::Anisotropic);
        assert!(txt.contains("    0       60          2    50.0%\n"), "{txt}");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
