//! Result rendering: summary tables, JSON and text histograms.

use std::fmt::Write as _;

use loss_core::math::LossHistogram;
use loss_engine::mc::LossDistributionSummary;
use serde::Serialize;

use crate::Result;

/// Width of the longest histogram bar, in characters.
const HISTOGRAM_WIDTH: usize = 40;

/// JSON document printed by `tailrisk simulate --format json`.
#[derive(Debug, Serialize)]
pub struct SimulationReport<'a> {
    pub obligors: usize,
    pub total_exposure: f64,
    pub expected_loss: f64,
    pub seed: u64,
    pub summary: &'a LossDistributionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramReport>,
}

/// Histogram section of the JSON report.
#[derive(Debug, Serialize)]
pub struct HistogramReport {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub densities: Vec<f64>,
}

impl From<&LossHistogram> for HistogramReport {
    fn from(histogram: &LossHistogram) -> Self {
        Self {
            edges: histogram.edges(),
            counts: histogram.counts().to_vec(),
            densities: histogram.densities(),
        }
    }
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &SimulationReport<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render the summary as a two-column table.
pub fn render_table(report: &SimulationReport<'_>) -> String {
    let summary = report.summary;
    let mut rows: Vec<(String, String)> = vec![
        ("Obligors".to_string(), report.obligors.to_string()),
        ("Total exposure".to_string(), format_amount(report.total_exposure)),
        ("Expected loss".to_string(), format_amount(report.expected_loss)),
        ("Trials".to_string(), summary.trial_count.to_string()),
        ("Seed".to_string(), report.seed.to_string()),
        ("Mean loss".to_string(), format_amount(summary.mean)),
        ("Std dev".to_string(), format_amount(summary.std_dev)),
        ("Min loss".to_string(), format_amount(summary.min_loss)),
        ("Max loss".to_string(), format_amount(summary.max_loss)),
    ];
    for point in &summary.quantiles {
        rows.push((
            format!("Q({}) [{}]", point.level, summary.quantile_method),
            format_amount(point.loss),
        ));
    }

    let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{}{}{}{}{}",
            left,
            "─".repeat(key_width + 2),
            mid,
            "─".repeat(value_width + 2),
            right
        )
    };
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    for (key, value) in &rows {
        let _ = writeln!(
            out,
            "│ {:<kw$} │ {:>vw$} │",
            key,
            value,
            kw = key_width,
            vw = value_width
        );
    }
    let _ = write!(out, "{}", rule("└", "┴", "┘"));
    out
}

/// Render a histogram as one bar per bin, scaled to the densest bin.
pub fn render_histogram(histogram: &LossHistogram) -> String {
    let edges = histogram.edges();
    let densities = histogram.densities();
    let max_count = histogram.counts().iter().copied().max().unwrap_or(0).max(1);

    let mut out = String::from("Loss distribution (probability density)\n");
    for (k, &count) in histogram.counts().iter().enumerate() {
        let bar = "█".repeat(count * HISTOGRAM_WIDTH / max_count);
        let _ = writeln!(
            out,
            "[{:>14} , {:>14}) {:>12.4e} {}",
            format_amount(edges[k]),
            format_amount(edges[k + 1]),
            densities[k],
            bar
        );
    }
    out
}

/// Two-decimal amount with thousands separators.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
