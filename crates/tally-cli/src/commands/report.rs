//! Report command: ingest the source directory and render the totals.
//!
//! This module implements `tally report` with plain-text, HTML and JSON
//! output. Revenue stays exact in the totals; rounding to cents and currency
//! formatting happen here.

use std::fmt::Write as _;
use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tally_core::{Revenue, Totals, apply_revenue};
use tally_sheets::{Warning, collect_inputs, ingest_batch, load_rates};

use crate::Config;
use crate::cli::OutputFormat;

const TITLE: &str = "Total project hours by code";

/// Computed report data.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub files_total: usize,
    pub files_parsed: usize,
    pub rows_read: usize,
    pub rows_unmatched: usize,
    pub totals: Totals,
    pub warnings: Vec<Warning>,
}

// ========== Report Generation ==========

/// Loads the rate table, ingests every timesheet and derives revenue.
///
/// The rate table and the source directory are required; per-file problems
/// end up in [`ReportData::warnings`].
pub fn generate_report_data(config: &Config) -> Result<ReportData> {
    let started = Instant::now();
    let generated_at = Utc::now();

    let classifier = config
        .classifier()
        .context("invalid project patterns in configuration")?;
    let layout = config
        .layout()
        .context("invalid sheet layout in configuration")?;
    let rates = load_rates(&config.rates_path).context("failed to load rate table")?;
    let paths = collect_inputs(&config.source_dir).context("failed to collect timesheets")?;
    tracing::info!(files = paths.len(), source = %config.source_dir.display(), "ingesting timesheets");

    let mut batch = ingest_batch(&paths, &layout, &classifier);
    let missing = apply_revenue(&mut batch.totals, &rates);
    batch
        .warnings
        .extend(missing.into_iter().map(|user| Warning::MissingRate { user }));

    Ok(ReportData {
        generated_at,
        elapsed: started.elapsed(),
        files_total: batch.files_total,
        files_parsed: batch.files_parsed,
        rows_read: batch.rows_read,
        rows_unmatched: batch.rows_unmatched,
        totals: batch.totals,
        warnings: batch.warnings,
    })
}

// ========== Value Formatting ==========

/// Formats hours without trailing zeros.
pub fn format_hours(hours: Decimal) -> String {
    hours.normalize().to_string()
}

/// Formats an amount as dollars rounded to cents with thousands separators.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Formats a derived revenue for display.
pub fn format_revenue(revenue: Option<Revenue>) -> String {
    match revenue {
        Some(Revenue::Amount(amount)) => format_currency(amount),
        Some(Revenue::MissingRate) => "unknown (no rate)".to_string(),
        None => "-".to_string(),
    }
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

// ========== Text Output ==========

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();
    let totals = &data.totals;

    writeln!(output, "{TITLE}").unwrap();
    writeln!(output, "{}", "─".repeat(TITLE.len())).unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "{:<26}{}",
        "Total billable hours:",
        format_hours(totals.grand().total_billable)
    )
    .unwrap();
    writeln!(
        output,
        "{:<26}{}",
        "Total non-billable hours:",
        format_hours(totals.grand().total_non_billable)
    )
    .unwrap();

    writeln!(output).unwrap();
    writeln!(output, "Files parsed: {} of {}", data.files_parsed, data.files_total).unwrap();
    writeln!(
        output,
        "Rows read:    {} ({} unmatched)",
        data.rows_read, data.rows_unmatched
    )
    .unwrap();

    for (heading, projects) in [
        ("Project code (billable)", totals.billable()),
        ("Project code (non-billable)", totals.non_billable()),
    ] {
        writeln!(output).unwrap();
        writeln!(output, "{heading:<30}{:>10}", "Hours").unwrap();
        if projects.is_empty() {
            writeln!(output, "(none)").unwrap();
        }
        for (code, hours) in projects {
            writeln!(output, "{code:<30}{:>10}", format_hours(*hours)).unwrap();
        }
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "{:<16}{:>12}{:>12}{:>20}",
        "User", "Total hours", "Billable", "Revenue"
    )
    .unwrap();
    if totals.users().is_empty() {
        writeln!(output, "(none)").unwrap();
    }
    for (name, user) in totals.users() {
        writeln!(
            output,
            "{name:<16}{:>12}{:>12}{:>20}",
            format_hours(user.all_hours),
            format_hours(user.total_billable),
            format_revenue(user.revenue)
        )
        .unwrap();
    }

    if !data.warnings.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "Warnings").unwrap();
        writeln!(output, "────────").unwrap();
        for warning in &data.warnings {
            writeln!(output, "- {warning}").unwrap();
        }
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Completed in {:.2} seconds.",
        data.elapsed.as_secs_f64()
    )
    .unwrap();

    output
}

// ========== HTML Output ==========

/// Escapes text for HTML element content and attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn html_table(output: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    writeln!(output, "<table border=\"1\">").unwrap();
    output.push_str("<thead><tr>");
    for header in headers {
        write!(output, "<th>{}</th>", escape_html(header)).unwrap();
    }
    output.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        output.push_str("<tr>");
        for cell in row {
            write!(output, "<td>{}</td>", escape_html(cell)).unwrap();
        }
        output.push_str("</tr>\n");
    }
    output.push_str("</tbody>\n</table>\n");
}

/// Formats the report as a standalone HTML document.
pub fn format_report_html(data: &ReportData) -> String {
    let mut output = String::new();
    let totals = &data.totals;

    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(output, "<title>{TITLE}</title>\n</head>\n<body>\n<section>").unwrap();
    writeln!(output, "<h3>{TITLE}</h3>").unwrap();
    writeln!(
        output,
        "<p>Total billable hours: {}</p>",
        format_hours(totals.grand().total_billable)
    )
    .unwrap();
    writeln!(
        output,
        "<p>Total <span style=\"color:red;\">non-billable</span> hours: {}</p>",
        format_hours(totals.grand().total_non_billable)
    )
    .unwrap();

    for (heading, projects) in [
        ("Project code (billable)", totals.billable()),
        ("Project code (non-billable)", totals.non_billable()),
    ] {
        let rows: Vec<Vec<String>> = projects
            .iter()
            .map(|(code, hours)| vec![code.clone(), format_hours(*hours)])
            .collect();
        html_table(&mut output, &[heading, "Total hours"], &rows);
    }

    let rows: Vec<Vec<String>> = totals
        .users()
        .iter()
        .map(|(name, user)| {
            vec![
                name.clone(),
                format_hours(user.all_hours),
                format_hours(user.total_billable),
                format_revenue(user.revenue),
            ]
        })
        .collect();
    html_table(
        &mut output,
        &["User name", "Total hours", "Billable hours", "Revenue"],
        &rows,
    );

    if !data.warnings.is_empty() {
        output.push_str("<h4>Warnings</h4>\n<ul>\n");
        for warning in &data.warnings {
            writeln!(output, "<li>{}</li>", escape_html(&warning.to_string())).unwrap();
        }
        output.push_str("</ul>\n");
    }

    writeln!(
        output,
        "<p>* {} of {} files parsed in {:.2} seconds</p>",
        data.files_parsed,
        data.files_total,
        data.elapsed.as_secs_f64()
    )
    .unwrap();
    output.push_str("</section>\n</body>\n</html>\n");
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: String,
    pub elapsed_seconds: f64,
    pub files: JsonFiles,
    pub rows: JsonRows,
    pub totals: &'a Totals,
    pub warnings: &'a [Warning],
}

#[derive(Debug, Serialize)]
pub struct JsonFiles {
    pub total: usize,
    pub parsed: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonRows {
    pub read: usize,
    pub unmatched: usize,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let report = JsonReport {
        generated_at: data.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        elapsed_seconds: data.elapsed.as_secs_f64(),
        files: JsonFiles {
            total: data.files_total,
            parsed: data.files_parsed,
        },
        rows: JsonRows {
            read: data.rows_read,
            unmatched: data.rows_unmatched,
        },
        totals: &data.totals,
        warnings: &data.warnings,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, config: &Config, format: OutputFormat) -> Result<()> {
    let data = generate_report_data(config)?;

    match format {
        OutputFormat::Text => write!(writer, "{}", format_report(&data))?,
        OutputFormat::Html => write!(writer, "{}", format_report_html(&data))?,
        OutputFormat::Json => writeln!(writer, "{}", format_report_json(&data)?)?,
    }

    Ok(())
}
