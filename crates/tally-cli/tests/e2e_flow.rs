//! End-to-end tests for the `tally` binary.
//!
//! Each test builds a source directory of real workbooks and a rate table in
//! a temp dir, then runs the binary against them.

use std::path::Path;
use std::process::{Command, Output};

use rust_xlsxwriter::Workbook;
use serde_json::Value;
use tempfile::TempDir;

fn tally_binary() -> String {
    env!("CARGO_BIN_EXE_tally").to_string()
}

/// Runs `tally` with HOME pointed at the temp dir so no user config is picked up.
fn run_tally(temp: &Path, args: &[&str]) -> Output {
    Command::new(tally_binary())
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run tally")
}

/// Writes a timesheet in the default layout: user in A3, codes in column A,
/// hours in column K from row 7, and a trailing totals row.
fn write_timesheet(path: &Path, user: &str, rows: &[(&str, f64)]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Weekly timesheet").unwrap();
    worksheet.write_string(5, 0, "Project").unwrap();
    worksheet.write_string(5, 10, "Hours").unwrap();
    if !user.is_empty() {
        worksheet.write_string(2, 0, user).unwrap();
    }
    let mut row = 6;
    let mut sum = 0.0;
    for (code, hours) in rows {
        worksheet.write_string(row, 0, *code).unwrap();
        worksheet.write_number(row, 10, *hours).unwrap();
        sum += hours;
        row += 1;
    }
    worksheet.write_string(row, 0, "APP-TOTAL").unwrap();
    worksheet.write_number(row, 10, sum).unwrap();
    workbook.save(path).unwrap();
}

/// Source directory and rate table for the alice/bob scenario.
fn setup_scenario() -> TempDir {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    std::fs::create_dir(&source).unwrap();
    write_timesheet(
        &source.join("alice.xlsx"),
        "Alice",
        &[("APP1", 10.0), ("BDN2", 2.0), ("XYZ", 5.0)],
    );
    write_timesheet(&source.join("bob.xlsx"), "bob", &[("APP1", 4.0), ("RMG3", 1.5)]);
    std::fs::write(temp.path().join("rates.csv"), "user,rate\nalice,50.00\n").unwrap();
    temp
}

fn report_args(temp: &Path, source: &str, rates: &str, format: &str) -> Vec<String> {
    vec![
        "report".to_string(),
        "--source".to_string(),
        temp.join(source).display().to_string(),
        "--rates".to_string(),
        temp.join(rates).display().to_string(),
        "--format".to_string(),
        format.to_string(),
    ]
}

fn run_report(temp: &Path, source: &str, rates: &str, format: &str) -> Output {
    let args = report_args(temp, source, rates, format);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_tally(temp, &args)
}

#[test]
fn test_report_json_scenario() {
    let temp = setup_scenario();
    let output = run_report(temp.path(), "source", "rates.csv", "json");
    assert!(
        output.status.success(),
        "report should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let totals = &report["totals"];
    assert_eq!(totals["billable"]["APP1"], "14");
    assert_eq!(totals["billable"]["RMG3"], "1.5");
    assert_eq!(totals["non_billable"]["BDN2"], "2");
    assert!(totals["billable"].get("XYZ").is_none());
    assert!(totals["billable"].get("APP-TOTAL").is_none());
    assert_eq!(totals["grand"]["total_billable"], "15.5");
    assert_eq!(totals["grand"]["total_non_billable"], "2");

    let alice = &totals["users"]["alice"];
    assert_eq!(alice["all_hours"], "12");
    assert_eq!(alice["total_billable"], "10");
    assert_eq!(alice["revenue"]["amount"], "500.00");

    let bob = &totals["users"]["bob"];
    assert_eq!(bob["all_hours"], "5.5");
    assert_eq!(bob["revenue"], "missing_rate");

    assert_eq!(report["files"]["total"], 2);
    assert_eq!(report["files"]["parsed"], 2);
    assert_eq!(report["rows"]["read"], 5);
    assert_eq!(report["rows"]["unmatched"], 1);
    assert_eq!(report["warnings"][0]["kind"], "missing_rate");
    assert_eq!(report["warnings"][0]["user"], "bob");
}

#[test]
fn test_report_text_output() {
    let temp = setup_scenario();
    let output = run_report(temp.path(), "source", "rates.csv", "text");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Total project hours by code\n"));
    assert!(stdout.contains("Files parsed: 2 of 2"));
    assert!(stdout.contains("$500.00"));
    assert!(stdout.contains("unknown (no rate)"));
    assert!(stdout.contains("- bob: billable hours but no rate, revenue unknown"));
}

#[test]
fn test_report_html_output() {
    let temp = setup_scenario();
    let output = run_report(temp.path(), "source", "rates.csv", "html");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("<!DOCTYPE html>"));
    assert!(stdout.contains("<tr><td>APP1</td><td>14</td></tr>"));
}

#[test]
fn test_include_last_row_counts_totals_row() {
    let temp = setup_scenario();
    let mut args = report_args(temp.path(), "source", "rates.csv", "json");
    args.push("--include-last-row".to_string());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let output = run_tally(temp.path(), &args);
    assert!(output.status.success());

    // The totals rows are labelled APP-TOTAL, which matches the project pattern
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["totals"]["billable"]["APP-TOTAL"], "22.5");
}

#[test]
fn test_unreadable_and_anonymous_files_are_skipped() {
    let temp = setup_scenario();
    let source = temp.path().join("source");
    std::fs::write(source.join("corrupt.xlsx"), "not a workbook").unwrap();
    write_timesheet(&source.join("nobody.xlsx"), "", &[("APP1", 40.0)]);

    let output = run_report(temp.path(), "source", "rates.csv", "json");
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files"]["total"], 4);
    assert_eq!(report["files"]["parsed"], 2);
    assert_eq!(report["totals"]["billable"]["APP1"], "14");

    let kinds: Vec<&str> = report["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["unreadable_file", "missing_user_identity", "missing_rate"]
    );
}

#[test]
fn test_report_uses_config_file() {
    let temp = setup_scenario();
    let config_path = temp.path().join("tally.toml");
    std::fs::write(
        &config_path,
        format!(
            "source_dir = {:?}\nrates_path = {:?}\nnon_billable_pattern = \"(BDN|OVN|RMG)\"\n",
            temp.path().join("source").display().to_string(),
            temp.path().join("rates.csv").display().to_string(),
        ),
    )
    .unwrap();

    let output = run_tally(
        temp.path(),
        &["-c", config_path.to_str().unwrap(), "report", "--format", "json"],
    );
    assert!(
        output.status.success(),
        "report should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["totals"]["non_billable"]["RMG3"], "1.5");
    assert_eq!(report["totals"]["grand"]["total_billable"], "14");
}

#[test]
fn test_empty_source_dir_fails() {
    let temp = setup_scenario();
    std::fs::create_dir(temp.path().join("empty")).unwrap();

    let output = run_report(temp.path(), "empty", "rates.csv", "text");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no input files"));
}

#[test]
fn test_missing_rate_table_fails() {
    let temp = setup_scenario();
    let output = run_report(temp.path(), "source", "absent.csv", "text");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load rate table"));
}

#[test]
fn test_classify_command() {
    let temp = TempDir::new().unwrap();
    let output = run_tally(temp.path(), &["classify", "APP1", "OVN", "XYZ"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "APP1  billable\nOVN   non-billable\nXYZ   unmatched\n"
    );
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = run_tally(temp.path(), &[]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("report"));
}
