//! Unit tests for the bandwidth and speed reports and JSON output.

use super::helpers::Workspace;
use crate::bandwidth::{AxisTick, bandwidth_report};
use crate::speed::speed_report;
use crate::*;
use rstest::rstest;
use trafficmap_core::{PeakPlacement, SpeedScale};
use trafficmap_data::IngestError;

#[rstest]
fn bandwidth_report_labels_peak_and_ticks() {
    let workspace = Workspace::new();
    let path = workspace.write(
        "bandwidth.csv",
        "Time (EST),Europe,Asia\n\
         Mon 00:00,10,1\n\
         Mon 06:00,11,2\n\
         Mon 12:00,12,3\n\
         Mon 18:00,30,9\n\
         Tue 00:00,14,5\n",
    );
    let report = bandwidth_report(&path, 2).expect("bandwidth report");
    assert_eq!(report.samples, 5);
    assert_eq!(report.regions, ["Asia", "Europe"]);
    assert_eq!(report.peak.index, 3);
    assert_eq!(report.peak.timestamp, "Mon 18:00");
    assert_eq!(report.peak.total_gbps, 39.0);
    assert_eq!(report.peak.placement, PeakPlacement::Centre);
    assert_eq!(
        report.axis_ticks,
        vec![
            AxisTick {
                index: 0,
                label: "Mon 00:00".to_owned(),
            },
            AxisTick {
                index: 2,
                label: "Mon 12:00".to_owned(),
            },
            AxisTick {
                index: 4,
                label: "Tue 00:00".to_owned(),
            },
        ]
    );
}

#[rstest]
fn bandwidth_report_surfaces_ingest_errors() {
    let workspace = Workspace::new();
    let path = workspace.write("bandwidth.csv", "When,Asia\nt0,1\n");
    match bandwidth_report(&path, 8) {
        Err(CliError::Ingest(IngestError::MissingColumn { column, .. })) => {
            assert_eq!(column, "Time (EST)");
        }
        other => panic!("expected a missing column error, found {other:?}"),
    }
}

#[rstest]
fn speed_report_summarises_known_speeds() {
    let workspace = Workspace::new();
    let path = workspace.write(
        "speed.csv",
        "iso3,country,speed_mbps\nKOR,South Korea,200\nMMR,Myanmar,10\nUSA,United States,100\n",
    );
    let report = speed_report(&path).expect("speed report");
    assert_eq!(report.countries, 3);
    let summary = report.summary.expect("speeds are known");
    assert_eq!(summary.max, 200.0);
    assert_eq!(summary.fastest.first().map(|c| c.iso3.as_str()), Some("KOR"));
    assert_eq!(report.scale, summary.scale);
}

#[rstest]
fn speed_report_falls_back_without_data() {
    let workspace = Workspace::new();
    let path = workspace.write("speed.csv", "iso3,speed_mbps\nABC,\n");
    let report = speed_report(&path).expect("speed report");
    assert_eq!(report.countries, 0);
    assert_eq!(report.scale, SpeedScale::default());
    assert!(report.summary.is_none());
}

#[rstest]
fn reports_are_pretty_json_with_trailing_newline() {
    let mut out = Vec::new();
    write_report(&mut out, &serde_json::json!({ "points": 3 })).expect("write report");
    assert_eq!(String::from_utf8(out).expect("utf-8"), "{\n  \"points\": 3\n}\n");
}

#[rstest]
fn missing_tables_are_reported_before_reading() {
    let workspace = Workspace::new();
    let missing = workspace.path("absent.csv");
    match require_existing(&missing, ARG_SPEED_TABLE) {
        Err(CliError::MissingSourceFile { field, path }) => {
            assert_eq!(field, ARG_SPEED_TABLE);
            assert_eq!(path, missing);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}
