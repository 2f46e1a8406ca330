//! File-based pipeline tests over all three formats

use crate::conversion::synthesize::{log_to_ocel, SynthesisOptions};
use crate::conversion::table_to_log::{table_to_log, TableConversionOptions};
use crate::event_log::export_xes::export_xes_path;
use crate::event_log::import_xes::{import_xes_path, XESImportOptions};
use crate::fidelity::roundtrip::{quantify_roundtrip, RoundTripWeights};
use crate::ocel::ocel_json::{export_ocel_json_path, import_ocel_json_from_path};
use crate::table::csv_export::export_table_path;
use crate::table::csv_import::{import_table_path, CsvImportOptions};
use crate::{flatten_ocel_to_table, select_primary_type};

const CSV: &str = "case_id,activity,timestamp,resource,cost\n\
    c1,register,2023-10-06 09:00:00,alice,10\n\
    c1,approve,2023-10-06 12:00:00,bob,20\n\
    c2,register,2023-10-06 10:00:00,alice,30\n\
    ,register,2023-10-06 11:00:00,carol,40\n";

#[test]
fn test_full_file_pipeline_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("input.csv");
    std::fs::write(&csv_path, CSV).unwrap();

    // CSV -> XES
    let table = import_table_path(&csv_path, &CsvImportOptions::default()).unwrap();
    let log = table_to_log(&table, &TableConversionOptions::default()).unwrap();
    let xes_path = dir.path().join("converted.xes");
    export_xes_path(&log, &xes_path).unwrap();

    // XES -> OCEL
    let log = import_xes_path(&xes_path, XESImportOptions::default()).unwrap();
    let ocel = log_to_ocel(&log, &SynthesisOptions::default());
    let ocel_path = dir.path().join("converted.json");
    export_ocel_json_path(&ocel, &ocel_path).unwrap();

    // OCEL -> CSV
    let ocel = import_ocel_json_from_path(&ocel_path).unwrap();
    let primary = select_primary_type(&ocel).unwrap();
    let roundtrip = flatten_ocel_to_table(&ocel, &primary);
    let roundtrip_path = dir.path().join("roundtrip.csv");
    export_table_path(&roundtrip, &roundtrip_path).unwrap();

    // event and case counts survive the whole trip
    let roundtrip = import_table_path(&roundtrip_path, &CsvImportOptions::default()).unwrap();
    assert_eq!(roundtrip.rows.len(), table.rows.len());
    let report =
        quantify_roundtrip(&table, &roundtrip, None, RoundTripWeights::default()).unwrap();
    assert_eq!(report.original_metrics.num_events, 4);
    assert_eq!(report.roundtrip_metrics.num_events, 4);
    assert_eq!(
        report.original_metrics.num_cases,
        report.roundtrip_metrics.num_cases
    );
    assert!((report.preservation.event_preservation - 1.0).abs() < 1e-9);
    assert!(report.overall_score > 0.0 && report.overall_score <= 1.0);
}

#[test]
fn test_gzipped_xes_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("input.csv");
    std::fs::write(&csv_path, CSV).unwrap();
    let table = import_table_path(&csv_path, &CsvImportOptions::default()).unwrap();
    let log = table_to_log(&table, &TableConversionOptions::default()).unwrap();

    let gz_path = dir.path().join("converted.xes.gz");
    export_xes_path(&log, &gz_path).unwrap();
    let imported = import_xes_path(&gz_path, XESImportOptions::default()).unwrap();
    assert_eq!(imported.traces, log.traces);
}
