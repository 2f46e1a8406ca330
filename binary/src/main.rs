//! Command-line interface over the `log_fidelity` converters and quantifiers
//!
//! One subcommand per conversion direction plus the three quantifiers.
//! Quantifier output is rendered as a human-readable report by default and
//! as JSON with `--json`.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use log_fidelity::conversion::synthesize::SynthesisOptions;
use log_fidelity::conversion::table_to_log::TableConversionOptions;
use log_fidelity::event_log::import_xes::{import_xes_path, XESImportOptions};
use log_fidelity::fidelity::cross::{ForwardWeights, ReverseWeights};
use log_fidelity::fidelity::roundtrip::RoundTripWeights;
use log_fidelity::metrics::log_metrics::log_metrics;
use log_fidelity::metrics::ocel_metrics::ocel_metrics;
use log_fidelity::ocel::ocel_json::{export_ocel_json_path, import_ocel_json_from_path};
use log_fidelity::table::csv_export::export_table_path;
use log_fidelity::table::csv_import::{import_table_path, CsvImportOptions};
use log_fidelity::{
    flatten_ocel_to_log, flatten_ocel_to_table, log_to_ocel, quantify_log_to_ocel,
    quantify_ocel_to_log, quantify_roundtrip, select_primary_type, table_to_log, OCEL,
};

#[derive(Parser)]
#[command(name = "log_fidelity")]
#[command(version, about = "Convert event logs between flat and object-centric formats and quantify conversion fidelity")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a flat CSV log to XES
    CsvToXes {
        /// Input CSV file (requires activity and timestamp columns)
        input: PathBuf,
        /// Output XES file (gzipped if the extension is .gz)
        output: PathBuf,
        /// Custom timestamp format tried before the built-in fallbacks
        #[arg(long)]
        date_format: Option<String>,
        /// CSV field delimiter
        #[arg(long, default_value = ",")]
        delimiter: char,
    },
    /// Convert a flat XES log to an OCEL 2.0 JSON log
    XesToOcel {
        /// Input XES file (plain or .gz)
        input: PathBuf,
        /// Output OCEL 2.0 JSON file
        output: PathBuf,
    },
    /// Flatten an OCEL 2.0 JSON log to XES on its primary object type
    OcelToXes {
        /// Input OCEL 2.0 JSON file
        input: PathBuf,
        /// Output XES file (gzipped if the extension is .gz)
        output: PathBuf,
        /// Object type to flatten on (defaults to the most connected type)
        #[arg(long)]
        object_type: Option<String>,
    },
    /// Flatten an OCEL 2.0 JSON log to a flat CSV log
    OcelToCsv {
        /// Input OCEL 2.0 JSON file
        input: PathBuf,
        /// Output CSV file
        output: PathBuf,
        /// Object type to flatten on (defaults to the most connected type)
        #[arg(long)]
        object_type: Option<String>,
    },
    /// Score a CSV round trip through the object-centric representation
    Roundtrip {
        /// Original CSV file
        original: PathBuf,
        /// Round-trip CSV file (or omit to run the round trip in memory)
        roundtrip: Option<PathBuf>,
        /// Custom timestamp format tried before the built-in fallbacks
        #[arg(long)]
        date_format: Option<String>,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Score a flat-XES-to-OCEL conversion from both files
    QuantifyForward {
        /// Flat XES file the conversion started from
        xes: PathBuf,
        /// OCEL 2.0 JSON file the conversion produced
        ocel: PathBuf,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Score an OCEL-to-flat-XES conversion from both files
    QuantifyReverse {
        /// OCEL 2.0 JSON file the conversion started from
        ocel: PathBuf,
        /// Flat XES file the conversion produced
        xes: PathBuf,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn primary_type_of(ocel: &OCEL, requested: Option<String>) -> Result<String, Box<dyn Error>> {
    match requested.or_else(|| select_primary_type(ocel)) {
        Some(object_type) => Ok(object_type),
        None => Err("log has no E2O relationships; pass --object-type explicitly".into()),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::CsvToXes {
            input,
            output,
            date_format,
            delimiter,
        } => {
            let table = import_table_path(
                &input,
                &CsvImportOptions {
                    delimiter: delimiter as u8,
                },
            )?;
            let log = table_to_log(&table, &TableConversionOptions { date_format })?;
            log_fidelity::event_log::export_xes::export_xes_path(&log, &output)?;
            println!(
                "Converted {} rows into {} traces: {}",
                table.rows.len(),
                log.traces.len(),
                output.display()
            );
        }
        Commands::XesToOcel { input, output } => {
            let log = import_xes_path(&input, XESImportOptions::default())?;
            let ocel = log_to_ocel(&log, &SynthesisOptions::default());
            export_ocel_json_path(&ocel, &output)?;
            println!(
                "Converted {} traces into {} events and {} objects: {}",
                log.traces.len(),
                ocel.events.len(),
                ocel.objects.len(),
                output.display()
            );
        }
        Commands::OcelToXes {
            input,
            output,
            object_type,
        } => {
            let ocel = import_ocel_json_from_path(&input)?;
            let object_type = primary_type_of(&ocel, object_type)?;
            let log = flatten_ocel_to_log(&ocel, &object_type);
            log_fidelity::event_log::export_xes::export_xes_path(&log, &output)?;
            println!(
                "Flattened {} events on object type '{}' into {} traces: {}",
                ocel.events.len(),
                object_type,
                log.traces.len(),
                output.display()
            );
        }
        Commands::OcelToCsv {
            input,
            output,
            object_type,
        } => {
            let ocel = import_ocel_json_from_path(&input)?;
            let object_type = primary_type_of(&ocel, object_type)?;
            let table = flatten_ocel_to_table(&ocel, &object_type);
            export_table_path(&table, &output)?;
            println!(
                "Flattened {} events on object type '{}' into {} rows: {}",
                ocel.events.len(),
                object_type,
                table.rows.len(),
                output.display()
            );
        }
        Commands::Roundtrip {
            original,
            roundtrip,
            date_format,
            json,
        } => {
            let original = import_table_path(&original, &CsvImportOptions::default())?;
            let roundtrip = match roundtrip {
                Some(path) => import_table_path(&path, &CsvImportOptions::default())?,
                None => {
                    let log = table_to_log(
                        &original,
                        &TableConversionOptions {
                            date_format: date_format.clone(),
                        },
                    )?;
                    let ocel = log_to_ocel(&log, &SynthesisOptions::default());
                    let object_type = primary_type_of(&ocel, None)?;
                    flatten_ocel_to_table(&ocel, &object_type)
                }
            };
            let report = quantify_roundtrip(
                &original,
                &roundtrip,
                date_format.as_deref(),
                RoundTripWeights::default(),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
        Commands::QuantifyForward { xes, ocel, json } => {
            let log = import_xes_path(&xes, XESImportOptions::default())?;
            let ocel = import_ocel_json_from_path(&ocel)?;
            let report = quantify_log_to_ocel(
                &log_metrics(&log)?,
                &ocel_metrics(&ocel),
                ForwardWeights::default(),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
        Commands::QuantifyReverse { ocel, xes, json } => {
            let ocel = import_ocel_json_from_path(&ocel)?;
            let log = import_xes_path(&xes, XESImportOptions::default())?;
            let report = quantify_ocel_to_log(
                &ocel_metrics(&ocel),
                &log_metrics(&log)?,
                ReverseWeights::default(),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
