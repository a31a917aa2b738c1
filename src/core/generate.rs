//! Batch generation driver.
//!
//! Streams device records from the inventory and materializes one bundle per
//! record, collecting per-record outcomes without aborting the batch. Only a
//! missing input file is fatal.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::ingest::{ColumnMode, RowIngestor};
use crate::materialize::Materializer;

/// Full result of one generation run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReport {
    pub input: String,
    pub output_root: String,
    pub column_mode: ColumnMode,
    pub results: Vec<RecordOutcome>,
    pub summary: BatchSummary,
}

/// Outcome for a single inventory row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Process the inventory at `input`, materializing a bundle per device.
///
/// Per-record failures are recorded and skipped; the batch always runs to
/// the end of the input. The caller decides the exit status from the
/// summary counts.
pub fn run(input: &Path, materializer: &mut Materializer) -> Result<GenerateReport> {
    let file = File::open(input).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::input_not_found(input)
        } else {
            Error::internal_io(e.to_string(), Some(format!("open {}", input.display())))
        }
    })?;

    let ingestor = RowIngestor::new(BufReader::new(file), materializer.profile())?;
    let column_mode = ingestor.mode();

    let mut results = Vec::new();
    let mut row = 0;

    for item in ingestor {
        row += 1;
        match item {
            Ok(record) => match materializer.materialize(&record) {
                Ok(bundle) => results.push(RecordOutcome {
                    row: record.row_number,
                    ip: Some(record.ip),
                    bundle_path: Some(bundle.dir.display().to_string()),
                    error: None,
                }),
                Err(err) => {
                    log_status!(
                        "generate",
                        "Failed to create configuration for host {}: {}",
                        record.ip,
                        err
                    );
                    results.push(RecordOutcome {
                        row: record.row_number,
                        ip: Some(record.ip),
                        bundle_path: None,
                        error: Some(err.to_string()),
                    });
                }
            },
            Err(err) => {
                log_status!("generate", "Skipped row: {}", err);
                results.push(RecordOutcome {
                    row,
                    ip: None,
                    bundle_path: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    let succeeded = results.iter().filter(|r| r.error.is_none()).count();
    let summary = BatchSummary {
        total: results.len(),
        succeeded,
        failed: results.len() - succeeded,
    };

    log_status!(
        "generate",
        "Processed {} devices, created {} configurations in {}",
        summary.total,
        summary.succeeded,
        materializer.hosts_root().display()
    );

    Ok(GenerateReport {
        input: input.display().to_string(),
        output_root: materializer.hosts_root().display().to_string(),
        column_mode,
        results,
        summary,
    })
}
