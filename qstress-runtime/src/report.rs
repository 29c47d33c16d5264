//! CSV result reporting
use qstress_core::{QueryTemplate, ResultRecord};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use thiserror::Error;
#[allow(unused)]
use tracing::{debug, info};

const HEADER: [&str; 5] = ["ExecutionTimeMs", "ThreadId", "Timestamp", "IsError", "ErrorMessage"];
const HEADER_WITH_ID: [&str; 6] = [
    "ExecutionTimeMs",
    "ID",
    "ThreadId",
    "Timestamp",
    "IsError",
    "ErrorMessage",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("Unable to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Write `records` as CSV, oldest attempt first.
///
/// The `ID` column is only present when `template` has placeholders.
pub fn write_csv<W>(
    records: &[ResultRecord],
    template: &QueryTemplate,
    writer: W,
) -> Result<(), ReportError>
where
    W: io::Write,
{
    let with_id = template.has_placeholders();
    let mut wtr = csv::Writer::from_writer(writer);

    if with_id {
        wtr.write_record(HEADER_WITH_ID)?;
    } else {
        wtr.write_record(HEADER)?;
    }

    let mut sorted: Vec<&ResultRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.timestamp);

    for record in sorted {
        let mut row = Vec::with_capacity(6);
        row.push(format!("{:.3}", record.execution_time_ms));
        if with_id {
            row.push(record.parameter_value.to_string());
        }
        row.push(record.worker_id.to_string());
        row.push(record.formatted_timestamp()?);
        row.push(if record.is_error() { "True" } else { "False" }.to_string());
        row.push(record.error_message().unwrap_or_default().to_string());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `records` to `path`, creating any missing parent directories.
pub fn save_results(
    records: &[ResultRecord],
    template: &QueryTemplate,
    path: &Path,
) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    write_csv(records, template, io::BufWriter::new(file))?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
