//! Inventory row ingestion.
//!
//! Reads the tabular device inventory, resolves column positions from the
//! header row (falling back to fixed indices when the header is absent or
//! unrecognizable), pads short rows, and yields device records lazily in a
//! single pass.

use std::io::BufRead;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::profile::Profile;
use crate::record::DeviceRecord;

// Fixed positional defaults, used for any field the header does not name.
const IP_IDX: usize = 0;
const HOSTNAME_IDX: usize = 1;
const DEVICE_CLASS_IDX: usize = 2;
const OS_INFO_IDX: usize = 3;
const MODEL_IDX: usize = 4;
const SCAN_DATE_IDX: usize = 5;
const USERNAME_IDX: usize = 6;

/// How column positions were decided for the current input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnMode {
    /// Positions resolved by name from a header row containing `ip`.
    Header,
    /// No recognizable header; fixed positions 0..6 and the first row is data.
    Positional,
}

/// Resolved column position for every known field.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    ip: usize,
    hostname: usize,
    device_class: usize,
    os_info: usize,
    model: usize,
    scan_date: usize,
    username: usize,
}

impl ColumnMap {
    fn positional() -> Self {
        Self {
            ip: IP_IDX,
            hostname: HOSTNAME_IDX,
            device_class: DEVICE_CLASS_IDX,
            os_info: OS_INFO_IDX,
            model: MODEL_IDX,
            scan_date: SCAN_DATE_IDX,
            username: USERNAME_IDX,
        }
    }

    /// Resolve positions by header name, keeping the positional default for
    /// any field the header does not mention.
    fn from_header(header: &[String], device_class_column: &str) -> Self {
        let find = |name: &str, fallback: usize| {
            header
                .iter()
                .position(|field| field.trim() == name)
                .unwrap_or(fallback)
        };

        Self {
            ip: find("ip", IP_IDX),
            hostname: find("hostname", HOSTNAME_IDX),
            device_class: find(device_class_column, DEVICE_CLASS_IDX),
            os_info: find("os_info", OS_INFO_IDX),
            model: find("model", MODEL_IDX),
            scan_date: find("scan_date", SCAN_DATE_IDX),
            username: find("username", USERNAME_IDX),
        }
    }

    fn max_index(&self) -> usize {
        [
            self.ip,
            self.hostname,
            self.device_class,
            self.os_info,
            self.model,
            self.scan_date,
            self.username,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Extract a record from a row already padded past `max_index`.
    fn extract(&self, row: &[String], row_number: usize) -> DeviceRecord {
        DeviceRecord {
            row_number,
            ip: row[self.ip].trim().to_string(),
            hostname: row[self.hostname].trim().to_string(),
            device_class: row[self.device_class].trim().to_string(),
            os_info: row[self.os_info].trim().to_string(),
            model: row[self.model].trim().to_string(),
            scan_date: row[self.scan_date].trim().to_string(),
            username: row[self.username].trim().to_string(),
        }
    }
}

/// Lazy, single-pass reader over the device inventory.
///
/// Yields one `DeviceRecord` per data row. Structural problems and rows
/// without an IP surface as per-row errors so the caller can skip them
/// without aborting the batch.
pub struct RowIngestor<R: BufRead> {
    lines: std::io::Lines<R>,
    columns: ColumnMap,
    mode: ColumnMode,
    // First row held back when it turned out to be data, not a header.
    pending: Option<String>,
    row_number: usize,
}

impl<R: BufRead> RowIngestor<R> {
    pub fn new(reader: R, profile: &Profile) -> Result<Self> {
        let mut lines = reader.lines();

        let first = lines
            .next()
            .transpose()
            .map_err(|e| Error::internal_io(e.to_string(), Some("read inventory".to_string())))?;

        let (columns, mode, pending) = match first {
            None => (ColumnMap::positional(), ColumnMode::Positional, None),
            Some(line) => match header_columns(&line, profile) {
                Some(columns) => (columns, ColumnMode::Header, None),
                None => {
                    log_status!(
                        "ingest",
                        "First row has no 'ip' column; falling back to positional columns"
                    );
                    (ColumnMap::positional(), ColumnMode::Positional, Some(line))
                }
            },
        };

        Ok(Self {
            lines,
            columns,
            mode,
            pending,
            row_number: 0,
        })
    }

    pub fn mode(&self) -> ColumnMode {
        self.mode
    }

    fn parse_row(&self, raw: &str, row_number: usize) -> Result<DeviceRecord> {
        let mut row = split_row(raw)
            .map_err(|problem| Error::record_malformed(row_number, raw, problem))?;

        // Pad short rows so positional extraction cannot run out of range.
        while row.len() <= self.columns.max_index() {
            row.push(String::new());
        }

        let record = self.columns.extract(&row, row_number);
        if record.ip.is_empty() {
            return Err(Error::record_missing_ip(row_number, raw));
        }

        Ok(record)
    }
}

impl<R: BufRead> Iterator for RowIngestor<R> {
    type Item = Result<DeviceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = match self.pending.take() {
            Some(line) => line,
            None => match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(Error::internal_io(
                        e.to_string(),
                        Some("read inventory".to_string()),
                    )))
                }
            },
        };

        self.row_number += 1;
        Some(self.parse_row(&raw, self.row_number))
    }
}

/// Interpret a first row as a header. Returns `None` when it cannot be one.
fn header_columns(line: &str, profile: &Profile) -> Option<ColumnMap> {
    let fields = split_row(line).ok()?;
    if !fields.iter().any(|field| field.trim() == "ip") {
        return None;
    }
    Some(ColumnMap::from_header(
        &fields,
        profile.kind.device_class_column(),
    ))
}

/// Split one comma-separated line into fields.
///
/// Fields may be double-quoted to carry embedded commas; a doubled quote
/// inside a quoted field is a literal quote. Embedded newlines are not
/// supported.
fn split_row(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
        } else {
            match ch {
                '"' if field.is_empty() => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(ch),
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }

    fields.push(field);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileKind;

    fn ingest(input: &str, profile: &Profile) -> (ColumnMode, Vec<Result<DeviceRecord>>) {
        let ingestor = RowIngestor::new(input.as_bytes(), profile).unwrap();
        let mode = ingestor.mode();
        (mode, ingestor.collect())
    }

    #[test]
    fn header_resolves_columns_by_name() {
        let input = "hostname,ip\npi-cam,10.0.0.5\n";
        let (mode, records) = ingest(input, &Profile::default());

        assert_eq!(mode, ColumnMode::Header);
        assert_eq!(records.len(), 1);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.ip, "10.0.0.5");
        assert_eq!(record.hostname, "pi-cam");
    }

    #[test]
    fn header_missing_field_uses_positional_default() {
        // No scan_date column in the header; index 5 still applies.
        let input = "ip,hostname\n10.0.0.5,cam,x,y,z,2025-05-15\n";
        let (_, records) = ingest(input, &Profile::default());

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.scan_date, "2025-05-15");
    }

    #[test]
    fn headerless_first_row_is_data() {
        let input = "10.0.0.9,,,,,\n";
        let (mode, records) = ingest(input, &Profile::default());

        assert_eq!(mode, ColumnMode::Positional);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap().ip, "10.0.0.9");
    }

    #[test]
    fn short_rows_are_padded() {
        let input = "ip,hostname\n10.0.0.5\n";
        let (_, records) = ingest(input, &Profile::default());

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.ip, "10.0.0.5");
        assert_eq!(record.hostname, "");
        assert_eq!(record.username, "");
    }

    #[test]
    fn fields_are_trimmed() {
        let input = "ip,hostname\n 10.0.0.5 , pi-cam \n";
        let (_, records) = ingest(input, &Profile::default());

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.ip, "10.0.0.5");
        assert_eq!(record.hostname, "pi-cam");
    }

    #[test]
    fn row_without_ip_yields_error() {
        let input = "ip,hostname\n,orphan\n10.0.0.6,ok\n";
        let (_, records) = ingest(input, &Profile::default());

        assert_eq!(records.len(), 2);
        let err = records[0].as_ref().unwrap_err();
        assert_eq!(err.code.as_str(), "record.missing_ip");
        assert_eq!(records[1].as_ref().unwrap().ip, "10.0.0.6");
    }

    #[test]
    fn unterminated_quote_yields_malformed_row() {
        let input = "ip,model\n10.0.0.5,\"Pi 4\n10.0.0.6,ok\n";
        let (_, records) = ingest(input, &Profile::default());

        let err = records[0].as_ref().unwrap_err();
        assert_eq!(err.code.as_str(), "record.malformed");
        assert_eq!(records[1].as_ref().unwrap().ip, "10.0.0.6");
    }

    #[test]
    fn quoted_field_keeps_embedded_comma() {
        let input = "ip,hostname,device_type,os_info,model\n10.0.0.5,cam,pi,linux,\"Pi 4, Model B\"\n";
        let (_, records) = ingest(input, &Profile::default());

        assert_eq!(records[0].as_ref().unwrap().model, "Pi 4, Model B");
    }

    #[test]
    fn raspberry_pi_profile_matches_its_header_column() {
        let input = "is_raspberry_pi,ip\ntrue,10.0.0.5\n";
        let (_, records) = ingest(input, &Profile::new(ProfileKind::RaspberryPi));

        assert_eq!(records[0].as_ref().unwrap().device_class, "true");
    }

    #[test]
    fn empty_input_yields_nothing() {
        let (mode, records) = ingest("", &Profile::default());

        assert_eq!(mode, ColumnMode::Positional);
        assert!(records.is_empty());
    }

    #[test]
    fn row_numbers_count_data_rows() {
        let input = "ip\n10.0.0.1\n10.0.0.2\n";
        let (_, records) = ingest(input, &Profile::default());

        assert_eq!(records[0].as_ref().unwrap().row_number, 1);
        assert_eq!(records[1].as_ref().unwrap().row_number, 2);
    }
}
