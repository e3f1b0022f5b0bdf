// Tabular File Scan Operator
//
// This module implements a scan over a delimited text file whose first
// record is a header. Requested columns are resolved against the header
// once at open time and projected out of every following record.

use std::fs::File;
use std::path::PathBuf;

use csv::{Reader, StringRecord};
use log::{debug, trace};

use crate::config::CsvScanConfig;
use crate::query::executor::operators::{Operator, OperatorState};
use crate::query::executor::result::{QueryError, QueryResult, Row};

const OPERATOR_NAME: &str = "CsvScan";

/// A scan operator that streams rows out of a CSV file
pub struct CsvScanOperator {
    /// File to scan
    path: PathBuf,
    /// Requested columns, as the caller spelled them
    columns: Vec<String>,
    /// Record reader settings
    config: CsvScanConfig,

    /// Open reader, present between open and close
    reader: Option<Reader<File>>,
    /// Source offset of each requested column, resolved during open
    column_index: Vec<usize>,
    /// Reused record buffer
    record: StringRecord,
    /// Records read after the header, for error messages
    records_read: u64,

    state: OperatorState,
}

impl CsvScanOperator {
    /// Create a new scan with the default reader settings
    pub fn new(path: impl Into<PathBuf>, columns: Vec<String>) -> Self {
        Self::with_config(path, columns, CsvScanConfig::default())
    }

    pub fn with_config(path: impl Into<PathBuf>, columns: Vec<String>, config: CsvScanConfig) -> Self {
        CsvScanOperator {
            path: path.into(),
            columns,
            config,
            reader: None,
            column_index: Vec::new(),
            record: StringRecord::new(),
            records_read: 0,
            state: OperatorState::default(),
        }
    }

    /// Resolve every requested column to its offset in the header.
    ///
    /// Header fields are ASCII-lowercased; requested names are matched
    /// case-insensitively by a linear search, first match wins.
    fn resolve_columns(&self, header: &StringRecord) -> QueryResult<Vec<usize>> {
        let header_fields: Vec<String> = header.iter().map(|f| f.to_ascii_lowercase()).collect();

        self.columns
            .iter()
            .map(|column| {
                let wanted = column.to_ascii_lowercase();
                header_fields
                    .iter()
                    .position(|field| *field == wanted)
                    .ok_or_else(|| {
                        QueryError::SchemaError(format!(
                            "column '{}' not found in header of {}",
                            column,
                            self.path.display()
                        ))
                    })
            })
            .collect()
    }

    fn reset(&mut self) {
        self.reader = None;
        self.column_index.clear();
        self.record.clear();
        self.records_read = 0;
    }
}

impl Operator for CsvScanOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.state.check_open(OPERATOR_NAME)?;

        if self.columns.is_empty() {
            return Err(QueryError::InvalidOperation(format!(
                "scan of {} requests no columns",
                self.path.display()
            )));
        }

        let file = File::open(&self.path).map_err(|e| {
            QueryError::ResourceError(format!("could not open {}: {}", self.path.display(), e))
        })?;
        let mut reader = self.config.reader_builder().from_reader(file);

        let mut header = StringRecord::new();
        let has_header = reader.read_record(&mut header).map_err(|e| {
            QueryError::StreamError(format!("failed to read header of {}: {}", self.path.display(), e))
        })?;
        if !has_header {
            return Err(QueryError::SchemaError(format!(
                "{} has no header record",
                self.path.display()
            )));
        }

        self.column_index = self.resolve_columns(&header)?;
        self.reader = Some(reader);
        self.records_read = 0;
        self.state.mark_opened();

        debug!(
            "{} opened {} with columns {:?} at offsets {:?}",
            OPERATOR_NAME,
            self.path.display(),
            self.columns,
            self.column_index
        );
        Ok(())
    }

    fn next(&mut self) -> QueryResult<Option<Row>> {
        if !self.state.check_pull(OPERATOR_NAME)? {
            return Ok(None);
        }

        let reader = self.reader.as_mut().ok_or_else(|| {
            QueryError::InvalidOperation(format!("{} has no open reader", OPERATOR_NAME))
        })?;

        let has_record = reader.read_record(&mut self.record).map_err(|e| {
            QueryError::StreamError(format!(
                "failed to read record {} of {}: {}",
                self.records_read + 1,
                self.path.display(),
                e
            ))
        })?;

        if !has_record {
            debug!("{} exhausted {} after {} records", OPERATOR_NAME, self.path.display(), self.records_read);
            self.state.exhaust();
            return Ok(None);
        }
        self.records_read += 1;

        let mut row = Row::new();
        for (column, &offset) in self.columns.iter().zip(&self.column_index) {
            let value = self.record.get(offset).ok_or_else(|| {
                QueryError::StreamError(format!(
                    "record {} of {} has {} fields, column '{}' is at offset {}",
                    self.records_read,
                    self.path.display(),
                    self.record.len(),
                    column,
                    offset
                ))
            })?;
            row.set(column.clone(), value.to_string());
        }

        trace!("{} row {}: {}", OPERATOR_NAME, self.records_read, row);
        Ok(Some(row))
    }

    fn close(&mut self) -> QueryResult<()> {
        self.state.begin_close(OPERATOR_NAME)?;
        self.reset();
        debug!("{} closed {}", OPERATOR_NAME, self.path.display());
        Ok(())
    }
}
