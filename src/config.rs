// Scan Configuration
//
// Settings handed to the CSV record reader behind the tabular file scan.

use serde::{Deserialize, Serialize};

/// Record reader settings for a tabular file scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvScanConfig {
    /// Field delimiter
    pub delimiter: u8,

    /// Quote character
    pub quote: u8,

    /// Trim whitespace around every field, header included
    pub trim: bool,

    /// Accept records whose field count differs from the header.
    /// Offsets past the end of a short record are still a stream error.
    pub flexible: bool,
}

impl Default for CsvScanConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: false,
            flexible: false,
        }
    }
}

impl CsvScanConfig {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .flexible(self.flexible)
            .trim(if self.trim { csv::Trim::All } else { csv::Trim::None });
        builder
    }
}
