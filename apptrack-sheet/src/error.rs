/// A failure affecting the spreadsheet as a whole.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The filename does not end in a supported extension
    #[error("unsupported file format {0:?}, expected .xlsx or .xls")]
    UnsupportedFormat(String),
    /// The workbook has no worksheet to read
    #[error("workbook contains no worksheet")]
    NoWorksheet,
    /// The `.xlsx` container could not be read
    #[error("failed to read xlsx: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    /// The `.xls` container could not be read
    #[error("failed to read xls: {0}")]
    Xls(#[from] calamine::XlsError),
    /// The output workbook could not be written
    #[error("failed to write xlsx: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

/// A single spreadsheet row that could not be decoded. The row is dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    /// A cell holds a spreadsheet error value such as `#DIV/0!`
    #[error("row {row}, column {column}: cell holds error value {detail}")]
    ErrorCell {
        /// 1-based row number
        row: usize,
        /// 0-based column index
        column: usize,
        /// The error value as displayed
        detail: String,
    },
    /// A date cell holds a serial number outside the representable range
    #[error("row {row}, column {column}: date serial {serial} is out of range")]
    DateOutOfRange {
        /// 1-based row number
        row: usize,
        /// 0-based column index
        column: usize,
        /// The offending serial number
        serial: f64,
    },
}
