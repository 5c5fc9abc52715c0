use crate::{
    RowError, SheetError,
    columns::{self, DAYS_SUFFIX, WIDTH},
    compensation, date, timeline,
};
use apptrack_core::models::{ImportedRow, Outcome, SubmissionData};
use calamine::{Data, Range, Reader, Xls, Xlsx};
use std::io::{Cursor, Read, Seek};
use tracing::{Level, event};

/// The container formats accepted on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Office Open XML workbook
    Xlsx,
    /// Legacy BIFF workbook
    Xls,
}

impl SheetFormat {
    /// Pick the container format from a file name's extension.
    pub fn from_filename(name: &str) -> Result<Self, SheetError> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".xlsx") {
            Ok(Self::Xlsx)
        } else if lower.ends_with(".xls") {
            Ok(Self::Xls)
        } else {
            Err(SheetError::UnsupportedFormat(name.to_owned()))
        }
    }
}

/// The outcome of reading a spreadsheet.
#[derive(Debug, Default)]
pub struct Decoded {
    /// Decoded rows, in source order
    pub rows: Vec<ImportedRow>,
    /// Rows that were dropped because they could not be read
    pub failures: Vec<RowError>,
}

impl Decoded {
    /// Rows that were attempted: decoded plus failed. Rows skipped for
    /// lacking an employer or position are not counted.
    pub fn attempted(&self) -> usize {
        self.rows.len() + self.failures.len()
    }
}

/// Read the first worksheet of a workbook, skipping the header row.
///
/// `current_year` completes dates written without a year.
pub fn read(bytes: &[u8], filename: &str, current_year: i32) -> Result<Decoded, SheetError> {
    let range = match SheetFormat::from_filename(filename)? {
        SheetFormat::Xlsx => first_sheet(Xlsx::new(Cursor::new(bytes))?)?,
        SheetFormat::Xls => first_sheet(Xls::new(Cursor::new(bytes))?)?,
    };

    let mut decoded = Decoded::default();
    let Some((last, _)) = range.end() else {
        return Ok(decoded);
    };

    for row in 1..=last {
        match read_cells(&range, row) {
            Ok(cells) => {
                if let Some(imported) = decode_row(&cells, current_year) {
                    decoded.rows.push(imported);
                }
            }
            Err(error) => {
                event!(Level::WARN, %error, "dropping spreadsheet row");
                decoded.failures.push(error);
            }
        }
    }

    event!(
        Level::DEBUG,
        rows = decoded.rows.len(),
        failures = decoded.failures.len(),
        "decoded spreadsheet"
    );
    Ok(decoded)
}

fn first_sheet<RS, R>(mut workbook: R) -> Result<Range<Data>, SheetError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    SheetError: From<R::Error>,
{
    Ok(workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??)
}

fn read_cells(range: &Range<Data>, row: u32) -> Result<Vec<Option<String>>, RowError> {
    let number = row as usize + 1;
    (0..WIDTH)
        .map(|column| match range.get_value((row, column as u32)) {
            None => Ok(None),
            Some(value) => cell_text(value, number, column),
        })
        .collect()
}

fn cell_text(value: &Data, row: usize, column: usize) -> Result<Option<String>, RowError> {
    Ok(match value {
        Data::Empty => None,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            Some(text.clone())
        }
        Data::Int(number) => Some(number.to_string()),
        Data::Float(number) => Some(render_number(*number)),
        Data::Bool(flag) => Some(flag.to_string()),
        Data::DateTime(stamp) => {
            let serial = stamp.as_f64();
            let parsed = date::from_serial(serial).ok_or(RowError::DateOutOfRange {
                row,
                column,
                serial,
            })?;
            Some(date::format_timestamp(parsed))
        }
        Data::Error(error) => {
            return Err(RowError::ErrorCell {
                row,
                column,
                detail: error.to_string(),
            });
        }
    })
}

// Integral values print without a fractional part
fn render_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        (number as i64).to_string()
    } else {
        number.to_string()
    }
}

fn cell(cells: &[Option<String>], index: usize) -> Option<&str> {
    cells
        .get(index)?
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Decode one row of cell text.
///
/// Returns `None` when the employer or position is missing. Unparseable
/// fields are left empty rather than failing the row.
pub fn decode_row(cells: &[Option<String>], current_year: i32) -> Option<ImportedRow> {
    let employer = cell(cells, columns::EMPLOYER)?;
    let position = cell(cells, columns::POSITION)?;

    let text = |index| cell(cells, index).map(str::to_owned);
    let timestamp = |index| {
        let raw = cell(cells, index)?;
        let parsed = date::parse_flexible(raw, current_year);
        if parsed.is_none() {
            event!(Level::DEBUG, column = index, raw, "unreadable date");
        }
        parsed
    };

    let data = SubmissionData {
        employer: employer.to_owned(),
        position: position.to_owned(),
        location: text(columns::LOCATION),
        url: text(columns::URL),
        apply_time: timestamp(columns::APPLY_TIME),
        assessment_time: None,
        written_exam_time: None,
        current_status: text(columns::STATUS),
        current_status_date: timestamp(columns::STATUS_DATE),
        interviews: cell(cells, columns::TIMELINE)
            .map(timeline::parse)
            .unwrap_or_default(),
        outcome: cell(cells, columns::OUTCOME).map(Outcome::from_label),
        compensation: cell(cells, columns::COMPENSATION).and_then(compensation::classify),
        remarks: text(columns::REMARKS),
    };

    let pool_days = cell(cells, columns::POOL_DAYS)
        .filter(|raw| raw.contains(DAYS_SUFFIX))
        .and_then(|raw| raw.replace(DAYS_SUFFIX, "").trim().parse().ok());

    Some(ImportedRow { data, pool_days })
}
