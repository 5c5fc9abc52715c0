use crate::{
    SheetError,
    columns::{self, DAYS_SUFFIX, HEADERS, WIDTH},
    compensation, date, timeline,
};
use apptrack_core::models::{CompanyGroup, RecordView};
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook};

const SHEET_NAME: &str = "投递记录";

/// Flatten one record into the exchange columns.
pub fn encode_row(view: &RecordView) -> [String; WIDTH] {
    let data = &view.submission.data;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut row: [String; WIDTH] = Default::default();
    row[columns::EMPLOYER] = data.employer.clone();
    row[columns::POSITION] = data.position.clone();
    row[columns::LOCATION] = text(&data.location);
    row[columns::APPLY_TIME] = data
        .apply_time
        .map(date::format_timestamp)
        .unwrap_or_default();
    row[columns::STATUS] = text(&data.current_status);
    row[columns::STATUS_DATE] = data
        .current_status_date
        .map(date::format_timestamp)
        .unwrap_or_default();
    row[columns::OUTCOME] = data
        .outcome
        .as_ref()
        .map(|outcome| outcome.label().to_owned())
        .unwrap_or_default();
    row[columns::POOL_DAYS] = format!("{}{DAYS_SUFFIX}", view.pool_days.unwrap_or(0));
    row[columns::COMPENSATION] = data
        .compensation
        .as_ref()
        .map(compensation::render)
        .unwrap_or_default();
    row[columns::TIMELINE] = timeline::render(data);
    row[columns::REMARKS] = text(&data.remarks);
    row[columns::URL] = text(&data.url);
    row
}

/// Write records, one row each, as an `.xlsx` workbook.
pub fn write_records<'a>(
    records: impl IntoIterator<Item = &'a RecordView>,
) -> Result<Vec<u8>, SheetError> {
    write_rows(records.into_iter().map(encode_row))
}

/// Write company groups as an `.xlsx` workbook, fanning each group out into
/// one row per position.
pub fn write_groups(groups: &[CompanyGroup]) -> Result<Vec<u8>, SheetError> {
    write_records(groups.iter().flat_map(|group| group.positions.iter()))
}

fn write_rows(rows: impl Iterator<Item = [String; WIDTH]>) -> Result<Vec<u8>, SheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9D9D9))
        .set_pattern(FormatPattern::Solid);
    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    let mut count = 0u32;
    for (index, row) in rows.enumerate() {
        let line = index as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                worksheet.write_string(line, col as u16, cell)?;
            }
        }
        count += 1;
    }
    worksheet.autofit();

    tracing::debug!(rows = count, "encoded spreadsheet");
    Ok(workbook.save_to_buffer()?)
}
