use serde::Serialize;
use std::path::Path;

use crate::errors::Result;
use crate::timetable::Timetable;

/// Column headers of the exported sheet
pub const EXPORT_HEADERS: [&str; 3] = ["Day", "Time", "Subject"];

/// One flattened (day, slot) cell of a timetable
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRow {
    pub day: String,
    pub time: String,
    pub subject: String,
}

/// Flatten a timetable into rows
///
/// Rows come out day-major, then slot-minor, following the grid's own day
/// and slot order, and include empty cells.
pub fn timetable_rows(timetable: &Timetable) -> Vec<ExportRow> {
    timetable
        .schedule()
        .into_iter()
        .flat_map(|day| {
            let name = day.day;
            day.slots.into_iter().map(move |entry| ExportRow {
                day: name.clone(),
                time: entry.time,
                subject: entry.subject,
            })
        })
        .collect()
}

/// Convert a timetable to XLSX format
///
/// Writes a header row followed by one row per (day, slot) cell into a single
/// worksheet named `sheet_name`.
///
/// # Arguments
/// * `timetable` - Reference to the generated timetable
/// * `sheet_name` - Name of the only worksheet
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes or an error
pub fn to_xlsx(timetable: &Timetable, sheet_name: &str) -> Result<Vec<u8>> {
    use rust_xlsxwriter::{Format, Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(sheet_name)?;

    let bold = Format::new().set_bold();
    for (c, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, c as u16, *header, &bold)?;
    }

    for (r, row) in timetable_rows(timetable).iter().enumerate() {
        let r = (r + 1) as u32;
        worksheet.write_string(r, 0, &row.day)?;
        worksheet.write_string(r, 1, &row.time)?;
        worksheet.write_string(r, 2, &row.subject)?;
    }

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

/// Write the XLSX export of `timetable` to `path`
pub fn save_xlsx(timetable: &Timetable, sheet_name: &str, path: impl AsRef<Path>) -> Result<()> {
    let buffer = to_xlsx(timetable, sheet_name)?;
    std::fs::write(path, buffer)?;
    Ok(())
}

/// Convert a timetable to CSV format
///
/// Same table as `to_xlsx`. Values containing commas, quotes or newlines are
/// quoted.
pub fn to_csv(timetable: &Timetable) -> String {
    let mut csv_content = EXPORT_HEADERS.join(",");
    csv_content.push('\n');

    for row in timetable_rows(timetable) {
        let fields = [row.day, row.time, row.subject];
        let line: Vec<String> = fields.iter().map(|v| escape_csv(v)).collect();
        csv_content.push_str(&line.join(","));
        csv_content.push('\n');
    }

    csv_content
}

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
