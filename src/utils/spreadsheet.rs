//! Spreadsheet boundary: workbook bytes in, raw rows out; records in,
//! workbook bytes out.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::model::employee::Employee;
use crate::utils::date_parser::serial_to_date;
use crate::utils::normalizer::{RawRow, RawValue};

/// Upload extensions accepted by the import endpoint.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

pub const EXPORT_HEADERS: &[&str] = &[
    "id",
    "emp_code",
    "name",
    "division",
    "designation",
    "hq",
    "resigned_date",
    "vacancy",
    "remarks",
];

pub fn is_spreadsheet_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|a| a.eq_ignore_ascii_case(ext))
        })
}

fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Float(f) => RawValue::Number(*f),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTime(dt) => serial_to_date(dt.as_f64())
            .map(RawValue::Date)
            .unwrap_or(RawValue::Number(dt.as_f64())),
    }
}

/// Decode the first sheet of a workbook. The first row supplies headers;
/// columns with a blank header and rows with no content are skipped.
pub fn decode_workbook(bytes: Vec<u8>) -> Result<Vec<RawRow>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("Failed to open spreadsheet")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Spreadsheet has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let mut out = Vec::new();
    for row in rows {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        let mut raw = RawRow::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            raw.insert(header.clone(), cell_value(cell));
        }
        // Short rows still carry every header, like a default-valued export.
        for header in headers.iter().skip(row.len()).filter(|h| !h.is_empty()) {
            raw.insert(header.clone(), RawValue::Empty);
        }
        out.push(raw);
    }

    Ok(out)
}

/// One sheet, one row per record, columns in record order.
pub fn export_workbook(records: &[Employee], sheet_name: &str) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, name) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }

    for (idx, e) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_number(row, 0, e.id as f64)?;
        if let Some(code) = &e.emp_code {
            worksheet.write_string(row, 1, code)?;
        }
        worksheet.write_string(row, 2, &e.name)?;
        worksheet.write_string(row, 3, &e.division)?;
        worksheet.write_string(row, 4, &e.designation)?;
        worksheet.write_string(row, 5, &e.hq)?;
        if let Some(d) = e.resigned_date {
            worksheet.write_string(row, 6, d.format("%Y-%m-%d").to_string())?;
        }
        worksheet.write_string(row, 7, &e.vacancy)?;
        worksheet.write_string(row, 8, &e.remarks)?;
    }

    workbook.save_to_buffer()
}
