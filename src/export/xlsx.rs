//! Spreadsheet output.
//!
//! A single record becomes a sheet with the kind's field names as the header
//! row and the values in row 2. Batches get one sheet per declared kind, with
//! leading `source`, `status` and `error` columns so that every submitted
//! document keeps its row even when extraction failed.

use crate::error::{Error, Result};
use crate::extract::Extraction;
use crate::model::{Document, DocumentKind, StructuredRecord};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

/// Header of the column naming each batch row's input document.
pub const SOURCE_COLUMN: &str = "source";

/// Header of the column holding `ok` or `failed` for each batch row.
pub const STATUS_COLUMN: &str = "status";

/// Header of the column holding a failed row's `[code] message`.
pub const ERROR_COLUMN: &str = "error";

const STATUS_OK: &str = "ok";
const STATUS_FAILED: &str = "failed";

/// Excel's cell text limit, in UTF-16 code units.
const MAX_CELL_LEN: usize = 32_767;

const MIN_COLUMN_WIDTH: f64 = 12.0;
const MAX_COLUMN_WIDTH: f64 = 60.0;

/// Render one record as an xlsx workbook.
pub fn to_xlsx(record: &StructuredRecord) -> Result<Vec<u8>> {
    let mut workbook = record_workbook(record)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write one record to an xlsx file.
pub fn write_xlsx<P: AsRef<Path>>(record: &StructuredRecord, path: P) -> Result<()> {
    let mut workbook = record_workbook(record)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

/// Render batch results as an xlsx workbook.
///
/// `results` must be the output of `Extractor::extract_batch(docs)`, one
/// result per document in the same order.
pub fn batch_to_xlsx(docs: &[Document], results: &[Result<Extraction>]) -> Result<Vec<u8>> {
    let mut workbook = batch_workbook(docs, results)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write batch results to an xlsx file.
pub fn write_batch_xlsx<P: AsRef<Path>>(
    docs: &[Document],
    results: &[Result<Extraction>],
    path: P,
) -> Result<()> {
    let mut workbook = batch_workbook(docs, results)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

fn record_workbook(record: &StructuredRecord) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(record.kind().as_str())?;

    let values: Vec<&str> = record.values().iter().map(String::as_str).collect();
    write_header(worksheet, record.fields().iter().copied(), &header)?;
    write_row(worksheet, 1, &values)?;
    fit_columns(worksheet, record.fields(), &[values])?;

    Ok(workbook)
}

fn batch_workbook(docs: &[Document], results: &[Result<Extraction>]) -> Result<Workbook> {
    if docs.len() != results.len() {
        return Err(Error::Export(format!(
            "batch has {} documents but {} results",
            docs.len(),
            results.len()
        )));
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for kind in DocumentKind::ALL {
        let rows: Vec<Vec<String>> = docs
            .iter()
            .zip(results)
            .enumerate()
            .filter(|(_, (doc, _))| doc.kind == kind)
            .map(|(i, (doc, result))| batch_row(i, doc, result))
            .collect();
        if rows.is_empty() {
            continue;
        }

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(kind.as_str())?;

        let columns: Vec<&str> = [SOURCE_COLUMN, STATUS_COLUMN, ERROR_COLUMN]
            .into_iter()
            .chain(kind.fields().iter().copied())
            .collect();
        let rows: Vec<Vec<&str>> = rows
            .iter()
            .map(|row| row.iter().map(String::as_str).collect())
            .collect();

        write_header(worksheet, columns.iter().copied(), &header)?;
        for (i, row) in rows.iter().enumerate() {
            write_row(worksheet, i as u32 + 1, row)?;
        }
        fit_columns(worksheet, &columns, &rows)?;
    }

    // An empty workbook is not a valid xlsx file.
    if workbook.worksheets_mut().is_empty() {
        workbook.add_worksheet();
    }

    Ok(workbook)
}

/// Source, status, error, then the record values (empty when failed).
fn batch_row(index: usize, doc: &Document, result: &Result<Extraction>) -> Vec<String> {
    let source = doc
        .name
        .clone()
        .unwrap_or_else(|| format!("document {}", index + 1));

    match result {
        Ok(extraction) => {
            let mut row = vec![source, STATUS_OK.to_string(), String::new()];
            row.extend(extraction.record.values().iter().cloned());
            row
        }
        Err(err) => {
            let mut row = vec![
                source,
                STATUS_FAILED.to_string(),
                format!("[{}] {}", err.code(), err),
            ];
            row.resize(3 + doc.kind.fields().len(), String::new());
            row
        }
    }
}

fn write_header<'a>(
    worksheet: &mut Worksheet,
    columns: impl Iterator<Item = &'a str>,
    format: &Format,
) -> std::result::Result<(), XlsxError> {
    for (col, name) in columns.enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, format)?;
    }
    Ok(())
}

fn write_row(worksheet: &mut Worksheet, row: u32, values: &[&str]) -> std::result::Result<(), XlsxError> {
    for (col, value) in values.iter().enumerate() {
        worksheet.write_string(row, col as u16, sanitize_cell(value))?;
    }
    Ok(())
}

fn fit_columns(
    worksheet: &mut Worksheet,
    columns: &[&str],
    rows: &[Vec<&str>],
) -> std::result::Result<(), XlsxError> {
    for (col, name) in columns.iter().enumerate() {
        let widest = rows
            .iter()
            .filter_map(|row| row.get(col))
            .flat_map(|value| value.lines())
            .map(|line| line.chars().count())
            .chain(std::iter::once(name.len()))
            .max()
            .unwrap_or(0);
        let width = (widest as f64 + 2.0).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet.set_column_width(col as u16, width)?;
    }
    Ok(())
}

/// Drop control characters that are not allowed in XML cell text and cut
/// the result to Excel's cell length limit.
fn sanitize_cell(value: &str) -> String {
    let mut out = String::with_capacity(value.len().min(MAX_CELL_LEN));
    let mut units = 0;
    for c in value
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
    {
        units += c.len_utf16();
        if units > MAX_CELL_LEN {
            log::warn!("cell text truncated to {} characters", MAX_CELL_LEN);
            break;
        }
        out.push(c);
    }
    out
}
