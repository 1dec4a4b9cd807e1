//! Price-list workbook parsing.
//!
//! Supplier price lists come as workbooks with one or more sheets. Each sheet
//! has some free-form heading rows, then a header row, then product rows
//! grouped under category rows (a row whose only populated cell is the group
//! name). The parser guesses the header row, tracks the current category and
//! collects a warning for every product row whose price cannot be read.

use std::{collections::BTreeMap, io::Cursor};

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::{
    error::{AppError, Result},
    models::{ParseResult, ParsedProductRow},
};

pub const UNCATEGORIZED: &str = "Sin categoría";

const CODE_COLUMN: usize = 0;
const NAME_COLUMN: usize = 1;
const PROVIDER_COLUMN: usize = 2;
const ORIGIN_COLUMN: usize = 3;
const PRICE_COLUMN: usize = 4;
const ALT_PRICE_COLUMN: usize = 5;
const MIN_HEADER_WIDTH: usize = 6;

const CODE_LABELS: [&str; 3] = ["unix", "codigo", "código"];
const PRICE_LABELS: [&str; 3] = ["u$s", "us$", "iva"];

/// A single spreadsheet cell, reduced to the shapes the parser cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

pub type Row = Vec<Cell>;

/// Outcome of parsing one sheet.
#[derive(Debug, Default)]
pub struct SheetParse {
    pub products: Vec<ParsedProductRow>,
    pub warnings: Vec<String>,
    pub by_categories: BTreeMap<String, usize>,
}

/// Parses an uploaded workbook (xlsx, xls, xlsb or ods) into a preview.
pub fn parse_workbook(bytes: &[u8]) -> Result<ParseResult> {
    let sheets = read_workbook(bytes)?;
    Ok(parse_sheets(sheets))
}

/// Reads every sheet of the workbook into rows of cells, trailing empty
/// cells removed.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<(String, Vec<Row>)>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
        tracing::warn!("Failed to open uploaded workbook: {}", e);
        AppError::BadRequest("Archivo Excel inválido o no compatible".to_string())
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            tracing::warn!("Failed to read sheet {}: {}", sheet_name, e);
            AppError::BadRequest("Archivo Excel inválido o no compatible".to_string())
        })?;

        let rows = range
            .rows()
            .map(|cells| trim_row(cells.iter().map(Cell::from).collect()))
            .collect();

        sheets.push((sheet_name, rows));
    }

    Ok(sheets)
}

/// Parses every sheet and merges the per-sheet results, keeping sheet order.
pub fn parse_sheets(sheets: Vec<(String, Vec<Row>)>) -> ParseResult {
    let mut result = ParseResult::default();

    for (sheet_name, rows) in sheets {
        tracing::info!("Parsing sheet {} ({} rows)", sheet_name, rows.len());
        let sheet = parse_sheet(&sheet_name, &rows);

        result.preview.extend(sheet.products);
        result.warnings.extend(sheet.warnings);
        for (category, count) in sheet.by_categories {
            *result.by_categories.entry(category).or_insert(0) += count;
        }
    }

    result.total_parsed = result.preview.len();
    result
}

pub fn parse_sheet(sheet_name: &str, rows: &[Row]) -> SheetParse {
    let Some(header_index) = rows.iter().position(|row| is_header_row(row)) else {
        return SheetParse {
            warnings: vec![format!(
                "Sheet \"{}\": No se detectó fila de encabezado válida.",
                sheet_name
            )],
            ..SheetParse::default()
        };
    };

    let mut sheet = SheetParse::default();
    let mut current_category = UNCATEGORIZED.to_string();

    for (index, row) in rows.iter().enumerate().skip(header_index + 1) {
        if row.iter().all(Cell::is_empty) {
            continue;
        }

        if let Some(category) = category_marker(row) {
            current_category = category;
            continue;
        }

        if let Some(product) = parse_product_row(
            row,
            sheet_name,
            index + 1,
            &current_category,
            &mut sheet.warnings,
        ) {
            *sheet
                .by_categories
                .entry(current_category.clone())
                .or_insert(0) += 1;
            sheet.products.push(product);
        }
    }

    sheet
}

fn is_header_row(row: &[Cell]) -> bool {
    if row.len() < MIN_HEADER_WIDTH {
        return false;
    }

    let code_label = row[CODE_COLUMN].to_text().to_lowercase();
    let price_cell = &row[PRICE_COLUMN];
    let price_label = price_cell.to_text().to_lowercase();

    CODE_LABELS.iter().any(|label| code_label.contains(label))
        && (matches!(price_cell, Cell::Number(_))
            || PRICE_LABELS.iter().any(|label| price_label.contains(label)))
}

/// Returns the category name when only the first cell holds text.
fn category_marker(row: &[Cell]) -> Option<String> {
    let Some(Cell::Text(first)) = row.first() else {
        return None;
    };

    let name = first.trim();
    if name.is_empty() || !row[1..].iter().all(Cell::is_empty) {
        return None;
    }

    Some(name.to_string())
}

fn parse_product_row(
    row: &[Cell],
    sheet_name: &str,
    row_number: usize,
    category: &str,
    warnings: &mut Vec<String>,
) -> Option<ParsedProductRow> {
    let code = text_at(row, CODE_COLUMN);
    if code.is_empty() {
        return None;
    }

    // Rows without a name are dropped without a warning.
    let name = text_at(row, NAME_COLUMN);
    if name.is_empty() {
        return None;
    }

    let price_cell = cell_at(row, PRICE_COLUMN);
    let Some(price_usd) = parse_price(price_cell) else {
        warnings.push(format!(
            "Sheet \"{}\" fila {}: precio inválido ({})",
            sheet_name,
            row_number,
            price_cell.to_text()
        ));
        return None;
    };

    let alt_cell = cell_at(row, ALT_PRICE_COLUMN);
    let price_alt_usd = if alt_cell.is_empty() {
        0.0
    } else {
        parse_price(alt_cell).unwrap_or(0.0)
    };

    Some(ParsedProductRow {
        code,
        name,
        provider: text_at(row, PROVIDER_COLUMN),
        origin: text_at(row, ORIGIN_COLUMN),
        price_usd,
        price_alt_usd,
        iva_included: true,
        category: category.to_string(),
        sheet: sheet_name.to_string(),
    })
}

/// Tolerant price reading: numeric cells pass through, anything else goes
/// through [`parse_price_text`].
pub fn parse_price(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Empty => None,
        other => parse_price_text(&other.to_text()),
    }
}

/// Removes whitespace, turns the first comma into a period, strips every
/// character that is not a digit, `.` or `-`, then reads the longest leading
/// decimal literal.
///
/// Thousands separators are not understood: `"1.234,56"` becomes
/// `"1.234.56"` and reads as `1.234`.
pub fn parse_price_text(raw: &str) -> Option<f64> {
    let compact: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    let normalized = compact.replacen(',', ".", 1);
    let stripped: String = normalized
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    leading_decimal(&stripped)
}

fn leading_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    s[..end].parse().ok()
}

fn cell_at(row: &[Cell], index: usize) -> &Cell {
    row.get(index).unwrap_or(&Cell::Empty)
}

fn text_at(row: &[Cell], index: usize) -> String {
    cell_at(row, index).to_text().trim().to_string()
}

fn trim_row(mut row: Row) -> Row {
    while row.last().is_some_and(Cell::is_empty) {
        row.pop();
    }
    row
}
