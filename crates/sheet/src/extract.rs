//! Sheet grid extraction.
//!
//! Turns worksheets into rectangular (jagged) grids of [`CellValue`]s and
//! assembles the per-request result mapping. Extraction is a single
//! synchronous pass per sheet; nothing is cached between calls.

use crate::book::{RawCell, SheetRead, Workbook};
use crate::cell::CellValue;
use crate::error::Result;
use crate::strip::strip_grid;
use indexmap::IndexMap;
use tracing::warn;

/// Ordered rows of normalized cell values for one sheet.
pub type Grid = Vec<Vec<CellValue>>;

/// Extraction result: requested sheet name mapped to its grid, or `None`
/// for names the workbook does not contain.
pub type Tables = IndexMap<String, Option<Grid>>;

/// Normalize the cell at (row, col) of `sheet` to a [`CellValue`].
///
/// Formula cells are evaluated first; when evaluation fails a diagnostic is
/// logged and the cached result is used instead. Error-valued cells become
/// `Error#<code>` markers. Per-cell failures never abort extraction.
pub fn normalize_cell<S: SheetRead>(sheet: &S, row: u32, col: u32) -> CellValue {
    let Some(raw) = sheet.cell(row, col) else {
        return CellValue::Null;
    };

    let raw = match raw {
        RawCell::Formula { cached } => match sheet.eval_formula(row, col) {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(
                    sheet = sheet.name(),
                    row,
                    col,
                    cached = ?cached,
                    %err,
                    "formula evaluation failed, falling back to cached result"
                );
                *cached
            }
        },
        other => other,
    };

    match raw {
        RawCell::Blank => CellValue::Null,
        RawCell::Bool(b) => CellValue::Bool(b),
        RawCell::Text(s) => CellValue::String(s),
        RawCell::Number(n) => CellValue::from_number(n),
        RawCell::DateTime { serial, decoded } => CellValue::from_serial_date(serial, decoded),
        RawCell::Error(code) => {
            warn!(sheet = sheet.name(), row, col, %code, "error cell");
            CellValue::Error(format!("Error#{code}"))
        }
        // a formula resolving to yet another formula is not a usable value
        RawCell::Formula { .. } => CellValue::Null,
    }
}

/// Read the full grid of one sheet.
///
/// Iterates rows 0 through the sheet's last populated row; each row spans
/// columns 0 through its own last populated column. A row without cells
/// yields an empty row, an empty sheet an empty grid.
pub fn read_grid<S: SheetRead>(sheet: &S) -> Grid {
    let Some(last_row) = sheet.last_row() else {
        return Grid::new();
    };
    (0..=last_row)
        .map(|row| match sheet.last_col(row) {
            Some(last_col) => (0..=last_col)
                .map(|col| normalize_cell(sheet, row, col))
                .collect(),
            None => Vec::new(),
        })
        .collect()
}

/// Extract the requested `tables` from `workbook` into an ordered mapping.
///
/// An empty request defaults to every sheet in workbook order. Names the
/// workbook does not contain map to `None`; the remaining names of the same
/// request are still processed normally.
pub fn extract_tables(workbook: &mut Workbook, tables: &[String], strip: bool) -> Result<Tables> {
    let requested: Vec<String> = if tables.is_empty() {
        workbook.sheet_names().to_vec()
    } else {
        tables.to_vec()
    };

    let mut result = Tables::new();
    for name in requested {
        if !workbook.sheet_names().contains(&name) {
            result.insert(name, None);
            continue;
        }
        let worksheet = workbook.worksheet(&name)?;
        let mut grid = read_grid(&worksheet);
        if strip {
            strip_grid(&mut grid);
        }
        result.insert(name, Some(grid));
    }
    Ok(result)
}
