//! Workbook reading and grid extraction for xls2json
//!
//! Opens legacy and modern spreadsheet files (xls, xlsx, xlsm, xlsb, ods),
//! normalizes worksheet cells into a fixed set of JSON-representable value
//! kinds, and emits the resulting grids as JSON. Container parsing is
//! delegated to calamine behind the narrow [`SheetRead`] trait.
//!
//! # Examples
//!
//! ## Extracting all sheets of a workbook
//!
//! ```no_run
//! use xls2json_sheet::{extract_tables, Workbook};
//!
//! let mut workbook = Workbook::open("data.xlsx", None).unwrap();
//! let tables = extract_tables(&mut workbook, &[], true).unwrap();
//! for (name, grid) in &tables {
//!     println!("{name}: {} rows", grid.as_ref().map_or(0, Vec::len));
//! }
//! ```
//!
//! ## Emitting JSON
//!
//! ```no_run
//! use xls2json_sheet::{extract_tables, write_tables, JsonOptions, Workbook};
//!
//! let mut workbook = Workbook::open("data.xlsx", None).unwrap();
//! let tables = extract_tables(&mut workbook, &[], false).unwrap();
//! let mut out = Vec::new();
//! write_tables(&mut out, &tables, &JsonOptions::default()).unwrap();
//! ```

mod book;
mod cell;
mod error;
mod extract;
mod json;
mod strip;

/// Re-export workbook access and the spreadsheet-reader boundary.
pub use book::{RawCell, SheetRead, Workbook, Worksheet};
/// Re-export the normalized cell value type and formatting patterns.
pub use cell::{CellValue, ValueFormats};
/// Re-export error types.
pub use error::{Result, SheetError};
/// Re-export extraction entry points.
pub use extract::{extract_tables, normalize_cell, read_grid, Grid, Tables};
/// Re-export JSON emission.
pub use json::{tables_to_json, write_json, write_sheet_names, write_tables, JsonOptions};
/// Re-export right-trim helpers.
pub use strip::{rstrip, strip_grid};
