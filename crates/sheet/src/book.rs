//! Workbook access over calamine.
//!
//! The extractor never talks to calamine directly; it goes through the
//! [`SheetRead`] trait, which captures the handful of operations the tool
//! needs from a spreadsheet library. Swapping in another backend means
//! implementing this trait for it.

use crate::error::{Result, SheetError};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::NaiveDateTime;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Byte source a workbook can be parsed from: the file contents, or an
/// in-memory buffer holding a decrypted package.
type ReadSeek = Cursor<Vec<u8>>;

/// One raw cell as reported by the backing spreadsheet library.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    /// Present but empty cell (e.g. formatted without content).
    Blank,
    Bool(bool),
    Text(String),
    Number(f64),
    /// Date-formatted numeric cell: raw serial value plus the library's
    /// decoded date-time.
    DateTime {
        serial: f64,
        decoded: Option<NaiveDateTime>,
    },
    /// Error-valued cell; carries the error code, e.g. `DIV/0!`.
    Error(String),
    /// Formula cell with its last cached result.
    Formula { cached: Box<RawCell> },
}

/// Read-only view of one worksheet.
pub trait SheetRead {
    /// Sheet name, used in diagnostics.
    fn name(&self) -> &str;

    /// Highest populated row index, or `None` for an empty sheet.
    fn last_row(&self) -> Option<u32>;

    /// Highest populated column index of `row`, or `None` when the row has
    /// no cells.
    fn last_col(&self, row: u32) -> Option<u32>;

    /// Raw cell at (row, col); `None` when no cell exists at that position.
    fn cell(&self, row: u32, col: u32) -> Option<RawCell>;

    /// Re-evaluate the formula at (row, col) to a concrete value.
    fn eval_formula(&self, row: u32, col: u32) -> Result<RawCell>;
}

/// An opened spreadsheet file.
///
/// xls, xlsx, xlsm, xlsb and ods containers are detected automatically.
/// The underlying reader holds the native file handle; dropping the
/// workbook releases it, so worksheet views must not outlive it.
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<ReadSeek>,
    names: Vec<String>,
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("path", &self.path)
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl Workbook {
    /// Open a spreadsheet file, decrypting it first when a password is
    /// given.
    ///
    /// Password-protected OOXML workbooks (standard and agile ECMA-376
    /// encryption) are decrypted into memory and parsed from the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, empty, not a spreadsheet
    /// container, or if decryption fails (wrong password, not an encrypted
    /// package, or an unsupported encryption scheme).
    pub fn open<P: AsRef<Path>>(path: P, password: Option<&str>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader: ReadSeek = match password {
            Some(password) => Cursor::new(decrypt_file(&path, password)?),
            None => {
                let bytes = std::fs::read(&path).map_err(|err| SheetError::Open {
                    path: path.clone(),
                    source: calamine::Error::Io(err),
                })?;
                Cursor::new(bytes)
            }
        };
        let sheets = open_workbook_auto_from_rs(reader).map_err(|source| SheetError::Open {
            path: path.clone(),
            source,
        })?;
        let names = sheets.sheet_names().to_vec();
        Ok(Workbook {
            path,
            sheets,
            names,
        })
    }

    /// Sheet names in workbook order.
    #[must_use]
    pub fn sheet_names(&self) -> &[String] {
        &self.names
    }

    /// Path the workbook was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the named worksheet as a readable view.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet does not exist or its cell range
    /// cannot be read.
    pub fn worksheet(&mut self, name: &str) -> Result<Worksheet> {
        if !self.names.iter().any(|n| n == name) {
            return Err(SheetError::SheetNotFound {
                name: name.to_string(),
            });
        }
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|source| SheetError::Open {
                path: self.path.clone(),
                source,
            })?;
        Ok(Worksheet {
            name: name.to_string(),
            range,
        })
    }
}

/// A named grid of cells within a workbook.
///
/// A view over the loaded cell range; it owns no data beyond it and is only
/// valid while the workbook is alive.
pub struct Worksheet {
    name: String,
    range: Range<Data>,
}

impl SheetRead for Worksheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn last_row(&self) -> Option<u32> {
        self.range.end().map(|(row, _)| row)
    }

    fn last_col(&self, row: u32) -> Option<u32> {
        let (start_row, start_col) = self.range.start()?;
        let (end_row, end_col) = self.range.end()?;
        if row < start_row || row > end_row {
            return None;
        }
        // calamine pads the used rectangle with empty cells; the row extent
        // is the last cell holding an actual value.
        (start_col..=end_col)
            .rev()
            .find(|&col| !matches!(self.range.get_value((row, col)), None | Some(Data::Empty)))
    }

    fn cell(&self, row: u32, col: u32) -> Option<RawCell> {
        match self.range.get_value((row, col)) {
            None => None,
            Some(Data::Empty) => Some(RawCell::Blank),
            Some(data) => Some(data_to_raw(data)),
        }
    }

    fn eval_formula(&self, _row: u32, _col: u32) -> Result<RawCell> {
        // calamine resolves formulas to their cached results while reading,
        // so formula cells never reach this backend.
        Err(SheetError::Formula(
            "backend has no formula evaluator".to_string(),
        ))
    }
}

/// Decrypt an encrypted OOXML package into a plain workbook buffer.
fn decrypt_file(path: &Path, password: &str) -> Result<Vec<u8>> {
    let raw = std::fs::read(path).map_err(|err| SheetError::Open {
        path: path.to_path_buf(),
        source: calamine::Error::Io(err),
    })?;
    office_crypto::decrypt_from_bytes(raw, password).map_err(|err| SheetError::Decrypt {
        path: path.to_path_buf(),
        detail: format!("{err:?}"),
    })
}

fn data_to_raw(data: &Data) -> RawCell {
    match data {
        Data::Empty => RawCell::Blank,
        Data::Bool(b) => RawCell::Bool(*b),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) => RawCell::Text(s.clone()),
        Data::DateTime(dt) => RawCell::DateTime {
            serial: dt.as_f64(),
            decoded: dt.as_datetime(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Error(e.to_string().trim_start_matches('#').to_string()),
    }
}
