use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or reading a workbook.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("cannot open `{}` as a spreadsheet: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("cannot decrypt `{}`: {detail}", path.display())]
    Decrypt { path: PathBuf, detail: String },

    #[error("sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("formula evaluation failed: {0}")]
    Formula(String),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
