//! Spreadsheet documents
//!
//! The session writes its grid through the [`Document`] trait and saves once
//! at the end. [`XlsxDocument`] is the on-disk implementation.

use std::path::{Path, PathBuf};

use mag_protocol::Cell;
use tracing::{debug, info};
use umya_spreadsheet::Spreadsheet;

use crate::error::SinkError;
use crate::grid::{CellRef, Grid};

/// Worksheet the table is written to
pub const DEFAULT_SHEET: &str = "Sheet1";

/// Extension appended to the document name the user types
pub const DOCUMENT_SUFFIX: &str = ".xlsx";

/// Path for a user-supplied document name (`"run7"` → `run7.xlsx`)
pub fn document_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", name, DOCUMENT_SUFFIX))
}

/// A destination for grid cells
pub trait Document {
    /// Write one cell, replacing any previous value
    fn set_cell(&mut self, at: CellRef, value: &Cell) -> Result<(), SinkError>;

    /// Persist the document
    fn save(&mut self) -> Result<(), SinkError>;
}

/// Write every cell of a grid to a document, without saving
pub fn write_grid<D: Document + ?Sized>(document: &mut D, grid: &Grid) -> Result<(), SinkError> {
    for (at, cell) in grid.iter() {
        document.set_cell(at, cell)?;
    }
    debug!("Wrote {} cell(s)", grid.len());
    Ok(())
}

/// An xlsx workbook on disk
///
/// Opening an existing workbook keeps its other sheets and cells; the grid
/// overwrites only the cells it covers.
pub struct XlsxDocument {
    book: Spreadsheet,
    path: PathBuf,
    sheet: String,
}

impl XlsxDocument {
    /// Open `path` if it exists, otherwise start a new workbook
    ///
    /// An existing file that cannot be read is an error rather than being
    /// replaced.
    pub fn open_or_create(path: impl AsRef<Path>, sheet: &str) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();

        let mut book = if path.exists() {
            info!("Opening {}", path.display());
            umya_spreadsheet::reader::xlsx::read(&path).map_err(|e| SinkError::Open {
                path: path.clone(),
                reason: e.to_string(),
            })?
        } else {
            info!("Creating {}", path.display());
            umya_spreadsheet::new_file()
        };

        if book.get_sheet_by_name(sheet).is_none() {
            debug!("Adding sheet {}", sheet);
            book.new_sheet(sheet).map_err(|e| SinkError::Sheet {
                sheet: sheet.to_string(),
                reason: e.to_string(),
            })?;
        }

        Ok(Self {
            book,
            path,
            sheet: sheet.to_string(),
        })
    }

    /// Path the document saves to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying workbook
    pub fn workbook(&self) -> &Spreadsheet {
        &self.book
    }
}

impl Document for XlsxDocument {
    fn set_cell(&mut self, at: CellRef, value: &Cell) -> Result<(), SinkError> {
        let sheet = self.book.get_sheet_by_name_mut(&self.sheet).ok_or_else(|| {
            SinkError::Sheet {
                sheet: self.sheet.clone(),
                reason: "worksheet missing from workbook".into(),
            }
        })?;
        let target = sheet.get_cell_mut((at.column, at.row));
        match value {
            Cell::Integer(v) => {
                target.set_value_number(*v as f64);
            }
            Cell::Text(s) => {
                target.set_value_string(s.as_str());
            }
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), SinkError> {
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path).map_err(|e| {
            SinkError::Save {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;
        info!("Saved {}", self.path.display());
        Ok(())
    }
}
