//! Error types for grid assembly and persistence

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while placing rows on the grid
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A row has more fields than the sheet has columns
    #[error("row {row} has {count} fields, more than the {max} columns a sheet holds")]
    TooManyColumns { row: u32, count: usize, max: u32 },

    /// More rows than the sheet can hold
    #[error("{count} rows exceed the {max} rows a sheet holds")]
    TooManyRows { count: usize, max: u32 },

    /// The metadata stamp would fall outside the sheet
    #[error("no room for the run stamp after column {after}")]
    NoRoomForStamp { after: u32 },
}

/// Errors raised while opening or saving the document
#[derive(Debug, Error)]
pub enum SinkError {
    /// Existing document could not be read
    #[error("failed to open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    /// Worksheet could not be created
    #[error("failed to create sheet {sheet}: {reason}")]
    Sheet { sheet: String, reason: String },

    /// Document could not be written
    #[error("failed to save {}: {reason}", .path.display())]
    Save { path: PathBuf, reason: String },
}
