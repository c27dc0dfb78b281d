//! Magnetar Grid Library
//!
//! This crate turns decoded rows into an addressed cell grid and writes it
//! to a spreadsheet document:
//!
//! - **Columns**: spreadsheet letters computed for any index (A..Z, AA.., XFD)
//! - **Assembly**: row *i* of the capture lands on sheet row *i + 1*, field *j*
//!   on column *j + 1*, plus a "Last Run:" stamp beside the data
//! - **Sink**: a [`Document`] trait and its xlsx implementation
//!
//! # Example
//!
//! ```rust
//! use mag_grid::{CellRef, GridAssembler, SessionStamp};
//! use mag_protocol::RowDecoder;
//!
//! let rows = vec![RowDecoder::default().decode_str("1,abc")];
//! let stamp = SessionStamp::new("2026-10-19 @ 14:03:12");
//! let grid = GridAssembler::default().assemble(&rows, &stamp).unwrap();
//!
//! assert_eq!(grid.get(CellRef::new(1, 2)).unwrap().to_string(), "abc");
//! assert_eq!(grid.get(CellRef::parse("G1").unwrap()).unwrap().to_string(), "Last Run:");
//! ```

pub mod column;
pub mod error;
pub mod grid;
pub mod sink;

pub use column::{column_index, column_name, MAX_COLUMNS, MAX_ROWS};
pub use error::{GridError, SinkError};
pub use grid::{CellRef, Grid, GridAssembler, GridLayout, SessionStamp, LAST_RUN_LABEL};
pub use sink::{
    document_path, write_grid, Document, XlsxDocument, DEFAULT_SHEET, DOCUMENT_SUFFIX,
};
