//! Grid assembly
//!
//! Decoded rows use 0-based positions; the grid uses the sheet's 1-based
//! rows and lettered columns. Capture row *i* becomes sheet row *i + 1* and
//! field *j* becomes column *j + 1*.
//!
//! The run stamp ("Last Run:" and the timestamp) is two text cells on the
//! stamp row, starting at the stamp column (G1:H1 by default). When the data
//! is wide enough to reach the stamp column, the stamp moves right so one
//! empty column separates it from the widest row.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Local, NaiveDateTime};
use mag_protocol::{Cell, Row};
use tracing::debug;

use crate::column::{column_index, column_name, MAX_COLUMNS, MAX_ROWS};
use crate::error::GridError;

/// Label written next to the run timestamp
pub const LAST_RUN_LABEL: &str = "Last Run:";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d @ %H:%M:%S";

/// A 1-based sheet position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    /// Sheet row, from 1
    pub row: u32,
    /// Sheet column, from 1 (1 = A)
    pub column: u32,
}

impl CellRef {
    /// Create a reference from 1-based row and column numbers
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Parse A1 notation (e.g. `"H1"`, `"aa10"`)
    pub fn parse(a1: &str) -> Option<Self> {
        let split = a1.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = a1.split_at(split);
        let column = column_index(letters)?;
        let row = digits.parse::<u32>().ok().filter(|r| (1..=MAX_ROWS).contains(r))?;
        Some(Self { row, column })
    }

    /// Column letters
    pub fn column_name(&self) -> String {
        column_name(self.column)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}

/// The "Last Run:" label and formatted timestamp for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStamp {
    /// Label cell text
    pub label: String,
    /// Timestamp cell text
    pub timestamp: String,
}

impl SessionStamp {
    /// Create a stamp with the standard label and a preformatted timestamp
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            label: LAST_RUN_LABEL.to_string(),
            timestamp: timestamp.into(),
        }
    }

    /// Stamp for a local date and time, as `YYYY-MM-DD @ HH:MM:SS`
    pub fn at(time: NaiveDateTime) -> Self {
        Self::new(time.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Stamp for the current local time
    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }
}

/// Where the run stamp goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    /// Column of the stamp label when the data is narrower than it
    pub stamp_column: u32,
    /// Row of the stamp
    pub stamp_row: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            stamp_column: 7, // G
            stamp_row: 1,
        }
    }
}

/// An addressed collection of cells, ready for a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<CellRef, Cell>,
    data_rows: u32,
    data_columns: u32,
    stamp_at: Option<CellRef>,
}

impl Grid {
    /// Cell at a position
    pub fn get(&self, at: CellRef) -> Option<&Cell> {
        self.cells.get(&at)
    }

    /// All cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.cells.iter().map(|(at, cell)| (*at, cell))
    }

    /// Number of cells, stamp included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of data rows
    pub fn data_rows(&self) -> u32 {
        self.data_rows
    }

    /// Width of the widest data row
    pub fn data_columns(&self) -> u32 {
        self.data_columns
    }

    /// Position of the stamp label, if a stamp was placed
    pub fn stamp_at(&self) -> Option<CellRef> {
        self.stamp_at
    }
}

/// Places decoded rows and the run stamp on a grid
#[derive(Debug, Clone, Default)]
pub struct GridAssembler {
    layout: GridLayout,
}

impl GridAssembler {
    /// Create an assembler with a custom stamp position
    pub fn with_layout(layout: GridLayout) -> Self {
        Self { layout }
    }

    /// Build the grid for a capture
    ///
    /// Pure: the same rows and stamp always give the same grid.
    pub fn assemble(&self, rows: &[Row], stamp: &SessionStamp) -> Result<Grid, GridError> {
        if rows.len() > MAX_ROWS as usize {
            return Err(GridError::TooManyRows {
                count: rows.len(),
                max: MAX_ROWS,
            });
        }

        let mut grid = Grid::default();

        for (i, row) in rows.iter().enumerate() {
            let sheet_row = i as u32 + 1;
            if row.len() > MAX_COLUMNS as usize {
                return Err(GridError::TooManyColumns {
                    row: sheet_row,
                    count: row.len(),
                    max: MAX_COLUMNS,
                });
            }
            for (j, cell) in row.iter().enumerate() {
                grid.cells.insert(CellRef::new(sheet_row, j as u32 + 1), cell.clone());
            }
            grid.data_columns = grid.data_columns.max(row.len() as u32);
        }
        grid.data_rows = rows.len() as u32;

        let stamp_at = self.stamp_position(grid.data_columns)?;
        grid.cells.insert(stamp_at, Cell::Text(stamp.label.clone()));
        grid.cells.insert(
            CellRef::new(stamp_at.row, stamp_at.column + 1),
            Cell::Text(stamp.timestamp.clone()),
        );
        grid.stamp_at = Some(stamp_at);

        debug!(
            "Assembled {} row(s) x {} column(s), stamp at {}",
            grid.data_rows, grid.data_columns, stamp_at
        );
        Ok(grid)
    }

    fn stamp_position(&self, data_columns: u32) -> Result<CellRef, GridError> {
        let column = if data_columns >= self.layout.stamp_column {
            data_columns + 2
        } else {
            self.layout.stamp_column
        };
        if column + 1 > MAX_COLUMNS {
            return Err(GridError::NoRoomForStamp {
                after: data_columns,
            });
        }
        Ok(CellRef::new(self.layout.stamp_row, column))
    }
}
